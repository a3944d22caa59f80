//! Database access: typed repositories over the document store

pub mod repository;

pub use repository::{
    AccountRepository, BannerRepository, BaseRepository, CategoryRepository, ChatRepository,
    CommentRepository, DishRepository, OrderRepository, Repository, VoucherRepository,
};
