//! Unified error codes for the admin console
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Document store errors
//! - 2xxx: Blob store errors
//! - 4xxx: Order errors
//! - 5xxx: Comment errors
//! - 6xxx: Catalog errors (dishes, categories, vouchers, banners)
//! - 7xxx: Chat errors
//! - 8xxx: Account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Document store ====================
    /// Live subscription could not be established
    SubscriptionFailed = 1001,
    /// Query needs a composite index that does not exist
    MissingIndex = 1002,
    /// Store is unreachable
    StoreUnavailable = 1003,
    /// Document does not match its record schema
    InvalidDocument = 1005,
    /// Document does not exist
    DocumentNotFound = 1006,

    // ==================== 2xxx: Blob store ====================
    /// Upload failed
    UploadFailed = 2001,
    /// File extension is not an accepted image type
    UnsupportedFileFormat = 2002,
    /// Uploaded file is empty
    EmptyFile = 2003,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    /// Requested status equals the current one
    OrderStatusUnchanged = 4002,
    /// Order has no open customer report
    ReportNotOpen = 4003,

    // ==================== 5xxx: Comment ====================
    CommentNotFound = 5001,
    CommentAlreadyModerated = 5002,

    // ==================== 6xxx: Catalog ====================
    DishNotFound = 6001,
    CategoryNotFound = 6101,
    CategoryNameExists = 6102,
    VoucherNotFound = 6201,
    VoucherCodeExists = 6202,
    VoucherExpired = 6203,
    BannerNotFound = 6301,

    // ==================== 7xxx: Chat ====================
    ConversationNotFound = 7001,
    EmptyMessage = 7002,

    // ==================== 8xxx: Account ====================
    AccountNotFound = 8001,
    CannotDisableAdmin = 8003,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Store
            ErrorCode::SubscriptionFailed => "Live query subscription failed",
            ErrorCode::MissingIndex => "The query requires an index",
            ErrorCode::StoreUnavailable => "Document store is unavailable",
            ErrorCode::InvalidDocument => "Document does not match its schema",
            ErrorCode::DocumentNotFound => "Document not found",

            // Blob
            ErrorCode::UploadFailed => "File upload failed",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::EmptyFile => "File is empty",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderStatusUnchanged => "Order already has this status",
            ErrorCode::ReportNotOpen => "Order has no open report",

            // Comment
            ErrorCode::CommentNotFound => "Comment not found",
            ErrorCode::CommentAlreadyModerated => "Comment already has this moderation status",

            // Catalog
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::VoucherNotFound => "Voucher not found",
            ErrorCode::VoucherCodeExists => "Voucher code already exists",
            ErrorCode::VoucherExpired => "Voucher has expired",
            ErrorCode::BannerNotFound => "Banner not found",

            // Chat
            ErrorCode::ConversationNotFound => "Conversation not found",
            ErrorCode::EmptyMessage => "Message body is empty",

            // Account
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::CannotDisableAdmin => "Cannot disable an administrator account",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,

            1001 => ErrorCode::SubscriptionFailed,
            1002 => ErrorCode::MissingIndex,
            1003 => ErrorCode::StoreUnavailable,
            1005 => ErrorCode::InvalidDocument,
            1006 => ErrorCode::DocumentNotFound,

            2001 => ErrorCode::UploadFailed,
            2002 => ErrorCode::UnsupportedFileFormat,
            2003 => ErrorCode::EmptyFile,

            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::OrderStatusUnchanged,
            4003 => ErrorCode::ReportNotOpen,

            5001 => ErrorCode::CommentNotFound,
            5002 => ErrorCode::CommentAlreadyModerated,

            6001 => ErrorCode::DishNotFound,
            6101 => ErrorCode::CategoryNotFound,
            6102 => ErrorCode::CategoryNameExists,
            6201 => ErrorCode::VoucherNotFound,
            6202 => ErrorCode::VoucherCodeExists,
            6203 => ErrorCode::VoucherExpired,
            6301 => ErrorCode::BannerNotFound,

            7001 => ErrorCode::ConversationNotFound,
            7002 => ErrorCode::EmptyMessage,

            8001 => ErrorCode::AccountNotFound,
            8003 => ErrorCode::CannotDisableAdmin,

            9001 => ErrorCode::InternalError,
            9005 => ErrorCode::ConfigError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
