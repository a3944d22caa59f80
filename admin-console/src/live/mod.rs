//! Live queries
//!
//! - [`PagedLiveQuery`] - one page at a time over a sorted collection, with
//!   next/prev navigation built on forward-only cursors
//! - [`LiveCollection`] - the whole matching set, kept current
//!
//! Both own their subscription. Opening a new page drops the previous
//! subscription before the next one is requested, and dropping the view
//! releases whatever it still holds.

pub mod collection;
pub mod page;

pub use collection::LiveCollection;
pub use page::{Direction, PageSpec, PageWindow, PagedLiveQuery};

use std::fmt;
use std::str::FromStr;

use shared::error::AppError;

/// Lifecycle of a live view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing opened yet, or closed
    Idle,
    /// Subscription requested, first snapshot pending
    Loading,
    Ready,
    /// Terminal until the caller reopens the view
    Error(AppError),
}

impl ViewState {
    pub fn error(&self) -> Option<&AppError> {
        match self {
            ViewState::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// When the has-next lookahead query runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadPolicy {
    /// After every delivered snapshot (always fresh, one extra read per update)
    EverySnapshot,
    /// Only when the page's last cursor changed since the previous snapshot
    WhenCursorMoves,
}

impl FromStr for LookaheadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "every_snapshot" => Ok(LookaheadPolicy::EverySnapshot),
            "when_cursor_moves" => Ok(LookaheadPolicy::WhenCursorMoves),
            other => Err(format!("unknown lookahead policy '{}'", other)),
        }
    }
}

impl fmt::Display for LookaheadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookaheadPolicy::EverySnapshot => write!(f, "every_snapshot"),
            LookaheadPolicy::WhenCursorMoves => write!(f, "when_cursor_moves"),
        }
    }
}

/// Decode a snapshot, skipping documents that fail their schema
pub(crate) fn decode_all<T: shared::Record>(docs: &[crate::store::Document]) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(collection = T::COLLECTION, id = %doc.id, error = %e, "Skipping invalid document");
                None
            }
        })
        .collect()
}
