//! Error values surfaced at the book's API boundary.

use thiserror::Error;

/// Errors returned by book operations.
///
/// Both variants are returned by value and leave the book unchanged:
/// a duplicate insert is rejected before matching, and a not-found
/// update or cancel touches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookError {
    /// The order id already rests in the book. Callers typically reject
    /// or reassign the id.
    #[error("order {0} already exists in the book")]
    DuplicateId(u64),

    /// No resting order with this id on either side. Common for late
    /// updates or cancels racing an order that has already filled;
    /// callers typically log and continue.
    #[error("order {0} does not exist")]
    NotFound(u64),
}
