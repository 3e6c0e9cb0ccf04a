pub mod paginated_cursor;
pub mod result_cursor;

pub use paginated_cursor::PaginatedCursor;
pub use result_cursor::ResultCursor;

/// Lifecycle of one cursor execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Never executed, or the last `execute` failed.
    Idle,
    /// A statement is open and rows may follow.
    Executing,
    /// Rows ran out or the cursor was closed. Statement resources are freed.
    Exhausted,
}
