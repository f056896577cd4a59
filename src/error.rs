use thiserror::Error;

/// Reasons a simulated operation did not run to completion.
///
/// None of these are failures from the user's point of view: every variant
/// is a silent no-op. They exist so callers can log and map them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Blank text or an empty image payload was submitted.
    #[error("input was empty")]
    EmptyInput,
    /// Another simulated operation is already pending on this feature.
    #[error("an operation is already in flight")]
    Busy,
    /// The pending operation was cancelled before it completed.
    #[error("the operation was cancelled")]
    Cancelled,
}
