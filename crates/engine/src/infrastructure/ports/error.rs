//! Error types for port operations.

/// Persistence backend errors.
///
/// `Clone` so one failed flush can be reported to every request it covered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// Request never produced a response (connect, timeout, DNS).
    #[error("Persistence transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status.
    #[error("Persistence backend rejected flush ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Persistence backend unavailable")]
    Unavailable,
}

impl PersistenceError {
    pub fn transport(message: impl ToString) -> Self {
        Self::Transport(message.to_string())
    }

    pub fn rejected(status: u16, body: impl ToString) -> Self {
        Self::Rejected {
            status,
            body: body.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}
