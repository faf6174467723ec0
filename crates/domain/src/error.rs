//! Domain-wide error type
//!
//! Covers catalog lookups and value validation. Moves between containers use
//! the narrower [`crate::transfer::TransferError`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value object or aggregate rejected its input.
    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("Unknown {kind}: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Input was well-formed but breaks a rule over a set (e.g. duplicate ids).
    #[error("Rule violated: {0}")]
    Constraint(String),

    #[error("Cannot parse {0}")]
    Parse(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
