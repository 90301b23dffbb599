// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hookbox webhook inbox.

use thiserror::Error;

/// The primary error type used across all Hookbox adapter traits and core operations.
///
/// A duplicate `message_id` is deliberately absent: it is reported as
/// [`InsertOutcome::Duplicate`](crate::types::InsertOutcome::Duplicate),
/// never as an error.
#[derive(Debug, Error)]
pub enum HookboxError {
    /// Storage backend errors (database unreachable, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A webhook payload or query parameter failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request signature was missing, malformed, or did not match.
    #[error("invalid signature")]
    InvalidSignature,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HookboxError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
