// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hookbox webhook inbox.
//!
//! This crate provides the adapter traits, the error type, and the domain
//! types shared by the store, the metrics registry, and the ingestion and
//! query services. It depends on no web framework and no storage engine.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HookboxError;
pub use types::{
    AdapterType, HealthStatus, InsertOutcome, Message, MessageFilter, MessagePage,
    MetricEvent, Pagination, SenderCount, Stats, WebhookOutcome,
};

pub use traits::{ObservabilityAdapter, PluginAdapter, StorageAdapter};
