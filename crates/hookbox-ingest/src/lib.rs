// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion and query services for the Hookbox webhook inbox.
//!
//! [`IngestionPipeline`] turns one signed webhook body into at most one stored
//! message and exactly one recorded outcome. [`QueryService`] normalizes
//! listing parameters and shapes the `/messages` and `/stats` responses.
//! Neither depends on a web framework.

pub mod payload;
pub mod pipeline;
pub mod query;
pub mod signature;

pub use payload::WebhookPayload;
pub use pipeline::{Ingested, IngestionPipeline};
pub use query::{ListParams, MessagesResponse, QueryService};
pub use signature::{compute_signature, verify};
