// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the Hookbox webhook inbox.
//!
//! Thin axum layer over the ingestion pipeline and query service: routing,
//! response envelopes, health probes, and a middleware that records request
//! metrics and emits one structured log event per request.

pub mod error;
pub mod handlers;
pub mod observe;
pub mod server;

pub use error::ApiError;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
