// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hookbox integration tests.
//!
//! [`TestHarness`] assembles a temp SQLite store, a private metrics registry
//! and the full router, and drives requests through it in-process.

pub mod harness;

pub use harness::{TEST_SECRET, TestHarness, message_body};
