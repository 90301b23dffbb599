// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observability adapter trait for process-local metrics.

use crate::traits::adapter::PluginAdapter;
use crate::types::MetricEvent;

/// Adapter for recording request metrics.
///
/// Recording is synchronous and must be safe to call from any number of
/// concurrent requests without losing updates.
pub trait ObservabilityAdapter: PluginAdapter {
    /// Records one metric event.
    fn record(&self, event: MetricEvent);

    /// Renders all collected metrics in Prometheus text exposition format.
    fn render(&self) -> String;
}
