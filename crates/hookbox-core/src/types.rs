// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the store, the metrics registry, and the
//! ingestion/query services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default page size for message listings.
pub const DEFAULT_LIMIT: u32 = 50;

/// Largest page size a listing will return.
pub const MAX_LIMIT: u32 = 100;

/// Number of senders reported in [`Stats::messages_per_sender`].
pub const TOP_SENDERS: usize = 10;

/// A persisted inbound message.
///
/// Created once by the first successful ingestion of its `message_id` and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub from: String,
    pub to: String,
    #[serde(with = "rfc3339")]
    pub ts: DateTime<Utc>,
    pub text: Option<String>,
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum InsertOutcome {
    /// The message was stored by this call.
    Created,
    /// A message with the same `message_id` already existed; nothing changed.
    Duplicate,
}

/// Optional, AND-combined filters for message listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Exact match on the sender.
    pub from: Option<String>,
    /// Keep messages with `ts >= since`.
    pub since: Option<DateTime<Utc>>,
    /// Case-insensitive substring match against `text`.
    pub q: Option<String>,
}

/// A normalized page window. Construction always clamps into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: u32,
    offset: u64,
}

impl Pagination {
    /// Clamp `limit` into `[1, MAX_LIMIT]` and `offset` into `[0, +inf)`.
    pub fn clamped(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT as i64) as u32,
            offset: offset.max(0) as u64,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::clamped(DEFAULT_LIMIT as i64, 0)
    }
}

/// One page of a filtered listing plus the filtered total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub items: Vec<Message>,
    /// Rows matching the filter, ignoring the page window.
    pub total: u64,
}

/// Message count for a single sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCount {
    pub from: String,
    pub count: u64,
}

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_messages: u64,
    pub senders_count: u64,
    /// Top senders by count descending, ties by sender ascending.
    pub messages_per_sender: Vec<SenderCount>,
    #[serde(with = "rfc3339::option")]
    pub first_message_ts: Option<DateTime<Utc>>,
    #[serde(with = "rfc3339::option")]
    pub last_message_ts: Option<DateTime<Utc>>,
}

impl Stats {
    /// Statistics of a store holding no messages.
    pub fn empty() -> Self {
        Self {
            total_messages: 0,
            senders_count: 0,
            messages_per_sender: Vec::new(),
            first_message_ts: None,
            last_message_ts: None,
        }
    }
}

/// Terminal label recorded once per webhook request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    Created,
    Duplicate,
    InvalidSignature,
    ValidationError,
    StorageError,
}

impl From<InsertOutcome> for WebhookOutcome {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Created => WebhookOutcome::Created,
            InsertOutcome::Duplicate => WebhookOutcome::Duplicate,
        }
    }
}

/// An observation handed to an observability adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    /// One completed HTTP request.
    HttpRequest { path: String, status: u16 },
    /// The terminal outcome of one webhook request.
    Webhook(WebhookOutcome),
    /// End-to-end request latency in milliseconds.
    Latency { millis: f64 },
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Observability,
}

/// RFC 3339 (de)serialization with a `Z` suffix and only as many fractional
/// digits as the value needs.
pub mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => super::serialize(ts, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            raw.map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}
