// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing and statistics over stored messages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hookbox_core::types::DEFAULT_LIMIT;
use hookbox_core::{HookboxError, Message, MessageFilter, Pagination, Stats, StorageAdapter};
use serde::{Deserialize, Serialize};

/// Raw `/messages` query parameters, exactly as received.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub from: Option<String>,
    pub since: Option<String>,
    pub q: Option<String>,
}

impl ListParams {
    /// Validate and clamp into a filter and a page window.
    pub fn normalize(&self) -> Result<(MessageFilter, Pagination), HookboxError> {
        let limit = parse_int("limit", present(&self.limit))?.unwrap_or(i64::from(DEFAULT_LIMIT));
        let offset = parse_int("offset", present(&self.offset))?.unwrap_or(0);
        let since = present(&self.since).map(parse_since).transpose()?;

        let filter = MessageFilter {
            from: present(&self.from).map(restore_plus_prefix),
            since,
            q: present(&self.q).map(str::to_string),
        };
        Ok((filter, Pagination::clamped(limit, offset)))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_int(name: &str, value: Option<&str>) -> Result<Option<i64>, HookboxError> {
    value
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| HookboxError::Validation(format!("{name} must be an integer, got `{v}`")))
        })
        .transpose()
}

/// Senders are E.164, so a leading space followed by digits is a `+` that
/// arrived unescaped and was form-decoded.
fn restore_plus_prefix(raw: &str) -> String {
    match raw.strip_prefix(' ') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            format!("+{digits}")
        }
        _ => raw.to_string(),
    }
}

/// Parse an RFC 3339 `since`. A `+` offset that arrived unescaped in a query
/// string decodes to a space, so that form is accepted too.
fn parse_since(raw: &str) -> Result<DateTime<Utc>, HookboxError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|e| match raw.rsplit_once(' ') {
            Some((head, tail)) => DateTime::parse_from_rfc3339(&format!("{head}+{tail}")),
            None => Err(e),
        })
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HookboxError::Validation(format!("since must be an RFC 3339 timestamp: {e}")))
}

/// The `/messages` response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub data: Vec<Message>,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}

/// Stateless read side over a [`StorageAdapter`].
pub struct QueryService {
    storage: Arc<dyn StorageAdapter>,
}

impl QueryService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// One page of messages plus the filtered total, echoing the effective
    /// (clamped) `limit` and `offset`.
    pub async fn list(&self, params: &ListParams) -> Result<MessagesResponse, HookboxError> {
        let (filter, page) = params.normalize()?;
        let result = self.storage.list_messages(&filter, page).await?;
        Ok(MessagesResponse {
            data: result.items,
            total: result.total,
            limit: page.limit(),
            offset: page.offset(),
        })
    }

    pub async fn stats(&self) -> Result<Stats, HookboxError> {
        self.storage.stats().await
    }
}
