// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the `messages` table.

pub mod messages;
pub mod stats;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;

/// Convert a stored microsecond timestamp back into a UTC datetime.
pub(crate) fn ts_from_micros(idx: usize, micros: i64) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {micros}").into(),
        )
    })
}
