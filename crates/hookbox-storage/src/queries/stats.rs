// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate statistics over the `messages` table.

use hookbox_core::types::TOP_SENDERS;
use hookbox_core::{HookboxError, SenderCount, Stats};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::queries::ts_from_micros;

/// Totals, top senders and the timestamp range, computed in SQL.
pub async fn message_stats(db: &Database) -> Result<Stats, HookboxError> {
    db.connection()
        .call(|conn| {
            let (total, senders, first, last): (i64, i64, Option<i64>, Option<i64>) = conn
                .query_row(
                    "SELECT COUNT(*), COUNT(DISTINCT from_msisdn), MIN(ts), MAX(ts) FROM messages",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )?;

            let mut stmt = conn.prepare(
                "SELECT from_msisdn, COUNT(*) AS n FROM messages
                 GROUP BY from_msisdn
                 ORDER BY n DESC, from_msisdn ASC
                 LIMIT ?1",
            )?;
            let per_sender = stmt
                .query_map(params![TOP_SENDERS as i64], |row| {
                    Ok(SenderCount {
                        from: row.get(0)?,
                        count: row.get::<_, i64>(1)?.max(0) as u64,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Stats {
                total_messages: total.max(0) as u64,
                senders_count: senders.max(0) as u64,
                messages_per_sender: per_sender,
                first_message_ts: first.map(|v| ts_from_micros(2, v)).transpose()?,
                last_message_ts: last.map(|v| ts_from_micros(3, v)).transpose()?,
            })
        })
        .await
        .map_err(map_tr_err)
}
