// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message insert and filtered listing.

use chrono::{SecondsFormat, Utc};
use hookbox_core::{HookboxError, InsertOutcome, Message, MessageFilter, MessagePage, Pagination};
use rusqlite::params;
use rusqlite::types::Value;

use crate::database::{Database, map_tr_err};
use crate::queries::ts_from_micros;

/// Insert a message unless its `message_id` is already stored.
///
/// The primary key decides the race: of any number of concurrent inserts for
/// one id, exactly one reports [`InsertOutcome::Created`]. An existing row is
/// never modified.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<InsertOutcome, HookboxError> {
    let msg = msg.clone();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO messages (message_id, from_msisdn, to_msisdn, ts, text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(message_id) DO NOTHING",
                params![
                    msg.message_id,
                    msg.from,
                    msg.to,
                    msg.ts.timestamp_micros(),
                    msg.text,
                    created_at,
                ],
            )?;
            Ok(if inserted == 0 {
                InsertOutcome::Duplicate
            } else {
                InsertOutcome::Created
            })
        })
        .await
        .map_err(map_tr_err)
}

/// One page of messages matching `filter`, ordered by `ts` then `message_id`,
/// together with the number of rows the filter matches overall.
pub async fn list_messages(
    db: &Database,
    filter: &MessageFilter,
    page: Pagination,
) -> Result<MessagePage, HookboxError> {
    let (where_sql, args) = where_clause(filter);
    db.connection()
        .call(move |conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM messages{where_sql}"),
                rusqlite::params_from_iter(args.iter()),
                |row| row.get(0),
            )?;

            let mut page_args = args;
            page_args.push(Value::Integer(i64::from(page.limit())));
            page_args.push(Value::Integer(
                i64::try_from(page.offset()).unwrap_or(i64::MAX),
            ));
            let mut stmt = conn.prepare(&format!(
                "SELECT message_id, from_msisdn, to_msisdn, ts, text FROM messages{where_sql}
                 ORDER BY ts ASC, message_id ASC LIMIT ? OFFSET ?"
            ))?;
            let rows = stmt.query_map(rusqlite::params_from_iter(page_args.iter()), |row| {
                Ok(Message {
                    message_id: row.get(0)?,
                    from: row.get(1)?,
                    to: row.get(2)?,
                    ts: ts_from_micros(3, row.get(3)?)?,
                    text: row.get(4)?,
                })
            })?;
            let items = rows.collect::<Result<Vec<_>, _>>()?;

            Ok(MessagePage {
                items,
                total: total.max(0) as u64,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Build the `WHERE` fragment and its positional arguments for `filter`.
fn where_clause(filter: &MessageFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(from) = &filter.from {
        conditions.push("from_msisdn = ?");
        args.push(Value::Text(from.clone()));
    }
    if let Some(since) = filter.since {
        conditions.push("ts >= ?");
        args.push(Value::Integer(since.timestamp_micros()));
    }
    if let Some(q) = &filter.q {
        conditions.push("casefold(text) LIKE ? ESCAPE '\\'");
        args.push(Value::Text(format!("%{}%", escape_like(&q.to_lowercase()))));
    }

    if conditions.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), args)
    }
}

/// Escape LIKE wildcards so `q` matches literally.
fn escape_like(q: &str) -> String {
    let mut out = String::with_capacity(q.len());
    for c in q.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
