// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied on
//! every [`Database::open`](crate::Database::open).

use hookbox_core::HookboxError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending migration. Already-applied ones are tracked in
/// `refinery_schema_history` and skipped.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), HookboxError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(HookboxError::storage)?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(())
}
