// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use hookbox_config::model::StorageConfig;
use hookbox_core::{
    AdapterType, HealthStatus, HookboxError, InsertOutcome, Message, MessageFilter, MessagePage,
    Pagination, PluginAdapter, Stats, StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed message store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules. The
/// database is opened by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](StorageAdapter::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, HookboxError> {
        self.db
            .get()
            .ok_or_else(|| HookboxError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    /// Healthy when the connection answers and the `messages` table exists.
    async fn health_check(&self) -> Result<HealthStatus, HookboxError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".into()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1 FROM messages LIMIT 1", [], |_| Ok(()))
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(()),
                        other => Err(other),
                    })
            })
            .await
            .map_err(map_tr_err);
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), HookboxError> {
        if self.db.get().is_some() {
            self.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HookboxError> {
        let path = self.config.resolved_path();
        let db = Database::open(path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| HookboxError::storage("storage already initialized"))?;
        debug!(path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HookboxError> {
        self.db()?.close().await
    }

    async fn insert_message(&self, message: &Message) -> Result<InsertOutcome, HookboxError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn list_messages(
        &self,
        filter: &MessageFilter,
        page: Pagination,
    ) -> Result<MessagePage, HookboxError> {
        queries::messages::list_messages(self.db()?, filter, page).await
    }

    async fn stats(&self) -> Result<Stats, HookboxError> {
        queries::stats::message_stats(self.db()?).await
    }
}
