// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the message store.

use async_trait::async_trait;

use crate::error::HookboxError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InsertOutcome, Message, MessageFilter, MessagePage, Pagination, Stats};

/// Durable, uniquely-keyed collection of messages.
///
/// Implementations enforce `message_id` uniqueness inside the storage engine:
/// concurrent inserts of one id yield exactly one [`InsertOutcome::Created`].
/// Reads are computed by the engine, never by loading the table into memory.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, pragmas).
    async fn initialize(&self) -> Result<(), HookboxError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), HookboxError>;

    /// Inserts a message unless its `message_id` already exists.
    ///
    /// A duplicate leaves the stored row untouched.
    async fn insert_message(&self, message: &Message) -> Result<InsertOutcome, HookboxError>;

    /// Lists messages matching `filter`, ordered by `ts` then `message_id`.
    async fn list_messages(
        &self,
        filter: &MessageFilter,
        page: Pagination,
    ) -> Result<MessagePage, HookboxError>;

    /// Computes aggregate statistics over all stored messages.
    async fn stats(&self) -> Result<Stats, HookboxError>;
}
