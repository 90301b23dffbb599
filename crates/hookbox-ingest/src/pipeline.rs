// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One webhook request: verify, validate, persist, record.

use std::sync::Arc;

use hookbox_core::{
    HookboxError, InsertOutcome, MetricEvent, ObservabilityAdapter, StorageAdapter, WebhookOutcome,
};
use tracing::{debug, warn};

use crate::payload::WebhookPayload;
use crate::signature;

/// A message accepted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    pub message_id: String,
    pub outcome: InsertOutcome,
}

/// Orchestrates signature verification, payload validation and idempotent
/// persistence for inbound webhooks.
///
/// Every call to [`ingest`](Self::ingest) records exactly one
/// `webhook_requests_total` outcome, whichever branch it ends in.
pub struct IngestionPipeline {
    secret: Option<Vec<u8>>,
    storage: Arc<dyn StorageAdapter>,
    metrics: Arc<dyn ObservabilityAdapter>,
}

impl IngestionPipeline {
    /// Build a pipeline. Without a secret every request is rejected as
    /// `invalid_signature`.
    pub fn new(
        secret: Option<String>,
        storage: Arc<dyn StorageAdapter>,
        metrics: Arc<dyn ObservabilityAdapter>,
    ) -> Self {
        Self {
            secret: secret.map(String::into_bytes),
            storage,
            metrics,
        }
    }

    /// Whether a webhook secret is configured.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Process one request body and its `X-Signature` header value.
    ///
    /// The signature is checked against the raw bytes before the body is
    /// parsed. Errors are [`HookboxError::InvalidSignature`],
    /// [`HookboxError::Validation`] or a storage failure.
    pub async fn ingest(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<Ingested, HookboxError> {
        let result = self.run(raw_body, signature_header).await;
        self.metrics
            .record(MetricEvent::Webhook(outcome_of(&result)));
        result
    }

    /// Account for a request whose body could not be read at all (too
    /// large, or the stream failed). Records `validation_error` and returns
    /// the matching error.
    pub fn reject_unreadable(&self, reason: &str) -> HookboxError {
        debug!(%reason, "webhook body unreadable");
        self.metrics
            .record(MetricEvent::Webhook(WebhookOutcome::ValidationError));
        HookboxError::Validation(format!("request body rejected: {reason}"))
    }

    async fn run(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<Ingested, HookboxError> {
        let Some(secret) = self.secret.as_deref() else {
            warn!("webhook rejected: no secret configured");
            return Err(HookboxError::InvalidSignature);
        };
        if !signature::verify(secret, raw_body, signature_header) {
            debug!(present = signature_header.is_some(), "webhook signature mismatch");
            return Err(HookboxError::InvalidSignature);
        }

        let message = WebhookPayload::parse(raw_body)?;
        let outcome = self.storage.insert_message(&message).await?;
        debug!(message_id = %message.message_id, %outcome, "webhook stored");
        Ok(Ingested {
            message_id: message.message_id,
            outcome,
        })
    }
}

/// The outcome label for a finished ingestion.
pub fn outcome_of(result: &Result<Ingested, HookboxError>) -> WebhookOutcome {
    match result {
        Ok(ingested) => ingested.outcome.into(),
        Err(HookboxError::InvalidSignature) => WebhookOutcome::InvalidSignature,
        Err(HookboxError::Validation(_)) => WebhookOutcome::ValidationError,
        Err(_) => WebhookOutcome::StorageError,
    }
}
