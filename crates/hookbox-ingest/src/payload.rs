// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook payload schema and validation.

use chrono::{DateTime, Utc};
use hookbox_core::{HookboxError, Message};
use serde::Deserialize;

/// Longest accepted `text`, in characters.
pub const MAX_TEXT_CHARS: usize = 4096;

/// The JSON body of `POST /webhook`. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookPayload {
    /// Parse and validate raw body bytes into a [`Message`].
    pub fn parse(raw_body: &[u8]) -> Result<Message, HookboxError> {
        let payload: WebhookPayload = serde_json::from_slice(raw_body)
            .map_err(|e| HookboxError::Validation(format!("invalid payload: {e}")))?;
        payload.into_message()
    }

    /// Check field formats and convert into the stored representation.
    pub fn into_message(self) -> Result<Message, HookboxError> {
        if self.message_id.is_empty() {
            return Err(HookboxError::Validation(
                "message_id must not be empty".into(),
            ));
        }
        if !is_e164(&self.from) {
            return Err(HookboxError::Validation(
                "from must be in E.164 format (+ followed by digits)".into(),
            ));
        }
        if !is_e164(&self.to) {
            return Err(HookboxError::Validation(
                "to must be in E.164 format (+ followed by digits)".into(),
            ));
        }
        let ts = DateTime::parse_from_rfc3339(&self.ts)
            .map_err(|e| HookboxError::Validation(format!("ts must be an RFC 3339 timestamp: {e}")))?
            .with_timezone(&Utc);
        if let Some(text) = &self.text
            && text.chars().count() > MAX_TEXT_CHARS
        {
            return Err(HookboxError::Validation(format!(
                "text must be at most {MAX_TEXT_CHARS} characters"
            )));
        }

        Ok(Message {
            message_id: self.message_id,
            from: self.from,
            to: self.to,
            ts,
            text: self.text,
        })
    }
}

fn is_e164(s: &str) -> bool {
    s.strip_prefix('+')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
