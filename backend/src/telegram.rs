//! Telegram login widget verification.
//!
//! The widget redirects back with the user's fields plus a `hash`. The hash is
//! HMAC-SHA256 over the data-check-string (every other field as `key=value`,
//! sorted by key, joined with `\n`), keyed with SHA-256 of the bot token.

use std::collections::BTreeMap;
use ring::{digest, hmac};
use shared::user_info::UserKey;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelegramError {
    #[error("Telegram login is not configured")]
    Disabled,
    #[error("Missing hash field")]
    MissingHash,
    #[error("Missing id field")]
    MissingId,
    #[error("Signature mismatch")]
    BadSignature,
}

pub struct TelegramVerifier {
    key: Option<hmac::Key>,
}

impl TelegramVerifier {
    pub fn new() -> Self {
        Self { key: None }
    }

    pub fn new_with_token(bot_token: impl Into<String>) -> Self {
        let bot_token = bot_token.into();
        if bot_token.trim().is_empty() {
            warn!("TelegramVerifier created with empty bot token - Telegram login will be disabled");
            return Self::new();
        }
        Self { key: Some(signing_key(&bot_token)) }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Checks the signed login payload and returns the identity it vouches for.
    pub fn verify(&self, fields: &BTreeMap<String, String>) -> Result<UserKey, TelegramError> {
        let key = self.key.as_ref().ok_or(TelegramError::Disabled)?;
        let hash = fields.get("hash").ok_or(TelegramError::MissingHash)?;
        let tag = hex::decode(hash.trim()).map_err(|_| TelegramError::BadSignature)?;

        hmac::verify(key, data_check_string(fields).as_bytes(), &tag)
            .map_err(|_| TelegramError::BadSignature)?;

        match fields.get("id") {
            Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => Ok(UserKey::telegram(id)),
            _ => Err(TelegramError::MissingId),
        }
    }
}

impl Default for TelegramVerifier {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn signing_key(bot_token: &str) -> hmac::Key {
    let secret = digest::digest(&digest::SHA256, bot_token.as_bytes());
    hmac::Key::new(hmac::HMAC_SHA256, secret.as_ref())
}

pub fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .filter(|(k, _)| k.as_str() != "hash")
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}
