//! Durable record of cast votes.
//!
//! The ledger is the only authority on whether a vote counts: a vote is
//! accepted when its `(user_key, category_id)` pair is new, and every later
//! attempt for the same pair is reported as a duplicate. Implementations must
//! make that check-and-insert atomic.

use rocket::async_trait;
use shared::models::{VoteCount, VoteRecord};
use shared::user_info::UserKey;
use thiserror::Error;

pub const DEFAULT_MUSIC_ON: bool = true;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerOutcome {
    Accepted(VoteRecord),
    Duplicate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait VoteLedger: Send + Sync {
    async fn record_vote(
        &self,
        user_key: &UserKey,
        category_id: &str,
        nominee_id: &str,
    ) -> Result<LedgerOutcome, LedgerError>;

    /// Falls back to [`DEFAULT_MUSIC_ON`] for users without a stored row.
    async fn get_preference(&self, user_key: &UserKey) -> Result<bool, LedgerError>;

    async fn set_preference(&self, user_key: &UserKey, music_on: bool) -> Result<(), LedgerError>;

    /// Accepted votes grouped by category and nominee.
    async fn vote_counts(&self) -> Result<Vec<VoteCount>, LedgerError>;
}
