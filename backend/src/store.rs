use std::collections::HashMap;
use std::sync::Mutex;
use rocket::async_trait;
use time::OffsetDateTime;
use tracing::error;
use shared::models::{VoteCount, VoteRecord};
use shared::user_info::UserKey;
use crate::ledger::{LedgerError, LedgerOutcome, VoteLedger, DEFAULT_MUSIC_ON};

type VoteKey = (String, String);

/// Process-local ledger. A single lock covers the lookup and the insert.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    votes: Mutex<HashMap<VoteKey, VoteRecord>>,
    prefs: Mutex<HashMap<String, bool>>,
}

fn lock_failed<T>(e: std::sync::PoisonError<T>) -> LedgerError {
    error!("Failed to acquire ledger lock: {}", e);
    LedgerError::Unavailable("ledger lock poisoned".into())
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vote_of(&self, user_key: &UserKey, category_id: &str) -> Result<Option<VoteRecord>, LedgerError> {
        let votes = self.votes.lock().map_err(lock_failed)?;
        Ok(votes.get(&(user_key.as_str().to_owned(), category_id.to_owned())).cloned())
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.votes.lock().map_err(lock_failed)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Leaves the vote lock poisoned, as a panicking writer would.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.votes.lock();
            panic!("writer panicked while holding the vote lock");
        }));
    }
}

#[async_trait]
impl VoteLedger for MemoryLedger {
    async fn record_vote(
        &self,
        user_key: &UserKey,
        category_id: &str,
        nominee_id: &str,
    ) -> Result<LedgerOutcome, LedgerError> {
        let mut votes = self.votes.lock().map_err(lock_failed)?;
        let key = (user_key.as_str().to_owned(), category_id.to_owned());
        if votes.contains_key(&key) {
            return Ok(LedgerOutcome::Duplicate);
        }

        let record = VoteRecord {
            user_key: key.0.clone(),
            category_id: key.1.clone(),
            nominee_id: nominee_id.to_owned(),
            cast_at: OffsetDateTime::now_utc(),
        };
        votes.insert(key, record.clone());
        Ok(LedgerOutcome::Accepted(record))
    }

    async fn get_preference(&self, user_key: &UserKey) -> Result<bool, LedgerError> {
        let prefs = self.prefs.lock().map_err(lock_failed)?;
        Ok(prefs.get(user_key.as_str()).copied().unwrap_or(DEFAULT_MUSIC_ON))
    }

    async fn set_preference(&self, user_key: &UserKey, music_on: bool) -> Result<(), LedgerError> {
        let mut prefs = self.prefs.lock().map_err(lock_failed)?;
        prefs.insert(user_key.as_str().to_owned(), music_on);
        Ok(())
    }

    async fn vote_counts(&self) -> Result<Vec<VoteCount>, LedgerError> {
        let votes = self.votes.lock().map_err(lock_failed)?;
        let mut grouped: HashMap<(&str, &str), i64> = HashMap::new();
        for record in votes.values() {
            *grouped
                .entry((record.category_id.as_str(), record.nominee_id.as_str()))
                .or_insert(0) += 1;
        }

        Ok(grouped
            .into_iter()
            .map(|((category_id, nominee_id), votes)| VoteCount {
                category_id: category_id.to_owned(),
                nominee_id: nominee_id.to_owned(),
                votes,
            })
            .collect())
    }
}
