use std::sync::Arc;
use shared::catalog::Catalog;
use shared::models::{Category, CategoryResult, NomineeResult};
use shared::tally::{Snapshot, TallyCache, TallyError};
use shared::user_info::UserKey;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use crate::ledger::{LedgerError, LedgerOutcome, VoteLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidCategory,
    InvalidNominee,
    AlreadyVoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Accepted,
    Rejected(RejectReason),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] LedgerError),
    #[error("Tally invariant violated: {0}")]
    TallyInvariant(#[from] TallyError),
}

/// Validates votes against the catalog, records them in the ledger and keeps
/// the tally in step with what the ledger accepted.
pub struct VoteService {
    catalog: Arc<Catalog>,
    ledger: Arc<dyn VoteLedger>,
    tally: TallyCache,
}

impl VoteService {
    pub fn new(catalog: Arc<Catalog>, ledger: Arc<dyn VoteLedger>) -> Self {
        let tally = TallyCache::new(&catalog);
        Self { catalog, ledger, tally }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.catalog.find_category(id)
    }

    #[instrument(skip(self, user_key), fields(user = %user_key))]
    pub async fn cast_vote(
        &self,
        user_key: &UserKey,
        category_id: &str,
        nominee_id: &str,
    ) -> Result<VoteOutcome, ServiceError> {
        let Some(category) = self.catalog.find_category(category_id) else {
            return Ok(VoteOutcome::Rejected(RejectReason::InvalidCategory));
        };
        if !Catalog::nominee_exists(category, nominee_id) {
            return Ok(VoteOutcome::Rejected(RejectReason::InvalidNominee));
        }

        match self.ledger.record_vote(user_key, category_id, nominee_id).await? {
            LedgerOutcome::Duplicate => {
                debug!("Vote rejected: already voted in {}", category_id);
                Ok(VoteOutcome::Rejected(RejectReason::AlreadyVoted))
            }
            LedgerOutcome::Accepted(record) => {
                // The ledger already holds the vote; the tally can be rebuilt from it.
                self.tally
                    .increment(&record.category_id, &record.nominee_id)
                    .map_err(|e| {
                        error!("Vote recorded but tally not updated: {}", e);
                        ServiceError::TallyInvariant(e)
                    })?;
                debug!("Vote accepted for {}/{}", category_id, nominee_id);
                Ok(VoteOutcome::Accepted)
            }
        }
    }

    pub fn compute_results(&self) -> Snapshot {
        self.tally.snapshot()
    }

    /// Snapshot joined with catalog titles and names.
    pub fn results(&self) -> Vec<CategoryResult> {
        self.compute_results()
            .into_iter()
            .filter_map(|tally| {
                let category = self.catalog.find_category(&tally.category_id)?;
                Some(CategoryResult {
                    id: category.id.clone(),
                    title: category.title.clone(),
                    nominees: tally
                        .nominees
                        .into_iter()
                        .map(|n| NomineeResult {
                            name: category
                                .nominee(&n.nominee_id)
                                .map(|nominee| nominee.name.clone())
                                .unwrap_or_default(),
                            id: n.nominee_id,
                            votes: n.votes,
                            percent: n.percent,
                        })
                        .collect(),
                })
            })
            .collect()
    }

    /// Reloads every count from the ledger. Returns the number of votes restored.
    pub async fn rebuild_tally(&self) -> Result<u64, LedgerError> {
        let rows = self.ledger.vote_counts().await?;
        let skipped = self.tally.restore(&rows);
        let restored: u64 = self.compute_results().iter().map(|c| c.total()).sum();
        info!("Tally rebuilt from ledger: {} votes ({} stale rows skipped)", restored, skipped);
        Ok(restored)
    }

    pub async fn music_preference(&self, user_key: &UserKey) -> Result<bool, LedgerError> {
        self.ledger.get_preference(user_key).await
    }

    pub async fn set_music_preference(&self, user_key: &UserKey, on: bool) -> Result<(), LedgerError> {
        self.ledger.set_preference(user_key, on).await
    }

    pub fn log_results(&self) {
        info!("=== Awards results ===");
        for category in self.results() {
            info!("{} ({} votes)", category.title, category.total_votes());
            for nominee in &category.nominees {
                info!("  - {}: {} ({}%)", nominee.name, nominee.votes, nominee.percent);
            }
        }
    }
}
