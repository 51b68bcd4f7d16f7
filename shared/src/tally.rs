//! In-memory vote counts per category and nominee.
//!
//! The tally is derived data: the ledger stays authoritative and the counts
//! can always be rebuilt from it with [`TallyCache::restore`]. Readers take the
//! shared side of the lock only long enough to copy the counts out; writers
//! hold the exclusive side for a single map mutation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::warn;
use crate::catalog::Catalog;
use crate::models::VoteCount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    #[error("Tally has no slot for nominee {nominee_id} in category {category_id}")]
    UnknownTarget { category_id: String, nominee_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NomineeTally {
    pub nominee_id: String,
    pub votes: u64,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTally {
    pub category_id: String,
    pub nominees: Vec<NomineeTally>,
}

impl CategoryTally {
    pub fn total(&self) -> u64 {
        self.nominees.iter().map(|n| n.votes).sum()
    }

    pub fn votes_for(&self, nominee_id: &str) -> Option<u64> {
        self.nominees.iter().find(|n| n.nominee_id == nominee_id).map(|n| n.votes)
    }
}

pub type Snapshot = Vec<CategoryTally>;

/// Integer share of `total`, rounded down. Zero when nothing was cast.
pub fn percent(votes: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (votes.min(total) * 100 / total) as u8
}

type Counts = HashMap<String, HashMap<String, u64>>;

#[derive(Debug)]
pub struct TallyCache {
    layout: Vec<(String, Vec<String>)>,
    counts: RwLock<Counts>,
}

impl TallyCache {
    /// Every nominee of the catalog starts at zero so snapshots are complete.
    pub fn new(catalog: &Catalog) -> Self {
        let layout: Vec<(String, Vec<String>)> = catalog
            .categories()
            .iter()
            .map(|c| (c.id.clone(), c.nominees.iter().map(|n| n.id.clone()).collect()))
            .collect();

        let counts = Self::zeroed(&layout);
        Self {
            layout,
            counts: RwLock::new(counts),
        }
    }

    fn zeroed(layout: &[(String, Vec<String>)]) -> Counts {
        layout
            .iter()
            .map(|(category_id, nominees)| {
                (
                    category_id.clone(),
                    nominees.iter().map(|n| (n.clone(), 0)).collect(),
                )
            })
            .collect()
    }

    /// Call exactly once per vote the ledger accepted.
    pub fn increment(&self, category_id: &str, nominee_id: &str) -> Result<(), TallyError> {
        let mut counts = self.counts.write().unwrap_or_else(PoisonError::into_inner);
        let slot = counts
            .get_mut(category_id)
            .and_then(|nominees| nominees.get_mut(nominee_id))
            .ok_or_else(|| TallyError::UnknownTarget {
                category_id: category_id.to_string(),
                nominee_id: nominee_id.to_string(),
            })?;
        *slot += 1;
        Ok(())
    }

    pub fn count(&self, category_id: &str, nominee_id: &str) -> Option<u64> {
        let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);
        counts.get(category_id)?.get(nominee_id).copied()
    }

    pub fn snapshot(&self) -> Snapshot {
        let copied: Vec<Vec<u64>> = {
            let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);
            self.layout
                .iter()
                .map(|(category_id, nominees)| {
                    let row = counts.get(category_id);
                    nominees
                        .iter()
                        .map(|n| row.and_then(|r| r.get(n)).copied().unwrap_or(0))
                        .collect()
                })
                .collect()
        };

        self.layout
            .iter()
            .zip(copied)
            .map(|((category_id, nominees), votes)| {
                let total: u64 = votes.iter().sum();
                CategoryTally {
                    category_id: category_id.clone(),
                    nominees: nominees
                        .iter()
                        .zip(votes)
                        .map(|(nominee_id, votes)| NomineeTally {
                            nominee_id: nominee_id.clone(),
                            votes,
                            percent: percent(votes, total),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Replaces all counts with ledger aggregates. Returns how many rows were
    /// skipped because their target is not in the catalog.
    pub fn restore(&self, rows: &[VoteCount]) -> usize {
        let mut fresh = Self::zeroed(&self.layout);
        let mut skipped = 0;

        for row in rows {
            match fresh
                .get_mut(&row.category_id)
                .and_then(|nominees| nominees.get_mut(&row.nominee_id))
            {
                Some(slot) => *slot = row.votes.max(0) as u64,
                None => {
                    warn!(
                        "Ignoring {} stored votes for {}/{}: not in catalog",
                        row.votes, row.category_id, row.nominee_id
                    );
                    skipped += 1;
                }
            }
        }

        *self.counts.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        skipped
    }
}
