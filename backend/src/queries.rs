use rocket::async_trait;
use sqlx::PgPool;
use shared::models::{VoteCount, VoteRecord};
use shared::user_info::UserKey;
use tracing::debug;
use crate::ledger::{LedgerError, LedgerOutcome, VoteLedger, DEFAULT_MUSIC_ON};

/// PostgreSQL ledger. Double voting is blocked by the
/// `UNIQUE (user_key, category_id)` constraint on `votes`.
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(e: sqlx::Error) -> LedgerError {
    LedgerError::Unavailable(e.to_string())
}

#[async_trait]
impl VoteLedger for PgLedger {
    async fn record_vote(
        &self,
        user_key: &UserKey,
        category_id: &str,
        nominee_id: &str,
    ) -> Result<LedgerOutcome, LedgerError> {
        let result = sqlx::query_as::<_, VoteRecord>(
            "INSERT INTO votes (user_key, category_id, nominee_id)
             VALUES ($1, $2, $3)
             RETURNING user_key, category_id, nominee_id, ts",
        )
        .bind(user_key.as_str())
        .bind(category_id)
        .bind(nominee_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => Ok(LedgerOutcome::Accepted(record)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                debug!("Duplicate vote rejected by constraint {:?}", e.constraint());
                Ok(LedgerOutcome::Duplicate)
            }
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn get_preference(&self, user_key: &UserKey) -> Result<bool, LedgerError> {
        let music_on = sqlx::query_scalar::<_, bool>(
            "SELECT music_on FROM user_prefs WHERE user_key = $1",
        )
        .bind(user_key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(music_on.unwrap_or(DEFAULT_MUSIC_ON))
    }

    async fn set_preference(&self, user_key: &UserKey, music_on: bool) -> Result<(), LedgerError> {
        sqlx::query(
            "INSERT INTO user_prefs (user_key, music_on) VALUES ($1, $2)
             ON CONFLICT (user_key) DO UPDATE SET music_on = EXCLUDED.music_on, updated_at = NOW()",
        )
        .bind(user_key.as_str())
        .bind(music_on)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn vote_counts(&self) -> Result<Vec<VoteCount>, LedgerError> {
        sqlx::query_as::<_, VoteCount>(
            "SELECT category_id, nominee_id, COUNT(*) AS votes
             FROM votes
             GROUP BY category_id, nominee_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)
    }
}
