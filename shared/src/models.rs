use serde::{Serialize, Deserialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Nominee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub nominees: Vec<Nominee>,
}

impl Category {
    pub fn nominee(&self, nominee_id: &str) -> Option<&Nominee> {
        self.nominees.iter().find(|n| n.id == nominee_id)
    }
}

/// One accepted vote as persisted by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub user_key: String,
    pub category_id: String,
    pub nominee_id: String,
    #[cfg_attr(feature = "backend", sqlx(rename = "ts"))]
    pub cast_at: OffsetDateTime,
}

/// Aggregated ledger row used to rebuild the tally.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
pub struct VoteCount {
    pub category_id: String,
    pub nominee_id: String,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub category_id: String,
    pub nominee_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MusicPreference {
    pub music_on: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetMusicPreference {
    pub on: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NomineeResult {
    pub id: String,
    pub name: String,
    pub votes: u64,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub id: String,
    pub title: String,
    pub nominees: Vec<NomineeResult>,
}

impl CategoryResult {
    pub fn total_votes(&self) -> u64 {
        self.nominees.iter().map(|n| n.votes).sum()
    }
}
