use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_CATALOG_PATH: &str = "data/categories.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub telegram_bot_token: Option<String>,
    pub catalog_path: PathBuf,
    pub rebuild_tally: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            rebuild_tally: true,
        }
    }
}

impl Settings {
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let telegram_bot_token = lookup("TG_BOT_TOKEN").filter(|t| !t.trim().is_empty());
        if telegram_bot_token.is_none() {
            warn!("TG_BOT_TOKEN not found - Telegram login will be disabled");
        }

        Self {
            telegram_bot_token,
            catalog_path: lookup("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            rebuild_tally: try_parse(&lookup, "REBUILD_TALLY", defaults.rebuild_tally),
        }
    }
}

fn try_parse<T: FromStr + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {key} value {raw:?}, using default: {default}");
            default
        }),
    }
}
