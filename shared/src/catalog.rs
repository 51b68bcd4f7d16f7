use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;
use crate::models::Category;
use crate::validation::MAX_ID_LENGTH;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Empty id in catalog: {0}")]
    EmptyId(String),
    #[error("Id longer than {MAX_ID_LENGTH} characters in catalog: {0}")]
    IdTooLong(String),
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),
    #[error("Duplicate nominee id {nominee} in category {category}")]
    DuplicateNominee { category: String, nominee: String },
}

/// Immutable tree of award categories and their nominees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(
            "Loaded {} categories ({} nominees) from {}",
            catalog.categories.len(),
            catalog.nominee_count(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> Result<(), LoadError> {
        let mut seen_categories = HashSet::new();
        for category in &self.categories {
            check_id(&category.id, || format!("category \"{}\"", category.title))?;
            if !seen_categories.insert(category.id.as_str()) {
                return Err(LoadError::DuplicateCategory(category.id.clone()));
            }

            let mut seen_nominees = HashSet::new();
            for nominee in &category.nominees {
                check_id(&nominee.id, || format!("nominee \"{}\" in {}", nominee.name, category.id))?;
                if !seen_nominees.insert(nominee.id.as_str()) {
                    return Err(LoadError::DuplicateNominee {
                        category: category.id.clone(),
                        nominee: nominee.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn nominee_exists(category: &Category, nominee_id: &str) -> bool {
        category.nominees.iter().any(|n| n.id == nominee_id)
    }

    pub fn nominee_count(&self) -> usize {
        self.categories.iter().map(|c| c.nominees.len()).sum()
    }
}

/// Ids must pass the same length gate as incoming vote requests.
fn check_id(id: &str, describe: impl Fn() -> String) -> Result<(), LoadError> {
    if id.trim().is_empty() {
        return Err(LoadError::EmptyId(describe()));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(LoadError::IdTooLong(describe()));
    }
    Ok(())
}
