pub mod error;
pub mod models;
pub mod validation;
pub mod user_info;
pub mod catalog;
pub mod tally;

pub use error::{Error, ErrorCode};
pub use models::*;
pub use validation::*;
pub use user_info::*;
pub use catalog::{Catalog, LoadError};
pub use tally::{CategoryTally, NomineeTally, Snapshot, TallyCache, TallyError};

#[cfg(test)]
mod tests;
