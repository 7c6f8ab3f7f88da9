//! Store module for the remote catches table.
//!
//! The remote store is the source of truth; this process keeps no copy of the
//! rows. Handlers talk to it through the [`CatchStore`] trait.

mod repository;

pub use repository::*;

use async_trait::async_trait;

use crate::models::{Catch, CatchRecord};

/// Errors returned by a [`CatchStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("unexpected store response: {0}")]
    Decode(String),

    #[error("invalid store configuration: {0}")]
    Configuration(String),
}

/// Single-row operations against the catches table.
///
/// Every mutating call returns the affected rows as the store reports them;
/// an empty vector means no row matched.
#[async_trait]
pub trait CatchStore: Send + Sync {
    /// Insert one row; the store assigns the id.
    async fn insert(&self, record: &CatchRecord) -> Result<Vec<Catch>, StoreError>;

    /// All rows ordered by ascending id.
    async fn list(&self) -> Result<Vec<Catch>, StoreError>;

    /// Apply `changes` to the row with `id`.
    async fn update(&self, id: i64, changes: &CatchRecord) -> Result<Vec<Catch>, StoreError>;

    /// Remove the row with `id`.
    async fn delete(&self, id: i64) -> Result<Vec<Catch>, StoreError>;
}
