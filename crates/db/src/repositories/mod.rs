use async_trait::async_trait;
use thiserror::Error;

use liftquote_core::domain::matrix::{Matrix, MatrixId};

pub mod matrix;
pub mod matrix_store;
pub mod memory;

pub use matrix::{MatrixRepository, MatrixRepositoryError};
pub use matrix_store::SqlMatrixStore;
pub use memory::InMemoryMatrixStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Whole-document persistence for configuration matrices. Lookups that miss
/// return `Ok(None)`; only storage failures are errors.
#[async_trait]
pub trait MatrixStore: Send + Sync {
    /// First matrix of the family by creation time.
    async fn find_by_family(&self, family: &str) -> Result<Option<Matrix>, RepositoryError>;
    async fn find_by_id(&self, id: &MatrixId) -> Result<Option<Matrix>, RepositoryError>;
    async fn upsert(&self, matrix: Matrix) -> Result<(), RepositoryError>;
    /// Deleting an absent id succeeds.
    async fn delete(&self, id: &MatrixId) -> Result<(), RepositoryError>;
    async fn list(&self) -> Result<Vec<Matrix>, RepositoryError>;
}
