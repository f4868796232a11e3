use tokio::sync::RwLock;

use liftquote_core::domain::matrix::{Matrix, MatrixId};

use super::{MatrixStore, RepositoryError};

/// Keeps matrices in insertion order; an upsert of a known id replaces it in
/// place.
#[derive(Default)]
pub struct InMemoryMatrixStore {
    matrices: RwLock<Vec<Matrix>>,
}

impl InMemoryMatrixStore {
    pub fn with_matrices(matrices: Vec<Matrix>) -> Self {
        Self { matrices: RwLock::new(matrices) }
    }
}

#[async_trait::async_trait]
impl MatrixStore for InMemoryMatrixStore {
    async fn find_by_family(&self, family: &str) -> Result<Option<Matrix>, RepositoryError> {
        let matrices = self.matrices.read().await;
        Ok(matrices.iter().find(|matrix| matrix.base_model_family == family).cloned())
    }

    async fn find_by_id(&self, id: &MatrixId) -> Result<Option<Matrix>, RepositoryError> {
        let matrices = self.matrices.read().await;
        Ok(matrices.iter().find(|matrix| &matrix.id == id).cloned())
    }

    async fn upsert(&self, matrix: Matrix) -> Result<(), RepositoryError> {
        let mut matrices = self.matrices.write().await;
        match matrices.iter_mut().find(|existing| existing.id == matrix.id) {
            Some(existing) => *existing = matrix,
            None => matrices.push(matrix),
        }
        Ok(())
    }

    async fn delete(&self, id: &MatrixId) -> Result<(), RepositoryError> {
        let mut matrices = self.matrices.write().await;
        matrices.retain(|matrix| &matrix.id != id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Matrix>, RepositoryError> {
        Ok(self.matrices.read().await.clone())
    }
}
