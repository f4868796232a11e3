//! Application-facing access to configuration matrices on top of a
//! [`MatrixStore`].
//!
//! `update_option` is a plain read-modify-write of the whole matrix. Two
//! concurrent edits of the same matrix race and the later write wins; there is
//! no version check.

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use liftquote_core::domain::matrix::{Matrix, MatrixDraft, MatrixId, OptionPatch, Variant};
use liftquote_core::errors::ApplicationError;

use super::{MatrixStore, RepositoryError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixRepositoryError {
    #[error("matrix `{matrix_id}` not found")]
    MatrixNotFound { matrix_id: String },
    #[error("variant `{variant_code}` not found in matrix `{matrix_id}`")]
    VariantNotFound { matrix_id: String, variant_code: String },
    #[error("spec group `{spec_code}` not found in variant `{variant_code}`")]
    SpecGroupNotFound { variant_code: String, spec_code: String },
    #[error("option `{option_code}` not found in spec group `{spec_code}`")]
    OptionNotFound { spec_code: String, option_code: String },
    #[error("failed to load configuration matrix")]
    LoadFailed,
    #[error("failed to save configuration matrix")]
    SaveFailed,
    #[error("failed to delete configuration matrix")]
    DeleteFailed,
}

impl MatrixRepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MatrixNotFound { .. }
                | Self::VariantNotFound { .. }
                | Self::SpecGroupNotFound { .. }
                | Self::OptionNotFound { .. }
        )
    }
}

impl From<MatrixRepositoryError> for ApplicationError {
    fn from(value: MatrixRepositoryError) -> Self {
        if value.is_not_found() {
            Self::NotFound(value.to_string())
        } else {
            Self::Persistence(value.to_string())
        }
    }
}

pub struct MatrixRepository<S> {
    store: S,
}

impl<S: MatrixStore> MatrixRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get_matrix_by_model_family(
        &self,
        family: &str,
    ) -> Result<Option<Matrix>, MatrixRepositoryError> {
        self.store.find_by_family(family).await.map_err(|source| load_failed(&source, family))
    }

    pub async fn get_matrix(&self, id: &MatrixId) -> Result<Option<Matrix>, MatrixRepositoryError> {
        self.store.find_by_id(id).await.map_err(|source| load_failed(&source, &id.0))
    }

    /// First variant with this code across every stored matrix, in list order.
    pub async fn get_variant_by_code(
        &self,
        variant_code: &str,
    ) -> Result<Option<Variant>, MatrixRepositoryError> {
        let matrices = self.list().await?;

        for matrix in matrices {
            for variant in matrix.variants {
                if variant.variant_code == variant_code {
                    return Ok(Some(variant));
                }
            }
        }

        Ok(None)
    }

    /// Upserts by id. A matrix that already exists keeps its `created_at`.
    pub async fn save_matrix(&self, draft: MatrixDraft) -> Result<MatrixId, MatrixRepositoryError> {
        let now = Utc::now();
        let existing = self.store.find_by_id(&draft.id).await.map_err(|source| {
            log_store_failure("matrix.save.failed", &source, &draft.id.0);
            MatrixRepositoryError::SaveFailed
        })?;

        let created_at = existing.map(|matrix| matrix.created_at).unwrap_or(now);
        let matrix = draft.stamp(created_at, now);
        let id = matrix.id.clone();
        let family = matrix.base_model_family.clone();
        let variant_count = matrix.variants.len();

        self.store.upsert(matrix).await.map_err(|source| {
            log_store_failure("matrix.save.failed", &source, &id.0);
            MatrixRepositoryError::SaveFailed
        })?;

        info!(
            event_name = "matrix.save.completed",
            matrix_id = %id,
            base_model_family = %family,
            variant_count,
            "configuration matrix saved"
        );
        Ok(id)
    }

    pub async fn update_option(
        &self,
        matrix_id: &MatrixId,
        variant_code: &str,
        spec_code: &str,
        option_code: &str,
        patch: &OptionPatch,
    ) -> Result<(), MatrixRepositoryError> {
        let mut matrix = self.get_matrix(matrix_id).await?.ok_or_else(|| {
            MatrixRepositoryError::MatrixNotFound { matrix_id: matrix_id.0.clone() }
        })?;

        let variant = matrix.variant_mut(variant_code).ok_or_else(|| {
            MatrixRepositoryError::VariantNotFound {
                matrix_id: matrix_id.0.clone(),
                variant_code: variant_code.to_string(),
            }
        })?;
        let group = variant.specification_mut(spec_code).ok_or_else(|| {
            MatrixRepositoryError::SpecGroupNotFound {
                variant_code: variant_code.to_string(),
                spec_code: spec_code.to_string(),
            }
        })?;
        let option =
            group.option_mut(option_code).ok_or_else(|| MatrixRepositoryError::OptionNotFound {
                spec_code: spec_code.to_string(),
                option_code: option_code.to_string(),
            })?;

        option.apply_patch(patch);
        matrix.updated_at = Utc::now();

        self.store.upsert(matrix).await.map_err(|source| {
            log_store_failure("matrix.update_option.failed", &source, &matrix_id.0);
            MatrixRepositoryError::SaveFailed
        })?;

        info!(
            event_name = "matrix.update_option.completed",
            matrix_id = %matrix_id,
            variant_code,
            spec_code,
            option_code,
            "matrix option updated"
        );
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Matrix>, MatrixRepositoryError> {
        self.store.list().await.map_err(|source| load_failed(&source, "*"))
    }

    pub async fn delete(&self, id: &MatrixId) -> Result<(), MatrixRepositoryError> {
        self.store.delete(id).await.map_err(|source| {
            log_store_failure("matrix.delete.failed", &source, &id.0);
            MatrixRepositoryError::DeleteFailed
        })?;

        info!(
            event_name = "matrix.delete.completed",
            matrix_id = %id,
            "configuration matrix deleted"
        );
        Ok(())
    }
}

fn load_failed(source: &RepositoryError, key: &str) -> MatrixRepositoryError {
    log_store_failure("matrix.load.failed", source, key);
    MatrixRepositoryError::LoadFailed
}

fn log_store_failure(event_name: &'static str, source: &RepositoryError, key: &str) {
    error!(event_name, key, error = %source, "matrix store operation failed");
}
