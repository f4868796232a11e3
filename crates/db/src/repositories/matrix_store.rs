use chrono::{DateTime, Utc};
use sqlx::Row;

use liftquote_core::domain::matrix::{Matrix, MatrixId, Variant};

use super::{MatrixStore, RepositoryError};
use crate::DbPool;

const SELECT_COLUMNS: &str =
    "SELECT id, base_model_family, variants_json, created_at, updated_at FROM configuration_matrix";

/// Stores each matrix as one row with its variants as a JSON document.
pub struct SqlMatrixStore {
    pool: DbPool,
}

impl SqlMatrixStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_matrix(row: &sqlx::sqlite::SqliteRow) -> Result<Matrix, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let base_model_family: String =
        row.try_get("base_model_family").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let variants_json: String =
        row.try_get("variants_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let updated_at: String =
        row.try_get("updated_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let variants = serde_json::from_str::<Vec<Variant>>(&variants_json).map_err(|error| {
        RepositoryError::Decode(format!("invalid variants document for matrix `{id}`: {error}"))
    })?;

    Ok(Matrix {
        id: MatrixId(id),
        base_model_family,
        variants,
        created_at: parse_timestamp("created_at", created_at)?,
        updated_at: parse_timestamp("updated_at", updated_at)?,
    })
}

fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value).map(|timestamp| timestamp.with_timezone(&Utc)).map_err(
        |error| {
            RepositoryError::Decode(format!("invalid timestamp in `{column}`: `{value}` ({error})"))
        },
    )
}

#[async_trait::async_trait]
impl MatrixStore for SqlMatrixStore {
    async fn find_by_family(&self, family: &str) -> Result<Option<Matrix>, RepositoryError> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE base_model_family = ? ORDER BY created_at ASC, id ASC LIMIT 1"
        ))
        .bind(family)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_matrix).transpose()
    }

    async fn find_by_id(&self, id: &MatrixId) -> Result<Option<Matrix>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_matrix).transpose()
    }

    async fn upsert(&self, matrix: Matrix) -> Result<(), RepositoryError> {
        let variants_json = serde_json::to_string(&matrix.variants)
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        sqlx::query(
            "INSERT INTO configuration_matrix
                 (id, base_model_family, variants_json, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 base_model_family = excluded.base_model_family,
                 variants_json = excluded.variants_json,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
        )
        .bind(&matrix.id.0)
        .bind(&matrix.base_model_family)
        .bind(variants_json)
        .bind(matrix.created_at.to_rfc3339())
        .bind(matrix.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &MatrixId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM configuration_matrix WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Matrix>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> =
            sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY created_at ASC, id ASC"))
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_matrix).collect::<Result<Vec<_>, _>>()
    }
}
