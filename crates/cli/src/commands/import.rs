use std::fs;
use std::path::Path;

use anyhow::Context;
use liftquote_core::errors::ApplicationError;
use liftquote_core::matrix::import_workbook;
use serde_json::json;
use tracing::info;

use crate::commands::{to_json, with_session, CommandFailure, CommandResult};

/// Imports a vendor workbook and saves it as a new matrix. With `replace`, an
/// existing matrix of the same family is overwritten in place instead.
pub fn run(path: &Path, replace: bool) -> CommandResult {
    with_session("import", |session| async move {
        let bytes = read_workbook(path)
            .map_err(|error| ApplicationError::Import(format!("{error:#}")))?;

        let result = import_workbook(&bytes);
        let Some(mut matrix) = result.matrix.filter(|_| result.success) else {
            return Err(CommandFailure::from(ApplicationError::Import(result.errors.join("; "))));
        };

        if replace {
            let existing =
                session.repository.get_matrix_by_model_family(&matrix.base_model_family).await?;
            if let Some(existing) = existing {
                info!(
                    event_name = "cli.import.replacing",
                    matrix_id = %existing.id,
                    base_model_family = %matrix.base_model_family,
                    "replacing existing matrix of the same family"
                );
                matrix.id = existing.id;
            }
        }

        let family = matrix.base_model_family.clone();
        let matrix_id = session.repository.save_matrix(matrix.into_draft()).await?;

        let data = json!({
            "matrix_id": matrix_id.0,
            "base_model_family": family,
            "stats": to_json(&result.stats)?,
            "warnings": result.warnings,
        });
        Ok(CommandResult::success_with_data(
            "import",
            format!(
                "imported {} variants with {} options",
                result.stats.variants_found, result.stats.options_imported
            ),
            data,
        ))
    })
}

fn read_workbook(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes =
        fs::read(path).with_context(|| format!("could not read workbook `{}`", path.display()))?;
    anyhow::ensure!(!bytes.is_empty(), "workbook `{}` is empty", path.display());
    Ok(bytes)
}
