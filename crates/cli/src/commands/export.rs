use std::fs;
use std::path::Path;

use anyhow::Context;
use liftquote_core::matrix::{export_rows, export_workbook_named};
use serde_json::json;

use crate::commands::{with_session, CommandFailure, CommandResult};

pub fn run(family: &str, path: &Path) -> CommandResult {
    with_session("export", |session| async move {
        let matrix = session
            .repository
            .get_matrix_by_model_family(family)
            .await?
            .ok_or_else(|| CommandFailure::not_found(format!("no matrix for family `{family}`")))?;

        let bytes = export_workbook_named(&matrix, &session.config.export.sheet_name)
            .map_err(|error| CommandFailure::new("export", error.to_string(), 5))?;
        write_workbook(path, &bytes)
            .map_err(|error| CommandFailure::invalid_input(format!("{error:#}")))?;

        let option_rows = export_rows(&matrix).len().saturating_sub(1);
        let data = json!({
            "matrix_id": matrix.id.0,
            "base_model_family": matrix.base_model_family,
            "sheet_name": session.config.export.sheet_name,
            "option_rows": option_rows,
            "path": path.display().to_string(),
        });
        Ok(CommandResult::success_with_data(
            "export",
            format!("exported {option_rows} option rows"),
            data,
        ))
    })
}

fn write_workbook(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("could not write `{}`", path.display()))
}
