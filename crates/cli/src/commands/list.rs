use serde::Serialize;

use crate::commands::{to_json, with_session, CommandResult};

#[derive(Debug, Serialize)]
struct MatrixListing {
    id: String,
    base_model_family: String,
    variant_codes: Vec<String>,
    created_at: String,
    updated_at: String,
}

pub fn run() -> CommandResult {
    with_session("list", |session| async move {
        let listings = session
            .repository
            .list()
            .await?
            .into_iter()
            .map(|matrix| MatrixListing {
                id: matrix.id.0,
                base_model_family: matrix.base_model_family,
                variant_codes: matrix
                    .variants
                    .into_iter()
                    .map(|variant| variant.variant_code)
                    .collect(),
                created_at: matrix.created_at.to_rfc3339(),
                updated_at: matrix.updated_at.to_rfc3339(),
            })
            .collect::<Vec<_>>();

        Ok(CommandResult::success_with_data(
            "list",
            format!("{} matrices", listings.len()),
            to_json(&listings)?,
        ))
    })
}
