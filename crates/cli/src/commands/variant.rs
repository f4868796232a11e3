use crate::commands::{to_json, with_session, CommandFailure, CommandResult};

pub fn run(variant_code: &str) -> CommandResult {
    with_session("variant", |session| async move {
        let variant =
            session.repository.get_variant_by_code(variant_code).await?.ok_or_else(|| {
                CommandFailure::not_found(format!("variant `{variant_code}` not found"))
            })?;

        Ok(CommandResult::success_with_data(
            "variant",
            format!("{} ({})", variant.variant_name, variant.variant_code),
            to_json(&variant)?,
        ))
    })
}
