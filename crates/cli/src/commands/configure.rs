use std::collections::BTreeMap;

use liftquote_core::cpq::{
    get_available_options, initialize_selections, CpqEvaluationInput, CpqRuntime,
};
use liftquote_core::domain::matrix::{parse_selection_pair, Selection, Variant};
use liftquote_core::errors::DomainError;
use liftquote_core::DeterministicCpqRuntime;
use serde_json::json;

use crate::commands::{to_json, with_session, CommandFailure, CommandResult};

/// Standard options first, then each `spec=option` override in order.
pub fn build_selection(variant: &Variant, overrides: &[String]) -> Result<Selection, DomainError> {
    let mut selections = initialize_selections(variant);
    for raw in overrides {
        let (spec_code, option_code) = parse_selection_pair(raw)?;
        selections.insert(spec_code, option_code);
    }
    Ok(selections)
}

fn available_option_codes(variant: &Variant) -> BTreeMap<String, Vec<String>> {
    variant
        .specifications
        .iter()
        .map(|group| {
            let codes = get_available_options(variant, &group.group_code)
                .into_iter()
                .map(|option| option.option_code.clone())
                .collect();
            (group.group_code.clone(), codes)
        })
        .collect()
}

pub fn run(variant_code: &str, overrides: &[String], currency: &str) -> CommandResult {
    with_session("configure", |session| async move {
        let variant =
            session.repository.get_variant_by_code(variant_code).await?.ok_or_else(|| {
                CommandFailure::not_found(format!("variant `{variant_code}` not found"))
            })?;
        let selections = build_selection(&variant, overrides)?;

        let runtime = DeterministicCpqRuntime::default();
        let evaluation = runtime.evaluate_configuration(CpqEvaluationInput {
            variant: &variant,
            selections: &selections,
            currency,
        });

        let message = if evaluation.validation.valid {
            format!(
                "{} configured at {} {}",
                variant.variant_code, evaluation.price.total, currency
            )
        } else {
            format!(
                "{} is missing selections for: {}",
                variant.variant_code,
                evaluation.validation.missing_specs.join(", ")
            )
        };
        let data = json!({
            "variant_code": variant.variant_code,
            "selections": selections,
            "available_options": available_option_codes(&variant),
            "evaluation": to_json(&evaluation)?,
        });
        Ok(CommandResult::success_with_data("configure", message, data))
    })
}
