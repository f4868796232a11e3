//! Option availability, defaults, cost and validation for one variant and a
//! caller-supplied [`Selection`]. Everything here is a pure function.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::matrix::{AvailabilityLevel, MatrixOption, Selection, Variant};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationValidation {
    pub valid: bool,
    /// Group names of required groups without a selection.
    pub missing_specs: Vec<String>,
}

pub trait ConfigurationEngine: Send + Sync {
    fn available_options<'a>(&self, variant: &'a Variant, spec_code: &str)
        -> Vec<&'a MatrixOption>;
    fn initial_selections(&self, variant: &Variant) -> Selection;
    fn cost(&self, variant: &Variant, selections: &Selection) -> Decimal;
    fn validate(&self, variant: &Variant, selections: &Selection) -> ConfigurationValidation;
    fn summary(&self, variant: &Variant, selections: &Selection) -> Vec<String>;
}

#[derive(Default)]
pub struct DeterministicConfigurationEngine;

impl ConfigurationEngine for DeterministicConfigurationEngine {
    fn available_options<'a>(
        &self,
        variant: &'a Variant,
        spec_code: &str,
    ) -> Vec<&'a MatrixOption> {
        get_available_options(variant, spec_code)
    }

    fn initial_selections(&self, variant: &Variant) -> Selection {
        initialize_selections(variant)
    }

    fn cost(&self, variant: &Variant, selections: &Selection) -> Decimal {
        calculate_configuration_cost(variant, selections)
    }

    fn validate(&self, variant: &Variant, selections: &Selection) -> ConfigurationValidation {
        validate_configuration(variant, selections)
    }

    fn summary(&self, variant: &Variant, selections: &Selection) -> Vec<String> {
        generate_configuration_summary(variant, selections)
    }
}

/// Options of `spec_code` that can be picked. Unknown groups yield nothing.
pub fn get_available_options<'a>(variant: &'a Variant, spec_code: &str) -> Vec<&'a MatrixOption> {
    variant
        .specification(spec_code)
        .map(|group| {
            group.options.iter().filter(|option| option.availability.is_available()).collect()
        })
        .unwrap_or_default()
}

/// First standard option of each group, in group order. Groups without a
/// standard option are left out.
pub fn get_standard_options(variant: &Variant) -> Vec<&MatrixOption> {
    variant
        .specifications
        .iter()
        .filter_map(|group| {
            group.options.iter().find(|option| option.availability == AvailabilityLevel::Standard)
        })
        .collect()
}

pub fn initialize_selections(variant: &Variant) -> Selection {
    get_standard_options(variant)
        .into_iter()
        .map(|option| (option.spec_code.clone(), option.option_code.clone()))
        .collect()
}

/// Selected options resolved against the variant, in selection order.
/// Codes that do not resolve are dropped.
fn resolve_selections<'a>(
    variant: &'a Variant,
    selections: &'a Selection,
) -> impl Iterator<Item = &'a MatrixOption> + 'a {
    selections
        .iter()
        .filter_map(move |(spec_code, option_code)| variant.option(spec_code, option_code))
}

/// Sum of cost deltas of selected options above standard. Standard
/// selections never cost anything, whatever their `eur_cost_delta`.
pub fn calculate_configuration_cost(variant: &Variant, selections: &Selection) -> Decimal {
    resolve_selections(variant, selections)
        .filter(|option| option.availability.is_chargeable())
        .map(|option| option.eur_cost_delta)
        .sum()
}

/// A group is required when at least one of its options is available.
pub fn validate_configuration(
    variant: &Variant,
    selections: &Selection,
) -> ConfigurationValidation {
    let missing_specs = variant
        .specifications
        .iter()
        .filter(|group| group.options.iter().any(|option| option.availability.is_available()))
        .filter(|group| !selections.contains_key(&group.group_code))
        .map(|group| group.group_name.clone())
        .collect::<Vec<_>>();

    ConfigurationValidation { valid: missing_specs.is_empty(), missing_specs }
}

/// Title line followed by one line per selected option above standard.
pub fn generate_configuration_summary(variant: &Variant, selections: &Selection) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", variant.variant_name, variant.variant_code)];

    lines.extend(
        resolve_selections(variant, selections)
            .filter(|option| option.availability.is_chargeable())
            .map(|option| {
                if option.eur_cost_delta > Decimal::ZERO {
                    format!("{} (+€{})", option.description, option.eur_cost_delta)
                } else {
                    option.description.clone()
                }
            }),
    );

    lines
}
