use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::configuration::calculate_configuration_cost;
use crate::domain::matrix::{Selection, Variant};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub variant_code: String,
    pub currency: String,
    pub steps: Vec<PricingTraceStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredPrice {
    pub base: Decimal,
    pub options_total: Decimal,
    pub total: Decimal,
    pub trace: PricingTrace,
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, variant: &Variant, selections: &Selection, currency: &str) -> ConfiguredPrice;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, variant: &Variant, selections: &Selection, currency: &str) -> ConfiguredPrice {
        price_configuration(variant, selections, currency)
    }
}

/// Base cost of the variant plus the chargeable option deltas, with one trace
/// step per contributing option.
pub fn price_configuration(
    variant: &Variant,
    selections: &Selection,
    currency: &str,
) -> ConfiguredPrice {
    let base = variant.base_eur_cost;
    let options_total = calculate_configuration_cost(variant, selections);

    let mut steps = vec![PricingTraceStep {
        stage: "base".to_string(),
        detail: format!("variant {} base cost", variant.variant_code),
        amount: base,
    }];
    steps.extend(
        selections
            .iter()
            .filter_map(|(spec_code, option_code)| variant.option(spec_code, option_code))
            .filter(|option| option.availability.is_chargeable())
            .map(|option| PricingTraceStep {
                stage: "option".to_string(),
                detail: format!(
                    "{}/{} {} ({})",
                    option.spec_code,
                    option.option_code,
                    option.description,
                    option.availability.as_str()
                ),
                amount: option.eur_cost_delta,
            }),
    );

    ConfiguredPrice {
        base,
        options_total,
        total: base + options_total,
        trace: PricingTrace {
            variant_code: variant.variant_code.clone(),
            currency: currency.to_string(),
            steps,
        },
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::matrix::{
        AvailabilityLevel, MatrixOption, Selection, SpecificationGroup, Variant,
    };

    use super::{price_configuration, DeterministicPricingEngine, PricingEngine};

    fn variant_fixture() -> Variant {
        Variant {
            variant_code: "EG16P".to_string(),
            variant_name: "EG16P Three-wheel".to_string(),
            model_code: "5210001".to_string(),
            base_eur_cost: Decimal::new(2_450_000, 2),
            specifications: vec![SpecificationGroup {
                group_code: "1135".to_string(),
                group_name: "Battery Technology".to_string(),
                category: "Power Train".to_string(),
                options: vec![
                    MatrixOption::new("PB", "1135", "Lead-acid", AvailabilityLevel::Standard)
                        .with_cost(Decimal::new(10_000, 2)),
                    MatrixOption::new("LI", "1135", "Lithium-ion", AvailabilityLevel::Optional)
                        .with_cost(Decimal::new(420_000, 2)),
                ],
            }],
        }
    }

    #[test]
    fn total_is_base_plus_chargeable_options() {
        let mut selections = Selection::new();
        selections.insert("1135".to_string(), "LI".to_string());

        let price = price_configuration(&variant_fixture(), &selections, "EUR");

        assert_eq!(price.base, Decimal::new(2_450_000, 2));
        assert_eq!(price.options_total, Decimal::new(420_000, 2));
        assert_eq!(price.total, Decimal::new(2_870_000, 2));
        assert_eq!(price.trace.steps.len(), 2);
        assert_eq!(price.trace.steps[1].detail, "1135/LI Lithium-ion (optional)");
        assert_eq!(price.trace.currency, "EUR");
    }

    #[test]
    fn standard_selection_prices_at_base() {
        let mut selections = Selection::new();
        selections.insert("1135".to_string(), "PB".to_string());

        let price = DeterministicPricingEngine.price(&variant_fixture(), &selections, "EUR");

        assert_eq!(price.total, price.base);
        assert_eq!(price.trace.steps.len(), 1);
        assert_eq!(price.trace.steps[0].stage, "base");
    }
}
