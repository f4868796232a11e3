pub mod configuration;
pub mod pricing;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::matrix::{Selection, Variant};

pub use configuration::{
    calculate_configuration_cost, generate_configuration_summary, get_available_options,
    get_standard_options, initialize_selections, validate_configuration, ConfigurationEngine,
    ConfigurationValidation, DeterministicConfigurationEngine,
};
pub use pricing::{
    price_configuration, ConfiguredPrice, DeterministicPricingEngine, PricingEngine,
    PricingTrace, PricingTraceStep,
};

#[derive(Clone, Debug)]
pub struct CpqEvaluationInput<'a> {
    pub variant: &'a Variant,
    pub selections: &'a Selection,
    pub currency: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpqEvaluation {
    pub validation: ConfigurationValidation,
    pub options_cost: Decimal,
    pub summary: Vec<String>,
    pub price: ConfiguredPrice,
}

pub trait CpqRuntime: Send + Sync {
    fn evaluate_configuration(&self, input: CpqEvaluationInput<'_>) -> CpqEvaluation;
}

pub struct DeterministicCpqRuntime<C, P> {
    configuration_engine: C,
    pricing_engine: P,
}

impl<C, P> DeterministicCpqRuntime<C, P> {
    pub fn new(configuration_engine: C, pricing_engine: P) -> Self {
        Self { configuration_engine, pricing_engine }
    }
}

impl Default
    for DeterministicCpqRuntime<DeterministicConfigurationEngine, DeterministicPricingEngine>
{
    fn default() -> Self {
        Self::new(DeterministicConfigurationEngine, DeterministicPricingEngine)
    }
}

impl<C, P> CpqRuntime for DeterministicCpqRuntime<C, P>
where
    C: ConfigurationEngine,
    P: PricingEngine,
{
    fn evaluate_configuration(&self, input: CpqEvaluationInput<'_>) -> CpqEvaluation {
        let validation = self.configuration_engine.validate(input.variant, input.selections);
        let options_cost = self.configuration_engine.cost(input.variant, input.selections);
        let summary = self.configuration_engine.summary(input.variant, input.selections);
        let price = self.pricing_engine.price(input.variant, input.selections, input.currency);

        CpqEvaluation { validation, options_cost, summary, price }
    }
}
