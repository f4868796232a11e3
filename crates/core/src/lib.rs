pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;
pub mod matrix;

pub use cpq::{
    ConfigurationEngine, ConfigurationValidation, ConfiguredPrice, CpqEvaluation,
    CpqEvaluationInput, CpqRuntime, DeterministicConfigurationEngine, DeterministicCpqRuntime,
};
pub use domain::matrix::{
    AvailabilityLevel, Matrix, MatrixDraft, MatrixId, MatrixOption, OptionPatch, Selection,
    SpecificationGroup, Variant,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use matrix::{ImportResult, ImportStats, IntegrityIssue, WorkbookError};
