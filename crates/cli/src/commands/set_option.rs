use clap::Args;
use liftquote_core::domain::matrix::{AvailabilityLevel, MatrixId, OptionPatch};
use liftquote_core::errors::DomainError;
use rust_decimal::Decimal;
use serde_json::json;

use crate::commands::{with_session, CommandFailure, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct SetOptionArgs {
    #[arg(help = "Matrix id as printed by `import` or `list`")]
    pub matrix_id: String,
    pub variant_code: String,
    pub spec_code: String,
    pub option_code: String,
    #[arg(
        long,
        help = "Availability code: 0 not available, 1 standard, 2 optional, 3 special order"
    )]
    pub availability: Option<i64>,
    #[arg(long, help = "EUR cost delta above the variant base price, e.g. 1850.50")]
    pub cost: Option<Decimal>,
    #[arg(long)]
    pub description: Option<String>,
}

impl SetOptionArgs {
    fn patch(&self) -> Result<OptionPatch, DomainError> {
        let availability = self
            .availability
            .map(|code| {
                AvailabilityLevel::try_from_code(code).ok_or_else(|| {
                    DomainError::InvalidOptionPatch(format!(
                        "availability must be between 0 and 3, got {code}"
                    ))
                })
            })
            .transpose()?;

        let patch = OptionPatch {
            description: self.description.clone(),
            availability,
            eur_cost_delta: self.cost,
        };
        patch.validate()?;
        Ok(patch)
    }
}

pub fn run(args: &SetOptionArgs) -> CommandResult {
    let patch = match args.patch() {
        Ok(patch) => patch,
        Err(error) => {
            let failure = CommandFailure::from(error);
            return CommandResult::failure(
                "set-option",
                failure.error_class,
                failure.message,
                failure.exit_code,
            );
        }
    };

    with_session("set-option", |session| async move {
        let matrix_id = MatrixId(args.matrix_id.clone());
        session
            .repository
            .update_option(
                &matrix_id,
                &args.variant_code,
                &args.spec_code,
                &args.option_code,
                &patch,
            )
            .await?;

        let data = json!({
            "matrix_id": matrix_id.0,
            "variant_code": args.variant_code,
            "spec_code": args.spec_code,
            "option_code": args.option_code,
            "patch": patch,
        });
        Ok(CommandResult::success_with_data(
            "set-option",
            format!("updated option `{}`", args.option_code),
            data,
        ))
    })
}

#[cfg(test)]
mod tests {
    use liftquote_core::domain::matrix::AvailabilityLevel;
    use liftquote_core::errors::DomainError;
    use rust_decimal::Decimal;

    use super::SetOptionArgs;

    fn args() -> SetOptionArgs {
        SetOptionArgs {
            matrix_id: "M-1".to_string(),
            variant_code: "EG16P".to_string(),
            spec_code: "1135".to_string(),
            option_code: "OPT-BATT-LI".to_string(),
            availability: None,
            cost: None,
            description: None,
        }
    }

    #[test]
    fn builds_patch_from_flags() {
        let patch = SetOptionArgs {
            availability: Some(3),
            cost: Some(Decimal::new(185_050, 2)),
            ..args()
        }
        .patch()
        .expect("valid patch");

        assert_eq!(patch.availability, Some(AvailabilityLevel::SpecialOrder));
        assert_eq!(patch.eur_cost_delta, Some(Decimal::new(185_050, 2)));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn rejects_out_of_range_availability_and_empty_patch() {
        let out_of_range = SetOptionArgs { availability: Some(9), ..args() }.patch();
        assert!(matches!(out_of_range, Err(DomainError::InvalidOptionPatch(_))));

        assert!(matches!(args().patch(), Err(DomainError::InvalidOptionPatch(_))));
    }
}
