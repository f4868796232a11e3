use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::matrix::{AvailabilityLevel, Matrix};

/// Advisory findings about uniqueness and default expectations of a matrix.
/// None of them block an import or a save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    DuplicateVariant { variant_code: String },
    DuplicateSpecGroup { variant_code: String, group_code: String },
    DuplicateOption { variant_code: String, group_code: String, option_code: String },
    MultipleStandardOptions { variant_code: String, group_code: String, count: usize },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateVariant { variant_code } => {
                write!(f, "variant `{variant_code}` appears more than once")
            }
            Self::DuplicateSpecGroup { variant_code, group_code } => {
                write!(f, "variant `{variant_code}` has spec group `{group_code}` more than once")
            }
            Self::DuplicateOption { variant_code, group_code, option_code } => write!(
                f,
                "variant `{variant_code}` spec `{group_code}` has option `{option_code}` more than once"
            ),
            Self::MultipleStandardOptions { variant_code, group_code, count } => write!(
                f,
                "variant `{variant_code}` spec `{group_code}` has {count} standard options; the first one is used as default"
            ),
        }
    }
}

pub fn check_matrix_integrity(matrix: &Matrix) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    let mut seen_variants: Vec<&str> = Vec::new();

    for variant in &matrix.variants {
        let variant_code = variant.variant_code.as_str();
        if seen_variants.contains(&variant_code) {
            issues.push(IntegrityIssue::DuplicateVariant {
                variant_code: variant_code.to_string(),
            });
        } else {
            seen_variants.push(variant_code);
        }

        let mut seen_groups: Vec<&str> = Vec::new();
        for group in &variant.specifications {
            let group_code = group.group_code.as_str();
            if seen_groups.contains(&group_code) {
                issues.push(IntegrityIssue::DuplicateSpecGroup {
                    variant_code: variant_code.to_string(),
                    group_code: group_code.to_string(),
                });
            } else {
                seen_groups.push(group_code);
            }

            let mut seen_options: Vec<&str> = Vec::new();
            for option in &group.options {
                let option_code = option.option_code.as_str();
                if seen_options.contains(&option_code) {
                    issues.push(IntegrityIssue::DuplicateOption {
                        variant_code: variant_code.to_string(),
                        group_code: group_code.to_string(),
                        option_code: option_code.to_string(),
                    });
                } else {
                    seen_options.push(option_code);
                }
            }

            let standard_count = group
                .options
                .iter()
                .filter(|option| option.availability == AvailabilityLevel::Standard)
                .count();
            if standard_count > 1 {
                issues.push(IntegrityIssue::MultipleStandardOptions {
                    variant_code: variant_code.to_string(),
                    group_code: group_code.to_string(),
                    count: standard_count,
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::matrix::{
        AvailabilityLevel, Matrix, MatrixId, MatrixOption, SpecificationGroup, Variant,
    };

    use super::{check_matrix_integrity, IntegrityIssue};

    fn group(code: &str, options: Vec<MatrixOption>) -> SpecificationGroup {
        SpecificationGroup {
            group_code: code.to_string(),
            group_name: format!("Specification {code}"),
            category: "Other".to_string(),
            options,
        }
    }

    fn variant(code: &str, specifications: Vec<SpecificationGroup>) -> Variant {
        Variant {
            variant_code: code.to_string(),
            variant_name: code.to_string(),
            model_code: "5210001".to_string(),
            base_eur_cost: Decimal::ZERO,
            specifications,
        }
    }

    fn matrix(variants: Vec<Variant>) -> Matrix {
        Matrix {
            id: MatrixId("M-1".to_string()),
            base_model_family: "5210001".to_string(),
            variants,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn clean_matrix_has_no_issues() {
        let clean = matrix(vec![variant(
            "EG16P",
            vec![group(
                "1135",
                vec![
                    MatrixOption::new("A", "1135", "Lead-acid", AvailabilityLevel::Standard),
                    MatrixOption::new("B", "1135", "Lithium", AvailabilityLevel::Optional),
                ],
            )],
        )]);

        assert!(check_matrix_integrity(&clean).is_empty());
    }

    #[test]
    fn reports_each_kind_of_issue() {
        let duplicate = MatrixOption::new("A", "1135", "Lead-acid", AvailabilityLevel::Standard);
        let broken = matrix(vec![
            variant(
                "EG16P",
                vec![
                    group("1135", vec![duplicate.clone(), duplicate]),
                    group("1135", Vec::new()),
                ],
            ),
            variant("EG16P", Vec::new()),
        ]);

        let issues = check_matrix_integrity(&broken);

        assert_eq!(
            issues,
            vec![
                IntegrityIssue::DuplicateOption {
                    variant_code: "EG16P".to_string(),
                    group_code: "1135".to_string(),
                    option_code: "A".to_string(),
                },
                IntegrityIssue::MultipleStandardOptions {
                    variant_code: "EG16P".to_string(),
                    group_code: "1135".to_string(),
                    count: 2,
                },
                IntegrityIssue::DuplicateSpecGroup {
                    variant_code: "EG16P".to_string(),
                    group_code: "1135".to_string(),
                },
                IntegrityIssue::DuplicateVariant { variant_code: "EG16P".to_string() },
            ]
        );
    }
}
