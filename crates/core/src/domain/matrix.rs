use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatrixId(pub String);

impl MatrixId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for MatrixId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spec group code to chosen option code.
pub type Selection = BTreeMap<String, String>;

/// Parses one `<spec code>=<option code>` pair as typed by an operator.
pub fn parse_selection_pair(raw: &str) -> Result<(String, String), DomainError> {
    let (spec_code, option_code) =
        raw.split_once('=').ok_or_else(|| DomainError::InvalidSelection(raw.to_string()))?;
    let (spec_code, option_code) = (spec_code.trim(), option_code.trim());
    if spec_code.is_empty() || option_code.is_empty() {
        return Err(DomainError::InvalidSelection(raw.to_string()));
    }

    Ok((spec_code.to_string(), option_code.to_string()))
}

/// Policy tag controlling whether an option can be picked and whether its cost
/// delta applies. Ordered by code, so `level > AvailabilityLevel::Standard`
/// reads as "chargeable".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AvailabilityLevel {
    #[default]
    NotAvailable,
    Standard,
    Optional,
    SpecialOrder,
}

impl AvailabilityLevel {
    pub fn code(self) -> u8 {
        match self {
            Self::NotAvailable => 0,
            Self::Standard => 1,
            Self::Optional => 2,
            Self::SpecialOrder => 3,
        }
    }

    /// Strict counterpart of [`Self::from_code`] for operator input.
    pub fn try_from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NotAvailable),
            1 => Some(Self::Standard),
            2 => Some(Self::Optional),
            3 => Some(Self::SpecialOrder),
            _ => None,
        }
    }

    /// Out-of-range codes normalize to `NotAvailable`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Standard,
            2 => Self::Optional,
            3 => Self::SpecialOrder,
            _ => Self::NotAvailable,
        }
    }

    /// Parses a spreadsheet cell: a run of ASCII digits, optionally followed
    /// by a zero fraction such as `"2.0"` from text-typed numeric cells.
    /// Signs, exponents and anything else are `NotAvailable`.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let (digits, fraction) = trimmed.split_once('.').unwrap_or((trimmed, "0"));

        let integral = !digits.is_empty()
            && digits.bytes().all(|byte| byte.is_ascii_digit())
            && !fraction.is_empty()
            && fraction.bytes().all(|byte| byte == b'0');
        if !integral {
            return Self::NotAvailable;
        }

        digits.parse::<i64>().map(Self::from_code).unwrap_or(Self::NotAvailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAvailable => "not_available",
            Self::Standard => "standard",
            Self::Optional => "optional",
            Self::SpecialOrder => "special_order",
        }
    }

    pub fn is_available(self) -> bool {
        self > Self::NotAvailable
    }

    pub fn is_chargeable(self) -> bool {
        self > Self::Standard
    }
}

impl Serialize for AvailabilityLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for AvailabilityLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        Ok(Self::from_code(code))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixOption {
    pub option_code: String,
    pub spec_code: String,
    pub description: String,
    pub availability: AvailabilityLevel,
    pub eur_cost_delta: Decimal,
    pub is_default: bool,
}

impl MatrixOption {
    pub fn new(
        option_code: impl Into<String>,
        spec_code: impl Into<String>,
        description: impl Into<String>,
        availability: AvailabilityLevel,
    ) -> Self {
        Self {
            option_code: option_code.into(),
            spec_code: spec_code.into(),
            description: description.into(),
            availability,
            eur_cost_delta: Decimal::ZERO,
            is_default: availability == AvailabilityLevel::Standard,
        }
    }

    pub fn with_cost(mut self, eur_cost_delta: Decimal) -> Self {
        self.eur_cost_delta = eur_cost_delta;
        self
    }

    /// Merges the set fields of `patch`. `is_default` follows the availability.
    pub fn apply_patch(&mut self, patch: &OptionPatch) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(availability) = patch.availability {
            self.availability = availability;
            self.is_default = availability == AvailabilityLevel::Standard;
        }
        if let Some(eur_cost_delta) = patch.eur_cost_delta {
            self.eur_cost_delta = eur_cost_delta;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPatch {
    pub description: Option<String>,
    pub availability: Option<AvailabilityLevel>,
    pub eur_cost_delta: Option<Decimal>,
}

impl OptionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.availability.is_none() && self.eur_cost_delta.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::InvalidOptionPatch("no field to update".to_string()));
        }
        if self.description.as_deref().is_some_and(|description| description.trim().is_empty()) {
            return Err(DomainError::InvalidOptionPatch(
                "description must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationGroup {
    pub group_code: String,
    pub group_name: String,
    pub category: String,
    pub options: Vec<MatrixOption>,
}

impl SpecificationGroup {
    pub fn option(&self, option_code: &str) -> Option<&MatrixOption> {
        self.options.iter().find(|option| option.option_code == option_code)
    }

    pub fn option_mut(&mut self, option_code: &str) -> Option<&mut MatrixOption> {
        self.options.iter_mut().find(|option| option.option_code == option_code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub variant_code: String,
    pub variant_name: String,
    pub model_code: String,
    pub base_eur_cost: Decimal,
    pub specifications: Vec<SpecificationGroup>,
}

impl Variant {
    pub fn specification(&self, group_code: &str) -> Option<&SpecificationGroup> {
        self.specifications.iter().find(|group| group.group_code == group_code)
    }

    pub fn specification_mut(&mut self, group_code: &str) -> Option<&mut SpecificationGroup> {
        self.specifications.iter_mut().find(|group| group.group_code == group_code)
    }

    pub fn option(&self, group_code: &str, option_code: &str) -> Option<&MatrixOption> {
        self.specification(group_code).and_then(|group| group.option(option_code))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub id: MatrixId,
    pub base_model_family: String,
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Matrix {
    pub fn variant(&self, variant_code: &str) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.variant_code == variant_code)
    }

    pub fn variant_mut(&mut self, variant_code: &str) -> Option<&mut Variant> {
        self.variants.iter_mut().find(|variant| variant.variant_code == variant_code)
    }

    pub fn into_draft(self) -> MatrixDraft {
        MatrixDraft {
            id: self.id,
            base_model_family: self.base_model_family,
            variants: self.variants,
        }
    }
}

/// A matrix as submitted for saving; the repository owns the timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDraft {
    pub id: MatrixId,
    pub base_model_family: String,
    pub variants: Vec<Variant>,
}

impl MatrixDraft {
    pub fn stamp(self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Matrix {
        Matrix {
            id: self.id,
            base_model_family: self.base_model_family,
            variants: self.variants,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::errors::DomainError;

    use super::{parse_selection_pair, AvailabilityLevel, MatrixOption, OptionPatch};

    #[test]
    fn availability_codes_outside_range_fall_back_to_not_available() {
        assert_eq!(AvailabilityLevel::from_code(-1), AvailabilityLevel::NotAvailable);
        assert_eq!(AvailabilityLevel::from_code(4), AvailabilityLevel::NotAvailable);
        assert_eq!(AvailabilityLevel::from_code(3), AvailabilityLevel::SpecialOrder);
    }

    #[test]
    fn availability_parse_is_fail_safe() {
        let cases = [
            ("0", AvailabilityLevel::NotAvailable),
            ("1", AvailabilityLevel::Standard),
            (" 2 ", AvailabilityLevel::Optional),
            ("3", AvailabilityLevel::SpecialOrder),
            ("3.0", AvailabilityLevel::SpecialOrder),
            ("2.5", AvailabilityLevel::NotAvailable),
            ("7", AvailabilityLevel::NotAvailable),
            ("", AvailabilityLevel::NotAvailable),
            ("X", AvailabilityLevel::NotAvailable),
            ("NaN", AvailabilityLevel::NotAvailable),
            ("1e0", AvailabilityLevel::NotAvailable),
            ("+2", AvailabilityLevel::NotAvailable),
            ("-1", AvailabilityLevel::NotAvailable),
            ("2.", AvailabilityLevel::NotAvailable),
            (".0", AvailabilityLevel::NotAvailable),
            ("02", AvailabilityLevel::Optional),
            ("99999999999999999999", AvailabilityLevel::NotAvailable),
        ];

        for (raw, expected) in cases {
            assert_eq!(AvailabilityLevel::parse(raw), expected, "parsing `{raw}`");
        }
    }

    #[test]
    fn only_levels_above_standard_are_chargeable() {
        assert!(!AvailabilityLevel::NotAvailable.is_chargeable());
        assert!(!AvailabilityLevel::Standard.is_chargeable());
        assert!(AvailabilityLevel::Optional.is_chargeable());
        assert!(AvailabilityLevel::SpecialOrder.is_chargeable());
        assert!(!AvailabilityLevel::NotAvailable.is_available());
        assert!(AvailabilityLevel::Standard.is_available());
    }

    #[test]
    fn availability_serializes_as_integer_code() {
        let json = serde_json::to_string(&AvailabilityLevel::Optional).expect("serialize");
        assert_eq!(json, "2");

        let parsed: AvailabilityLevel = serde_json::from_str("9").expect("deserialize");
        assert_eq!(parsed, AvailabilityLevel::NotAvailable);
    }

    #[test]
    fn patch_keeps_default_flag_in_sync_with_availability() {
        let mut option =
            MatrixOption::new("OPT-CAB", "1400", "Weather cabin", AvailabilityLevel::Standard);
        assert!(option.is_default);

        option.apply_patch(&OptionPatch {
            availability: Some(AvailabilityLevel::Optional),
            eur_cost_delta: Some(Decimal::new(125_000, 2)),
            ..OptionPatch::default()
        });

        assert!(!option.is_default);
        assert_eq!(option.eur_cost_delta, Decimal::new(125_000, 2));
        assert_eq!(option.description, "Weather cabin");
    }

    #[test]
    fn strict_availability_codes_reject_out_of_range() {
        assert_eq!(AvailabilityLevel::try_from_code(0), Some(AvailabilityLevel::NotAvailable));
        assert_eq!(AvailabilityLevel::try_from_code(2), Some(AvailabilityLevel::Optional));
        assert_eq!(AvailabilityLevel::try_from_code(4), None);
    }

    #[test]
    fn empty_or_blank_patches_are_rejected() {
        assert!(matches!(
            OptionPatch::default().validate(),
            Err(DomainError::InvalidOptionPatch(_))
        ));
        let blank = OptionPatch { description: Some("  ".to_string()), ..OptionPatch::default() };
        assert!(blank.validate().is_err());

        let cost_only =
            OptionPatch { eur_cost_delta: Some(Decimal::new(5_000, 2)), ..OptionPatch::default() };
        assert_eq!(cost_only.validate(), Ok(()));
    }

    #[test]
    fn selection_pairs_need_both_codes() {
        assert_eq!(
            parse_selection_pair(" 1135 = OPT-BATT-LI "),
            Ok(("1135".to_string(), "OPT-BATT-LI".to_string()))
        );
        assert_eq!(
            parse_selection_pair("1135"),
            Err(DomainError::InvalidSelection("1135".to_string()))
        );
        assert!(parse_selection_pair("=OPT").is_err());
        assert!(parse_selection_pair("1135=").is_err());
    }
}
