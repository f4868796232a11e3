//! Static labels for the numeric specification group codes used in vendor
//! configuration sheets.

/// Spec code that marks the model rows used for variant discovery.
pub const MODEL_SPEC_CODE: &str = "1100";

pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecGroupLabel {
    pub code: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

const SPEC_GROUP_LABELS: &[SpecGroupLabel] = &[
    SpecGroupLabel { code: "1100", name: "Model", category: "Base Machine" },
    SpecGroupLabel { code: "1105", name: "Load Capacity", category: "Base Machine" },
    SpecGroupLabel { code: "1110", name: "Chassis", category: "Base Machine" },
    SpecGroupLabel { code: "1120", name: "Drive Unit", category: "Power Train" },
    SpecGroupLabel { code: "1130", name: "Battery Voltage", category: "Power Train" },
    SpecGroupLabel { code: "1135", name: "Battery Technology", category: "Power Train" },
    SpecGroupLabel { code: "1140", name: "Battery Charger", category: "Power Train" },
    SpecGroupLabel { code: "1150", name: "Battery Exchange", category: "Power Train" },
    SpecGroupLabel { code: "1200", name: "Mast Type", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1210", name: "Lift Height", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1220", name: "Fork Carriage", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1230", name: "Forks", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1240", name: "Side Shift", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1250", name: "Hydraulic Functions", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1260", name: "Control Levers", category: "Mast & Hydraulics" },
    SpecGroupLabel { code: "1300", name: "Drive Tyres", category: "Wheels & Tyres" },
    SpecGroupLabel { code: "1310", name: "Steer Tyres", category: "Wheels & Tyres" },
    SpecGroupLabel { code: "1400", name: "Cabin", category: "Operator Environment" },
    SpecGroupLabel { code: "1410", name: "Seat", category: "Operator Environment" },
    SpecGroupLabel { code: "1420", name: "Display", category: "Operator Environment" },
    SpecGroupLabel { code: "1430", name: "Heating", category: "Operator Environment" },
    SpecGroupLabel { code: "1500", name: "Lighting", category: "Safety" },
    SpecGroupLabel { code: "1510", name: "Warning Devices", category: "Safety" },
    SpecGroupLabel { code: "1520", name: "Access Control", category: "Safety" },
    SpecGroupLabel { code: "1600", name: "Telematics", category: "Fleet Management" },
    SpecGroupLabel { code: "1700", name: "Paint", category: "Finish" },
    SpecGroupLabel { code: "1800", name: "Cold Store Package", category: "Application Packages" },
    SpecGroupLabel { code: "1900", name: "Documentation", category: "Delivery" },
];

pub fn lookup(group_code: &str) -> Option<&'static SpecGroupLabel> {
    SPEC_GROUP_LABELS.iter().find(|label| label.code == group_code.trim())
}

pub fn group_name(group_code: &str) -> String {
    match lookup(group_code) {
        Some(label) => label.name.to_string(),
        None => format!("Specification {}", group_code.trim()),
    }
}

pub fn category(group_code: &str) -> String {
    lookup(group_code).map(|label| label.category).unwrap_or(FALLBACK_CATEGORY).to_string()
}

#[cfg(test)]
mod tests {
    use super::{category, group_name, lookup, MODEL_SPEC_CODE, SPEC_GROUP_LABELS};

    #[test]
    fn known_codes_resolve_to_labels() {
        assert_eq!(group_name("1135"), "Battery Technology");
        assert_eq!(category("1135"), "Power Train");
        assert_eq!(group_name(MODEL_SPEC_CODE), "Model");
    }

    #[test]
    fn unknown_codes_get_generic_fallback() {
        assert_eq!(group_name("9999"), "Specification 9999");
        assert_eq!(category("9999"), "Other");
        assert!(lookup("").is_none());
    }

    #[test]
    fn label_table_has_unique_codes() {
        let mut codes = SPEC_GROUP_LABELS.iter().map(|label| label.code).collect::<Vec<_>>();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SPEC_GROUP_LABELS.len());
    }
}
