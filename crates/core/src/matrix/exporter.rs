//! [`Matrix`] → spreadsheet export, the inverse of the importer, for
//! round-trip editing in a spreadsheet tool.
//!
//! When one option code carries different descriptions across variants only
//! the first one encountered is written.

use std::collections::BTreeSet;

use crate::domain::matrix::{AvailabilityLevel, Matrix, MatrixOption};
use crate::matrix::workbook::{write_sheet, CellValue, SheetRow, WorkbookError};

pub const EXPORT_SHEET_NAME: &str = "Configuration Matrix";

const FIXED_HEADERS: [&str; 4] = ["Material Number", "Long Code", "Spec Code", "Description"];

/// Header plus one row per distinct option code per spec code. Availability
/// columns follow `matrix.variants` order.
pub fn export_rows(matrix: &Matrix) -> Vec<SheetRow> {
    let mut rows = vec![header_row(matrix)];

    for spec_code in sorted_spec_codes(matrix) {
        for option in distinct_options(matrix, &spec_code) {
            let mut row = vec![
                matrix.base_model_family.clone(),
                option.option_code.clone(),
                spec_code.clone(),
                option.description.clone(),
            ];
            row.extend(matrix.variants.iter().map(|variant| {
                variant
                    .option(&spec_code, &option.option_code)
                    .map(|found| found.availability)
                    .unwrap_or(AvailabilityLevel::NotAvailable)
                    .code()
                    .to_string()
            }));
            rows.push(row);
        }
    }

    rows
}

pub fn export_workbook(matrix: &Matrix) -> Result<Vec<u8>, WorkbookError> {
    export_workbook_named(matrix, EXPORT_SHEET_NAME)
}

pub fn export_workbook_named(matrix: &Matrix, sheet_name: &str) -> Result<Vec<u8>, WorkbookError> {
    let cells = export_rows(matrix)
        .into_iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.into_iter()
                .enumerate()
                .map(|(col_idx, value)| {
                    if row_idx > 0 && col_idx >= FIXED_HEADERS.len() {
                        value
                            .parse::<i64>()
                            .map(CellValue::Integer)
                            .unwrap_or_else(|_| CellValue::Text(value))
                    } else {
                        CellValue::Text(value)
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    write_sheet(sheet_name, &cells)
}

fn header_row(matrix: &Matrix) -> SheetRow {
    FIXED_HEADERS
        .iter()
        .map(|header| header.to_string())
        .chain(matrix.variants.iter().map(|variant| variant.variant_code.clone()))
        .collect()
}

fn sorted_spec_codes(matrix: &Matrix) -> BTreeSet<String> {
    matrix
        .variants
        .iter()
        .flat_map(|variant| variant.specifications.iter())
        .map(|group| group.group_code.clone())
        .collect()
}

/// Union of options under `spec_code` across variants, first occurrence wins.
fn distinct_options<'a>(matrix: &'a Matrix, spec_code: &str) -> Vec<&'a MatrixOption> {
    let mut options: Vec<&MatrixOption> = Vec::new();
    let groups = matrix
        .variants
        .iter()
        .flat_map(|variant| variant.specifications.iter())
        .filter(|group| group.group_code == spec_code);

    for group in groups {
        for option in &group.options {
            if !options.iter().any(|seen| seen.option_code == option.option_code) {
                options.push(option);
            }
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::domain::matrix::{AvailabilityLevel, Matrix};
    use crate::matrix::importer::{import_rows, import_workbook};
    use crate::matrix::workbook::{read_first_sheet, SheetRow};

    use super::{export_rows, export_workbook};

    fn row(cells: &[&str]) -> SheetRow {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn vendor_sheet() -> Vec<SheetRow> {
        vec![
            row(&["Material Number", "Long Code", "Spec Code", "Description"]),
            row(&["5210001", "MOD-EG16P", "1100", "EG16P Three-wheel", "1", "0"]),
            row(&["5210001", "MOD-EG18P", "1100", "EG18P Four-wheel", "0", "1"]),
            row(&["5210001", "OPT-CAB", "1400", "Weather cabin", "0", "2"]),
            row(&["5210001", "OPT-BATT-PB", "1135", "Lead-acid", "1", "1"]),
            row(&["5210001", "OPT-BATT-LI", "1135", "Lithium-ion", "2", "3"]),
        ]
    }

    fn imported() -> Matrix {
        import_rows(&vendor_sheet()).matrix.expect("matrix")
    }

    fn tuples(matrix: &Matrix) -> BTreeSet<(String, String, String, u8)> {
        matrix
            .variants
            .iter()
            .flat_map(|variant| {
                variant.specifications.iter().flat_map(move |group| {
                    group.options.iter().map(move |option| {
                        (
                            variant.variant_code.clone(),
                            group.group_code.clone(),
                            option.option_code.clone(),
                            option.availability.code(),
                        )
                    })
                })
            })
            .collect()
    }

    #[test]
    fn rows_are_grouped_by_sorted_spec_code() {
        let rows = export_rows(&imported());

        assert_eq!(
            rows[0],
            row(&["Material Number", "Long Code", "Spec Code", "Description", "EG16P", "EG18P"])
        );
        let spec_column = rows[1..].iter().map(|r| r[2].as_str()).collect::<Vec<_>>();
        assert_eq!(spec_column, vec!["1100", "1100", "1135", "1135", "1400"]);
        assert_eq!(rows[5], row(&["5210001", "OPT-CAB", "1400", "Weather cabin", "0", "2"]));
    }

    #[test]
    fn missing_options_export_as_not_available() {
        let mut matrix = imported();
        matrix.variants[1].specifications.retain(|group| group.group_code != "1400");

        let rows = export_rows(&matrix);
        let cab = rows.iter().find(|r| r[1] == "OPT-CAB").expect("cab row");
        assert_eq!(cab[4..], ["0".to_string(), "0".to_string()]);
    }

    #[test]
    fn first_description_wins_for_shared_option_codes() {
        let mut matrix = imported();
        let renamed = matrix.variants[1]
            .specification_mut("1135")
            .and_then(|group| group.option_mut("OPT-BATT-LI"))
            .expect("lithium");
        renamed.description = "Lithium-ion 48V".to_string();

        let rows = export_rows(&matrix);
        let lithium = rows.iter().find(|r| r[1] == "OPT-BATT-LI").expect("lithium row");
        assert_eq!(lithium[3], "Lithium-ion");
    }

    #[test]
    fn reimporting_export_preserves_availability_tuples() {
        let original = imported();
        let reimported = import_rows(&export_rows(&original)).matrix.expect("reimported");

        assert_eq!(tuples(&reimported), tuples(&original));
        assert_eq!(reimported.base_model_family, original.base_model_family);
    }

    #[test]
    fn workbook_round_trip_preserves_availability_tuples() {
        let original = imported();
        let bytes = export_workbook(&original).expect("export");

        let rows = read_first_sheet(&bytes).expect("read");
        assert_eq!(rows[0][4], "EG16P");

        let result = import_workbook(&bytes);
        assert!(result.success, "errors: {:?}", result.errors);
        let reimported = result.matrix.expect("matrix");
        assert_eq!(tuples(&reimported), tuples(&original));
        let lithium = reimported.variant("EG18P").and_then(|v| v.option("1135", "OPT-BATT-LI"));
        assert_eq!(lithium.map(|o| o.availability), Some(AvailabilityLevel::SpecialOrder));
    }

    #[test]
    fn placeholder_codes_follow_the_export_column_on_reimport() {
        let sheet = vec![
            row(&["Material Number", "Long Code", "Spec Code", "Description"]),
            row(&["5210001", "MOD-A", "1100", "three wheel", "0", "0", "1"]),
            row(&["5210001", "OPT-A", "1135", "Lead-acid", "1", "1", "1"]),
        ];
        let original = import_rows(&sheet).matrix.expect("matrix");
        assert_eq!(original.variants[0].variant_code, "VARIANT_3");

        let rows = export_rows(&original);
        assert_eq!(rows[1][4..], ["1".to_string()]);

        let reimported = import_rows(&rows).matrix.expect("reimported");
        assert_eq!(reimported.variants[0].variant_code, "VARIANT_1");
        assert_eq!(
            reimported.variants[0].option("1135", "OPT-A").map(|o| o.availability),
            Some(AvailabilityLevel::Standard)
        );
    }
}
