//! Spreadsheet → [`Matrix`] import.
//!
//! Column layout is positional: A material number, B long code (option
//! code), C spec code, D description, E..I availability per variant slot.
//! Row 0 is a header and is skipped without being inspected.
//!
//! The import runs in three passes:
//! 1. variant discovery over the model (`1100`) rows,
//! 2. option assignment of every data row to every discovered variant,
//! 3. assembly of the per-variant buckets into specification groups.
//!
//! Row-level problems become warnings. Only an empty sheet, a sheet without
//! data rows, or a sheet without any discoverable variant fails the import.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::matrix::{
    AvailabilityLevel, Matrix, MatrixId, MatrixOption, SpecificationGroup, Variant,
};
use crate::matrix::integrity::check_matrix_integrity;
use crate::matrix::spec_groups::{self, MODEL_SPEC_CODE};
use crate::matrix::variant_code::extract_variant_code;
use crate::matrix::workbook::{read_first_sheet, SheetRow};

pub const COL_MATERIAL_NUMBER: usize = 0;
pub const COL_LONG_CODE: usize = 1;
pub const COL_SPEC_CODE: usize = 2;
pub const COL_DESCRIPTION: usize = 3;
pub const COL_FIRST_SLOT: usize = 4;
pub const VARIANT_SLOTS: usize = 5;

const FIRST_DATA_ROW: usize = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub variants_found: usize,
    pub spec_groups_found: usize,
    pub options_imported: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub matrix: Option<Matrix>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ImportStats,
}

impl ImportResult {
    fn failed(error: impl Into<String>, warnings: Vec<String>) -> Self {
        let error = error.into();
        warn!(event_name = "matrix.import.failed", error = %error, "matrix import aborted");
        Self {
            success: false,
            matrix: None,
            errors: vec![error],
            warnings,
            stats: ImportStats::default(),
        }
    }
}

/// A variant found during discovery, bound to its availability column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredVariant {
    pub code: String,
    pub name: String,
    pub slot: usize,
}

/// Positional view over one data row.
#[derive(Clone, Copy, Debug)]
struct DataRow<'a> {
    sheet_row: usize,
    cells: &'a [String],
}

impl<'a> DataRow<'a> {
    fn cell(&self, column: usize) -> &'a str {
        self.cells.get(column).map(|value| value.trim()).unwrap_or("")
    }

    fn material_number(&self) -> &'a str {
        self.cell(COL_MATERIAL_NUMBER)
    }

    fn option_code(&self) -> &'a str {
        self.cell(COL_LONG_CODE)
    }

    fn spec_code(&self) -> &'a str {
        self.cell(COL_SPEC_CODE)
    }

    fn description(&self) -> &'a str {
        self.cell(COL_DESCRIPTION)
    }

    fn availability(&self, slot: usize) -> AvailabilityLevel {
        AvailabilityLevel::parse(self.cell(COL_FIRST_SLOT + slot))
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|value| value.trim().is_empty())
    }
}

/// Imports the first sheet of a workbook. Unreadable bytes produce a failed
/// result rather than an error.
pub fn import_workbook(bytes: &[u8]) -> ImportResult {
    match read_first_sheet(bytes) {
        Ok(rows) => import_rows(&rows),
        Err(error) => ImportResult::failed(format!("could not read workbook: {error}"), Vec::new()),
    }
}

pub fn import_rows(rows: &[SheetRow]) -> ImportResult {
    if rows.is_empty() || rows.iter().all(|row| row.iter().all(|cell| cell.trim().is_empty())) {
        return ImportResult::failed("sheet is empty", Vec::new());
    }

    let data_rows = rows
        .iter()
        .enumerate()
        .skip(FIRST_DATA_ROW)
        .map(|(index, cells)| DataRow { sheet_row: index + 1, cells })
        .filter(|row| !row.is_blank())
        .collect::<Vec<_>>();

    if data_rows.is_empty() {
        return ImportResult::failed("sheet has no data rows", Vec::new());
    }

    let discovered = discover_variants(&data_rows);
    if discovered.is_empty() {
        return ImportResult::failed(
            format!(
                "no variants found: no `{MODEL_SPEC_CODE}` row has an availability above 0 in any slot"
            ),
            Vec::new(),
        );
    }

    let mut warnings = Vec::new();
    let buckets = assign_options(&data_rows, &discovered, &mut warnings);

    let family = data_rows[0].material_number().to_string();
    if family.is_empty() {
        warnings.push(format!(
            "row {}: first data row has no material number; model family is empty",
            data_rows[0].sheet_row
        ));
    }

    let matrix = assemble_matrix(family, &discovered, buckets);
    warnings.extend(check_matrix_integrity(&matrix).into_iter().map(|issue| issue.to_string()));
    for warning in &warnings {
        warn!(event_name = "matrix.import.warning", warning = %warning, "matrix import warning");
    }

    let stats = collect_stats(&matrix);
    info!(
        event_name = "matrix.import.completed",
        matrix_id = %matrix.id,
        model_family = %matrix.base_model_family,
        variants_found = stats.variants_found,
        spec_groups_found = stats.spec_groups_found,
        options_imported = stats.options_imported,
        warnings = warnings.len(),
        "matrix import completed"
    );

    ImportResult { success: true, matrix: Some(matrix), errors: Vec::new(), warnings, stats }
}

/// First pass: one variant per distinct code derived from model rows with a
/// non-zero slot, in first-seen order.
fn discover_variants(data_rows: &[DataRow<'_>]) -> Vec<DiscoveredVariant> {
    let mut discovered: Vec<DiscoveredVariant> = Vec::new();

    for row in data_rows.iter().filter(|row| row.spec_code() == MODEL_SPEC_CODE) {
        for slot in 0..VARIANT_SLOTS {
            if !row.availability(slot).is_available() {
                continue;
            }

            let code = extract_variant_code(row.description(), slot);
            if discovered.iter().any(|variant| variant.code == code) {
                continue;
            }
            discovered.push(DiscoveredVariant {
                code,
                name: row.description().to_string(),
                slot,
            });
        }
    }

    discovered
}

/// Per variant, spec code buckets in first-seen order.
type VariantBuckets = Vec<Vec<(String, Vec<MatrixOption>)>>;

/// Second pass: every data row becomes one option per discovered variant.
fn assign_options(
    data_rows: &[DataRow<'_>],
    discovered: &[DiscoveredVariant],
    warnings: &mut Vec<String>,
) -> VariantBuckets {
    let mut buckets: VariantBuckets = vec![Vec::new(); discovered.len()];

    for row in data_rows {
        let spec_code = row.spec_code();
        let option_code = row.option_code();
        if spec_code.is_empty() || option_code.is_empty() {
            let missing = match (spec_code.is_empty(), option_code.is_empty()) {
                (true, true) => "spec code and long code",
                (true, false) => "spec code",
                _ => "long code",
            };
            warnings.push(format!("row {}: missing {missing}; row skipped", row.sheet_row));
            continue;
        }

        for (variant, groups) in discovered.iter().zip(buckets.iter_mut()) {
            let option = MatrixOption::new(
                option_code,
                spec_code,
                row.description(),
                row.availability(variant.slot),
            );

            let position = match groups.iter().position(|(code, _)| code == spec_code) {
                Some(position) => position,
                None => {
                    groups.push((spec_code.to_string(), Vec::new()));
                    groups.len() - 1
                }
            };
            let options = &mut groups[position].1;

            if options.iter().any(|existing| existing.option_code == option_code) {
                warnings.push(format!(
                    "row {}: duplicate long code `{option_code}` in spec `{spec_code}` for variant `{}`; first occurrence kept",
                    row.sheet_row, variant.code
                ));
                continue;
            }
            options.push(option);
        }
    }

    buckets
}

/// Third pass.
fn assemble_matrix(
    family: String,
    discovered: &[DiscoveredVariant],
    buckets: VariantBuckets,
) -> Matrix {
    let variants = discovered
        .iter()
        .zip(buckets)
        .map(|(variant, groups)| Variant {
            variant_code: variant.code.clone(),
            variant_name: variant.name.clone(),
            model_code: family.clone(),
            base_eur_cost: Decimal::ZERO,
            specifications: groups
                .into_iter()
                .map(|(group_code, options)| SpecificationGroup {
                    group_name: spec_groups::group_name(&group_code),
                    category: spec_groups::category(&group_code),
                    group_code,
                    options,
                })
                .collect(),
        })
        .collect();

    let now = Utc::now();
    Matrix {
        id: MatrixId::generate(),
        base_model_family: family,
        variants,
        created_at: now,
        updated_at: now,
    }
}

fn collect_stats(matrix: &Matrix) -> ImportStats {
    let mut spec_codes = matrix
        .variants
        .iter()
        .flat_map(|variant| variant.specifications.iter().map(|group| group.group_code.as_str()))
        .collect::<Vec<_>>();
    spec_codes.sort_unstable();
    spec_codes.dedup();

    ImportStats {
        variants_found: matrix.variants.len(),
        spec_groups_found: spec_codes.len(),
        options_imported: matrix
            .variants
            .iter()
            .flat_map(|variant| variant.specifications.iter())
            .map(|group| group.options.len())
            .sum(),
    }
}
