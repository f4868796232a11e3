pub mod exporter;
pub mod importer;
pub mod integrity;
pub mod spec_groups;
pub mod variant_code;
pub mod workbook;

pub use exporter::{export_rows, export_workbook, export_workbook_named, EXPORT_SHEET_NAME};
pub use importer::{import_rows, import_workbook, ImportResult, ImportStats};
pub use integrity::{check_matrix_integrity, IntegrityIssue};
pub use variant_code::extract_variant_code;
pub use workbook::{read_first_sheet, write_sheet, CellValue, SheetRow, WorkbookError};
