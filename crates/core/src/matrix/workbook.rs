use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use rust_xlsxwriter::Workbook;
use thiserror::Error;

/// One spreadsheet row with every cell rendered as text.
pub type SheetRow = Vec<String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkbookError {
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("failed to read workbook: {0}")]
    Read(String),
    #[error("failed to write workbook: {0}")]
    Write(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Reads the first sheet of an xlsx/xls/ods document held in memory.
///
/// Rows and columns before the first used cell are padded with empty strings
/// so callers can rely on fixed column offsets from `A1`.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<SheetRow>, WorkbookError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|error| WorkbookError::Read(error.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|error| WorkbookError::Read(error.to_string()))?,
        None => return Err(WorkbookError::NoSheets),
    };

    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &Range<Data>) -> Vec<SheetRow> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<SheetRow> = (0..start_row).map(|_| Vec::new()).collect();
    for cells in range.rows() {
        let mut row = vec![String::new(); start_col as usize];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }
    rows
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.is_finite() && value.fract() == 0.0 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}

/// Writes `rows` into a single-sheet xlsx document and returns its bytes.
pub fn write_sheet(sheet_name: &str, rows: &[Vec<CellValue>]) -> Result<Vec<u8>, WorkbookError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|error| WorkbookError::Write(format!("sheet `{sheet_name}`: {error}")))?;

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| WorkbookError::Write(format!("row index {row_idx} out of range")))?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx).map_err(|_| {
                WorkbookError::Write(format!("column index {col_idx} out of range"))
            })?;
            let written = match cell {
                CellValue::Text(value) if value.is_empty() => continue,
                CellValue::Text(value) => worksheet.write_string(row_num, col_num, value),
                CellValue::Integer(value) => {
                    worksheet.write_number(row_num, col_num, *value as f64)
                }
            };
            written.map_err(|error| WorkbookError::Write(error.to_string()))?;
        }
    }

    workbook.save_to_buffer().map_err(|error| WorkbookError::Write(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{read_first_sheet, write_sheet, CellValue, WorkbookError};

    #[test]
    fn written_sheet_reads_back_as_text_cells() {
        let rows = vec![
            vec![CellValue::from("Material Number"), CellValue::from("Long Code")],
            vec![CellValue::from("5210001"), CellValue::from("OPT-A"), CellValue::Integer(2)],
        ];

        let bytes = write_sheet("Configuration Matrix", &rows).expect("write workbook");
        let read = read_first_sheet(&bytes).expect("read workbook");

        assert_eq!(
            read[0],
            vec!["Material Number".to_string(), "Long Code".to_string(), String::new()]
        );
        assert_eq!(read[1], vec!["5210001".to_string(), "OPT-A".to_string(), "2".to_string()]);
    }

    #[test]
    fn leading_empty_columns_keep_fixed_offsets() {
        let rows = vec![
            vec![CellValue::from(""), CellValue::from("header")],
            vec![CellValue::from(""), CellValue::from("OPT-A")],
        ];

        let bytes = write_sheet("Sheet1", &rows).expect("write workbook");
        let read = read_first_sheet(&bytes).expect("read workbook");

        assert_eq!(read[1], vec![String::new(), "OPT-A".to_string()]);
    }

    #[test]
    fn garbage_bytes_are_a_read_error() {
        let error = read_first_sheet(b"definitely not a workbook").expect_err("must fail");
        assert!(matches!(error, WorkbookError::Read(_)));
    }

    #[test]
    fn invalid_sheet_name_is_a_write_error() {
        let error = write_sheet("bad/name?", &[]).expect_err("must fail");
        assert!(matches!(error, WorkbookError::Write(_)));
    }
}
