//! Spreadsheet primitives
//!
//! Workbooks are read with `calamine` into a plain [`Sheet`] model and written
//! with `rust_xlsxwriter`. Only cell values survive the round trip: styling of
//! the source workbooks is not carried over and formulas keep their cached
//! result only.

use crate::domain::{Result, VsweepError};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Longest worksheet name Excel accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Largest integer an xlsx number cell holds exactly
const MAX_EXACT_INT: u64 = 1 << 53;

/// One cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date/time
    DateTime(f64),
    /// Cell error such as `#N/A`, kept as its display text
    Error(String),
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) if i.unsigned_abs() <= MAX_EXACT_INT => Cell::Number(*i as f64),
            // Beyond f64 precision, keep the digits as text
            Data::Int(i) => Cell::Text(i.to_string()),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}

/// One worksheet: a name and a grid of cells anchored at `origin`
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Zero-based (row, column) of the top-left cell
    pub origin: (u32, u32),
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates a sheet anchored at A1
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            origin: (0, 0),
            rows,
        }
    }

    /// True if the sheet has no rows beyond a header
    pub fn is_empty(&self) -> bool {
        self.data_row_count() == 0
    }

    /// Rows after the header row
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Reads every worksheet of a workbook, in workbook order
pub fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let origin = range.start().unwrap_or((0, 0));
        let rows = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();
        sheets.push(Sheet { name, origin, rows });
    }

    Ok(sheets)
}

/// Lists worksheet names without loading cell data
pub fn list_sheets(path: &Path) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Writes sheets to a new workbook, replacing any existing file
pub fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        let (first_row, first_col) = sheet.origin;
        for (row_offset, cells) in sheet.rows.iter().enumerate() {
            let row = first_row + u32::try_from(row_offset).map_err(|_| too_large(&sheet.name))?;
            for (col_offset, cell) in cells.iter().enumerate() {
                let col = u32::try_from(col_offset)
                    .ok()
                    .and_then(|c| u16::try_from(first_col + c).ok())
                    .ok_or_else(|| too_large(&sheet.name))?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) | Cell::Error(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(row, col, *b)?;
                    }
                    Cell::DateTime(serial) => {
                        worksheet.write_number_with_format(row, col, *serial, &date_format)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn too_large(sheet: &str) -> VsweepError {
    VsweepError::Workbook(format!("sheet {sheet} exceeds worksheet limits"))
}
