//! Excel importer implementation - spreadsheet file → in-memory Workbook

use super::workbook::{Workbook, Worksheet};
use crate::core::DateSystem;
use crate::error::{GfixError, GfixResult};
use crate::types::CellValue;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads .xlsx/.xlsm/.xlsb/.xls/.ods workbooks, header rows included.
///
/// Date cells come out as 1900-system serials whatever epoch the file uses,
/// so the rest of the pipeline never deals with 1904 workbooks.
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load every worksheet. Sheets calamine cannot read (charts, dialogs)
    /// are skipped with a warning.
    pub fn import(&self) -> GfixResult<Workbook> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            GfixError::Import(format!(
                "Failed to open '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let mut book = Workbook::new();
        for sheet_name in workbook.sheet_names() {
            match workbook.worksheet_range(&sheet_name) {
                Ok(range) => {
                    let sheet = self.convert_sheet(&sheet_name, &range);
                    debug!(sheet = %sheet_name, cells = sheet.len(), "sheet loaded");
                    book.add_sheet(sheet);
                }
                Err(e) => warn!(sheet = %sheet_name, error = %e, "skipping unreadable sheet"),
            }
        }

        Ok(book)
    }

    /// Copy non-empty cells, translating range-relative positions to
    /// absolute sheet coordinates
    fn convert_sheet(&self, sheet_name: &str, range: &Range<Data>) -> Worksheet {
        let mut sheet = Worksheet::new(sheet_name);
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        for (row, col, cell) in range.used_cells() {
            let value = self.convert_cell(cell);
            sheet.set(start_row + row as u32, start_col + col as u32, value);
        }

        sheet
    }

    /// Convert a calamine cell to a CellValue
    fn convert_cell(&self, cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
            // Serials the 1900 calendar cannot represent (the fictitious
            // 1900-02-29, day 0) keep their raw value
            Data::DateTime(dt) => CellValue::Date(excel_date_serial(dt).unwrap_or(dt.as_f64())),
            Data::DateTimeIso(s) => iso_date_serial(s)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

/// Re-encode a date cell as a 1900-system serial, decoding it with the
/// epoch of the workbook it came from. The time of day is kept.
fn excel_date_serial(dt: &ExcelDateTime) -> Option<f64> {
    let (year, month, day, ..) = dt.to_ymd_hms_milli();
    let date = NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())?;
    DateSystem::V1900
        .encode_date(date)
        .map(|serial| serial + dt.as_f64().fract())
}

/// 1900-system serial for an ISO 8601 date or datetime ("2024-04-18",
/// "2024-04-18T13:45:00"), as OpenDocument stores date cells
fn iso_date_serial(value: &str) -> Option<f64> {
    let datetime = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok()?;
    let serial = DateSystem::V1900.encode_date(datetime.date())?;
    let seconds = datetime.time().num_seconds_from_midnight() as f64;
    Some(serial + seconds / 86_400.0)
}
