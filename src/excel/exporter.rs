//! Excel exporter implementation - in-memory Workbook → .xlsx

use super::workbook::{Workbook, Worksheet as SourceSheet};
use crate::core::Sheet;
use crate::error::{GfixError, GfixResult};
use crate::types::CellValue;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

/// Number format applied to cells that stay date-typed
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Writes a (repaired) workbook as .xlsx, one worksheet per source sheet
pub struct ExcelExporter<'a> {
    workbook: &'a Workbook,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Export the workbook to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> GfixResult<()> {
        let mut xlsx = XlsxWorkbook::new();
        let date_format = Format::new().set_num_format(DATE_FORMAT);

        for sheet in self.workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(sheet.name()).map_err(|e| {
                GfixError::Export(format!(
                    "Failed to set worksheet name '{}': {}",
                    sheet.name(),
                    e
                ))
            })?;
            self.export_sheet(worksheet, sheet, &date_format)?;
        }

        xlsx.save(output_path)
            .map_err(|e| GfixError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    /// Write all non-empty cells of one sheet
    fn export_sheet(
        &self,
        worksheet: &mut Worksheet,
        sheet: &SourceSheet,
        date_format: &Format,
    ) -> GfixResult<()> {
        for (row, col, value) in sheet.iter() {
            let col = u16::try_from(col).map_err(|_| {
                GfixError::Export(format!(
                    "Column {} in sheet '{}' exceeds the .xlsx column limit",
                    col,
                    sheet.name()
                ))
            })?;
            self.write_cell_value(worksheet, row, col, value, date_format)?;
        }
        Ok(())
    }

    /// Write a single cell value based on its type
    fn write_cell_value(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
        date_format: &Format,
    ) -> GfixResult<()> {
        let result = match value {
            CellValue::Empty => return Ok(()),
            CellValue::Text(s) | CellValue::Error(s) => worksheet.write_string(row, col, s),
            CellValue::Number(n) => worksheet.write_number(row, col, *n),
            CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
            CellValue::Date(serial) => {
                worksheet.write_number_with_format(row, col, *serial, date_format)
            }
        };

        result.map(|_| ()).map_err(|e| {
            GfixError::Export(format!(
                "Failed to write cell ({}, {}): {}",
                row, col, e
            ))
        })
    }
}
