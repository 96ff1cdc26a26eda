//! Spreadsheet I/O
//!
//! The document side of the restoration:
//! - Import: .xlsx/.xls/.ods → in-memory Workbook (calamine)
//! - Export: Workbook → .xlsx (rust_xlsxwriter)

mod exporter;
mod importer;
mod workbook;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
pub use workbook::{Workbook, Worksheet};
