//! gfix - restore gene symbols mangled into dates by spreadsheet software
//!
//! Spreadsheet applications silently turn symbols such as `MARCH1` or
//! `SEPT2` into dates (`1-Mar`, `2-Sep`). This library recognizes those
//! dates in every representation a workbook can hold them in and puts the
//! current HGNC symbol (`MARCHF1`, `SEPTIN2`) back, recording each change.
//!
//! # Features
//!
//! - Closed, validated table of known corruptions (MARCHF*, SEPTIN*, SELENOF, DELEC1)
//! - Date normalization across text forms and 1900/1904 serial dates
//! - Ordered per-sheet change reports (terminal, JSON, YAML)
//! - Excel import/export
//!
//! # Example
//!
//! ```no_run
//! use gfix::core::{CorruptionTable, DateSystem, RestorationEngine};
//! use gfix::excel::{ExcelExporter, ExcelImporter};
//! use std::path::Path;
//!
//! let table = CorruptionTable::standard(DateSystem::V1900)?;
//! let engine = RestorationEngine::new(table);
//!
//! let mut workbook = ExcelImporter::new("supplementary.xlsx").import()?;
//! let report = engine.process_workbook(workbook.sheets_mut().iter_mut());
//! println!("Restored {} cells", report.total_changes());
//!
//! ExcelExporter::new(&workbook).export(Path::new("supplementary_fixed.xlsx"))?;
//! # Ok::<(), gfix::error::GfixError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{GfixError, GfixResult};
pub use types::{CellLocation, CellValue, ChangeRecord, SheetChanges, WorkbookReport};
