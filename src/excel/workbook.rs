//! In-memory workbook shared by the importer, the engine and the exporter

use crate::core::Sheet;
use crate::types::{CellLocation, CellValue};
use std::collections::BTreeMap;

/// Sparse worksheet; keys are (row, col) so iteration is row-major
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Store a value; empty values clear the cell
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// (row, col, value) in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.cells.iter().map(|(&(row, col), value)| (row, col, value))
    }
}

impl Sheet for Worksheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (CellLocation, CellValue)> + '_> {
        Box::new(self.cells.iter().map(move |(&(row, col), value)| {
            (CellLocation::new(self.name.as_str(), row, col), value.clone())
        }))
    }

    fn write(&mut self, location: &CellLocation, value: CellValue) {
        self.set(location.row, location.col, value);
    }
}

/// Ordered collection of worksheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Worksheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> &mut [Worksheet] {
        &mut self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    /// Non-empty cells across all sheets
    pub fn cell_count(&self) -> usize {
        self.sheets.iter().map(Worksheet::len).sum()
    }
}
