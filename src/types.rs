use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Cell Values
//==============================================================================

/// A single cell value as handed over by the document layer
///
/// Date-formatted cells carry a day-count serial; interpreting it is the job
/// of `core::dates`, which knows about the 1900/1904 epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date-formatted number (day-count serial, fraction = time of day)
    Date(f64),
    Error(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Date(serial) => write!(f, "{} (date serial)", format_number(*serial)),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Integers without a trailing ".0", everything else as-is
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

//==============================================================================
// Locations
//==============================================================================

/// Sheet + zero-based row/column of a cell. Only used for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellLocation {
    pub sheet: String,
    pub row: u32,
    pub col: u32,
}

impl CellLocation {
    pub fn new(sheet: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            col,
        }
    }

    /// Excel-style reference, e.g. (row 5, col 0) → "A6"
    pub fn a1(&self) -> String {
        format!("{}{}", column_letter(self.col), self.row + 1)
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.a1())
    }
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
pub fn column_letter(n: u32) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

//==============================================================================
// Change Tracking
//==============================================================================

/// One restored cell: where it was, what it held, what it holds now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub location: CellLocation,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

/// Ordered changes for one sheet (visitation order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetChanges {
    pub sheet: String,
    pub changes: Vec<ChangeRecord>,
}

/// Result of one workbook run, sheets kept in workbook order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkbookReport {
    pub sheets: Vec<SheetChanges>,
}

impl WorkbookReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: impl Into<String>, changes: Vec<ChangeRecord>) {
        self.sheets.push(SheetChanges {
            sheet: sheet.into(),
            changes,
        });
    }

    /// Changes recorded for `sheet`, or `None` if the sheet was never processed
    pub fn get(&self, sheet: &str) -> Option<&[ChangeRecord]> {
        self.sheets
            .iter()
            .find(|s| s.sheet == sheet)
            .map(|s| s.changes.as_slice())
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn total_changes(&self) -> usize {
        self.sheets.iter().map(|s| s.changes.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_changes() == 0
    }

    /// All changes across sheets, in report order
    pub fn changes(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.sheets.iter().flat_map(|s| s.changes.iter())
    }
}
