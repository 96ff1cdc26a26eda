//! Restoration engine
//!
//! Walks cells, asks the [`CorruptionTable`] about each value and emits the
//! restored value plus a [`ChangeRecord`] for every hit. Cells are judged
//! independently; no state is carried between cells or sheets.

use super::table::CorruptionTable;
use crate::types::{CellLocation, CellValue, ChangeRecord, WorkbookReport};
use tracing::{debug, info};

/// Tabular document collaborator: one worksheet that can be read cell by
/// cell and written back.
pub trait Sheet {
    fn name(&self) -> &str;

    /// Non-empty cells in row-major order
    fn cells(&self) -> Box<dyn Iterator<Item = (CellLocation, CellValue)> + '_>;

    fn write(&mut self, location: &CellLocation, value: CellValue);
}

/// Stateless per-cell restorer over a read-only table
#[derive(Debug, Clone)]
pub struct RestorationEngine {
    table: CorruptionTable,
}

impl RestorationEngine {
    pub fn new(table: CorruptionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CorruptionTable {
        &self.table
    }

    /// Restore a single value.
    ///
    /// Returns the value to store and, when it changed, the record describing
    /// the change. Nothing is written anywhere.
    pub fn process_cell(
        &self,
        location: &CellLocation,
        value: &CellValue,
    ) -> (CellValue, Option<ChangeRecord>) {
        match self.table.lookup(value) {
            None => (value.clone(), None),
            Some(symbol) => {
                let new_value = CellValue::text(symbol.as_str());
                let record = ChangeRecord {
                    location: location.clone(),
                    old_value: value.clone(),
                    new_value: new_value.clone(),
                };
                (new_value, Some(record))
            }
        }
    }

    /// Restore every matching cell of `sheet` in place and return the
    /// changes in visitation order.
    pub fn process_sheet<S: Sheet + ?Sized>(&self, sheet: &mut S) -> Vec<ChangeRecord> {
        let mut changes = Vec::new();
        for (location, value) in sheet.cells() {
            if let (_, Some(record)) = self.process_cell(&location, &value) {
                debug!(
                    location = %record.location,
                    old = %record.old_value,
                    new = %record.new_value,
                    "restored gene symbol"
                );
                changes.push(record);
            }
        }

        for record in &changes {
            sheet.write(&record.location, record.new_value.clone());
        }

        info!(sheet = sheet.name(), changes = changes.len(), "sheet processed");
        changes
    }

    /// Apply [`process_sheet`](Self::process_sheet) to every sheet, keeping
    /// sheet order. Sheets without changes still get an (empty) entry.
    pub fn process_workbook<'a, S, I>(&self, sheets: I) -> WorkbookReport
    where
        S: Sheet + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        let mut report = WorkbookReport::new();
        for sheet in sheets {
            let changes = self.process_sheet(&mut *sheet);
            report.push(sheet.name(), changes);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dates::DateSystem;

    /// Minimal dense sheet for engine tests
    struct GridSheet {
        name: String,
        rows: Vec<Vec<CellValue>>,
    }

    impl GridSheet {
        fn new(name: &str, rows: Vec<Vec<CellValue>>) -> Self {
            Self {
                name: name.to_string(),
                rows,
            }
        }
    }

    impl Sheet for GridSheet {
        fn name(&self) -> &str {
            &self.name
        }

        fn cells(&self) -> Box<dyn Iterator<Item = (CellLocation, CellValue)> + '_> {
            Box::new(self.rows.iter().enumerate().flat_map(move |(r, row)| {
                row.iter().enumerate().map(move |(c, value)| {
                    (
                        CellLocation::new(self.name.clone(), r as u32, c as u32),
                        value.clone(),
                    )
                })
            }))
        }

        fn write(&mut self, location: &CellLocation, value: CellValue) {
            self.rows[location.row as usize][location.col as usize] = value;
        }
    }

    fn engine() -> RestorationEngine {
        RestorationEngine::new(CorruptionTable::standard(DateSystem::V1900).unwrap())
    }

    #[test]
    fn test_process_cell_match() {
        let loc = CellLocation::new("Sheet1", 5, 0);
        let (value, record) = engine().process_cell(&loc, &CellValue::text("Mar-1"));

        assert_eq!(value, CellValue::text("MARCHF1"));
        let record = record.expect("change record");
        assert_eq!(record.location, loc);
        assert_eq!(record.old_value, CellValue::text("Mar-1"));
        assert_eq!(record.new_value, CellValue::text("MARCHF1"));
    }

    #[test]
    fn test_process_cell_no_match() {
        let loc = CellLocation::new("Sheet1", 0, 0);
        let (value, record) = engine().process_cell(&loc, &CellValue::text("Hello"));
        assert_eq!(value, CellValue::text("Hello"));
        assert!(record.is_none());
    }

    #[test]
    fn test_process_sheet_writes_back_in_order() {
        let mut sheet = GridSheet::new(
            "genes",
            vec![
                vec![CellValue::text("gene"), CellValue::text("count")],
                vec![CellValue::text("Sep-2"), CellValue::Number(3.0)],
                vec![CellValue::text("TP53"), CellValue::Number(7.0)],
                vec![CellValue::Date(45352.0), CellValue::Number(1.0)],
            ],
        );

        let changes = engine().process_sheet(&mut sheet);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].location, CellLocation::new("genes", 1, 0));
        assert_eq!(changes[1].location, CellLocation::new("genes", 3, 0));
        assert_eq!(sheet.rows[1][0], CellValue::text("SEPTIN2"));
        assert_eq!(sheet.rows[3][0], CellValue::text("MARCHF1"));
        assert_eq!(sheet.rows[2][0], CellValue::text("TP53"));
        assert_eq!(sheet.rows[1][1], CellValue::Number(3.0));
    }

    #[test]
    fn test_process_workbook_keeps_sheet_order() {
        let mut sheets = vec![
            GridSheet::new("b", vec![vec![CellValue::text("1-Dec")]]),
            GridSheet::new("a", vec![vec![CellValue::text("plain")]]),
        ];

        let report = engine().process_workbook(sheets.iter_mut());

        let names: Vec<&str> = report.sheets.iter().map(|s| s.sheet.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(report.get("b").unwrap().len(), 1);
        assert!(report.get("a").unwrap().is_empty());
        assert_eq!(sheets[0].rows[0][0], CellValue::text("DELEC1"));
    }

    #[test]
    fn test_second_pass_is_clean() {
        let mut sheet = GridSheet::new(
            "s",
            vec![vec![CellValue::text("Mar-1"), CellValue::text("2-Sep")]],
        );
        let engine = engine();
        assert_eq!(engine.process_sheet(&mut sheet).len(), 2);
        assert!(engine.process_sheet(&mut sheet).is_empty());
    }
}
