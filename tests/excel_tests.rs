//! Excel import → restore → export round trips on real .xlsx files

use chrono::NaiveDate;
use gfix::cli::commands;
use gfix::config::FixConfig;
use gfix::core::{CorruptionTable, DateSystem, RestorationEngine};
use gfix::excel::{ExcelExporter, ExcelImporter, Workbook, Worksheet};
use gfix::CellValue;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Workbook as it comes back from a collaborator whose spreadsheet app
/// mangled the gene column: text dates, a real date cell, and a numeric
/// column that merely looks like serials.
fn write_corrupted_fixture(path: &Path) {
    let mut book = XlsxWorkbook::new();
    let date = Format::new().set_num_format("d-mmm");

    let genes = book.add_worksheet();
    genes.set_name("DE results").unwrap();
    genes.write_string(0, 0, "gene").unwrap();
    genes.write_string(0, 1, "baseMean").unwrap();
    genes.write_string(1, 0, "Mar-1").unwrap();
    genes.write_number(1, 1, 45352.0).unwrap();
    genes.write_number_with_format(2, 0, 44441.0, &date).unwrap();
    genes.write_number(2, 1, 12.5).unwrap();
    genes.write_string(3, 0, "TP53").unwrap();
    genes.write_boolean(3, 1, true).unwrap();
    genes.write_string(4, 0, "1-Dec").unwrap();

    let notes = book.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "No genes here").unwrap();

    book.save(path).unwrap();
}

/// Date cells of a workbook saved with the 1904 epoch (classic Mac Excel).
/// rust_xlsxwriter always writes 1900-based files, so the flag is patched
/// into `xl/workbook.xml` afterwards.
fn write_1904_fixture(path: &Path) {
    let mut book = XlsxWorkbook::new();
    let date = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = book.add_worksheet();
    sheet.set_name("S").unwrap();
    // 2028-03-17: not a registered day
    sheet.write_number_with_format(0, 0, 45367.0, &date).unwrap();
    // 2024-03-01: MARCH1 after auto-conversion
    sheet.write_number_with_format(1, 0, 43890.0, &date).unwrap();
    // 2028-04-19 at 06:00
    sheet.write_number_with_format(2, 0, 45400.25, &date).unwrap();
    let buffer = book.save_to_buffer().unwrap();

    let mut archive = ZipArchive::new(Cursor::new(buffer)).unwrap();
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for idx in 0..archive.len() {
        let mut entry = archive.by_index(idx).unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        if entry.name() == "xl/workbook.xml" {
            let xml = String::from_utf8(content).unwrap();
            assert!(xml.contains("<workbookPr "));
            content = xml
                .replacen("<workbookPr ", "<workbookPr date1904=\"1\" ", 1)
                .into_bytes();
        }
        writer
            .start_file(entry.name(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(&content).unwrap();
    }
    writer.finish().unwrap();
}

fn calendar_date(value: Option<&CellValue>) -> Option<NaiveDate> {
    match value {
        Some(CellValue::Date(serial)) => DateSystem::V1900.decode_serial(*serial),
        _ => None,
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn engine() -> RestorationEngine {
    RestorationEngine::new(CorruptionTable::standard(DateSystem::V1900).unwrap())
}

#[test]
fn test_import_reads_all_sheets_and_types() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.xlsx");
    write_corrupted_fixture(&input);

    let book = ExcelImporter::new(&input).import().unwrap();

    assert_eq!(book.sheet_names(), vec!["DE results", "Notes"]);
    let genes = book.sheet("DE results").unwrap();
    assert_eq!(genes.get(0, 0), Some(&CellValue::text("gene")));
    assert_eq!(genes.get(1, 0), Some(&CellValue::text("Mar-1")));
    assert_eq!(genes.get(1, 1), Some(&CellValue::Number(45352.0)));
    assert_eq!(genes.get(2, 0), Some(&CellValue::Date(44441.0)));
    assert_eq!(genes.get(3, 1), Some(&CellValue::Bool(true)));
}

#[test]
fn test_round_trip_restores_gene_symbols() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.xlsx");
    let output = temp_dir.path().join("output.xlsx");
    write_corrupted_fixture(&input);

    let mut book = ExcelImporter::new(&input).import().unwrap();
    let report = engine().process_workbook(book.sheets_mut().iter_mut());
    ExcelExporter::new(&book).export(&output).unwrap();

    assert_eq!(report.total_changes(), 3);
    let locations: Vec<String> = report.changes().map(|c| c.location.a1()).collect();
    assert_eq!(locations, vec!["A2", "A3", "A5"]);

    let fixed = ExcelImporter::new(&output).import().unwrap();
    let genes = fixed.sheet("DE results").unwrap();
    assert_eq!(genes.get(1, 0), Some(&CellValue::text("MARCHF1")));
    assert_eq!(genes.get(2, 0), Some(&CellValue::text("SEPTIN2")));
    assert_eq!(genes.get(4, 0), Some(&CellValue::text("DELEC1")));

    // Everything else survives untouched
    assert_eq!(genes.get(0, 0), Some(&CellValue::text("gene")));
    assert_eq!(genes.get(1, 1), Some(&CellValue::Number(45352.0)));
    assert_eq!(genes.get(2, 1), Some(&CellValue::Number(12.5)));
    assert_eq!(genes.get(3, 0), Some(&CellValue::text("TP53")));
    assert_eq!(genes.get(3, 1), Some(&CellValue::Bool(true)));
    assert_eq!(
        fixed.sheet("Notes").unwrap().get(0, 0),
        Some(&CellValue::text("No genes here"))
    );
}

#[test]
fn test_fixed_file_is_clean_on_rescan() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.xlsx");
    let output = temp_dir.path().join("output.xlsx");
    write_corrupted_fixture(&input);

    let engine = engine();
    let mut book = ExcelImporter::new(&input).import().unwrap();
    engine.process_workbook(book.sheets_mut().iter_mut());
    ExcelExporter::new(&book).export(&output).unwrap();

    let mut fixed = ExcelImporter::new(&output).import().unwrap();
    let report = engine.process_workbook(fixed.sheets_mut().iter_mut());
    assert!(report.is_clean());
    assert_eq!(report.sheet_count(), 2);
}

#[test]
fn test_export_keeps_unmatched_dates_as_dates() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("dates.xlsx");

    let mut sheet = Worksheet::new("dates");
    sheet.set(0, 0, CellValue::Date(45383.0));
    let mut book = Workbook::new();
    book.add_sheet(sheet);
    ExcelExporter::new(&book).export(&output).unwrap();

    let back = ExcelImporter::new(&output).import().unwrap();
    assert_eq!(
        back.sheet("dates").unwrap().get(0, 0),
        Some(&CellValue::Date(45383.0))
    );
}

#[test]
fn test_import_sparse_sheet_positions() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sparse.xlsx");

    let mut xlsx = XlsxWorkbook::new();
    let sheet = xlsx.add_worksheet();
    sheet.write_string(10, 5, "Sep-9").unwrap();
    xlsx.save(&input).unwrap();

    let mut book = ExcelImporter::new(&input).import().unwrap();
    assert_eq!(book.cell_count(), 1);

    let report = engine().process_workbook(book.sheets_mut().iter_mut());
    let change = report.changes().next().unwrap();
    assert_eq!(change.location.row, 10);
    assert_eq!(change.location.col, 5);
    assert_eq!(change.location.a1(), "F11");
    assert_eq!(change.new_value, CellValue::text("SEPTIN9"));
}

// ═══════════════════════════════════════════════════════════════════════════
// 1904 DATE SYSTEM
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_1904_workbook_rebases_dates() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mac.xlsx");
    write_1904_fixture(&input);

    let book = ExcelImporter::new(&input).import().unwrap();
    let sheet = book.sheet("S").unwrap();

    assert_eq!(sheet.get(0, 0), Some(&CellValue::Date(45367.0 + 1462.0)));
    assert_eq!(sheet.get(1, 0), Some(&CellValue::Date(45352.0)));
    assert_eq!(sheet.get(2, 0), Some(&CellValue::Date(45400.25 + 1462.0)));
    assert_eq!(calendar_date(sheet.get(0, 0)), ymd(2028, 3, 17));
    assert_eq!(calendar_date(sheet.get(1, 0)), ymd(2024, 3, 1));
}

#[test]
fn test_fix_1904_workbook_restores_only_real_corruptions() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mac.xlsx");
    let output = temp_dir.path().join("mac_fixed.xlsx");
    write_1904_fixture(&input);

    let report = commands::fix(input, Some(output.clone()), &FixConfig::default()).unwrap();

    let changes: Vec<String> = report
        .changes()
        .map(|c| format!("{} -> {}", c.location, c.new_value))
        .collect();
    assert_eq!(changes, vec!["S!A2 -> MARCHF1"]);

    // Unmatched dates keep their calendar date in the 1900-based output
    let fixed = ExcelImporter::new(&output).import().unwrap();
    let sheet = fixed.sheet("S").unwrap();
    assert_eq!(sheet.get(1, 0), Some(&CellValue::text("MARCHF1")));
    assert_eq!(calendar_date(sheet.get(0, 0)), ymd(2028, 3, 17));
    assert_eq!(calendar_date(sheet.get(2, 0)), ymd(2028, 4, 19));
    assert_eq!(sheet.get(2, 0), Some(&CellValue::Date(45400.25 + 1462.0)));
}
