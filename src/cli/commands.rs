use crate::config::{default_output_path, FixConfig, ReportFormat};
use crate::core::{CorruptionTable, DateSystem};
use crate::error::{GfixError, GfixResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::WorkbookReport;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE: &str = "────────────────────────────────────────────────────────────────────────";

/// Execute the fix command: restore gene symbols and save the workbook
pub fn fix(
    input: PathBuf,
    output: Option<PathBuf>,
    config: &FixConfig,
) -> GfixResult<WorkbookReport> {
    let output = output.unwrap_or_else(|| default_output_path(&input));

    println!("{}", "🧬 gfix - Restoring gene symbols".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!();

    if config.dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No changes will be written\n".yellow()
        );
    }

    let engine = config.build_engine()?;

    if config.verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let mut workbook = ExcelImporter::new(&input).import()?;
    if config.verbose {
        println!(
            "   Found {} sheets, {} non-empty cells\n",
            workbook.sheets().len(),
            workbook.cell_count()
        );
        println!("{}", "🔎 Scanning cells...".cyan());
    }

    let report = engine.process_workbook(workbook.sheets_mut().iter_mut());
    info!(
        input = %input.display(),
        sheets = report.sheet_count(),
        changes = report.total_changes(),
        "workbook processed"
    );

    print!("{}", render_report(&report));

    if config.dry_run {
        println!("{}", "📋 Dry run complete - no changes written".yellow());
    } else {
        if config.verbose {
            println!("{}", "💾 Writing workbook...".cyan());
        }
        ExcelExporter::new(&workbook).export(&output)?;
    }

    if let Some(report_path) = &config.report {
        write_report(report_path, &report)?;
        println!("   Report: {}", report_path.display());
    }

    println!("\n{}", "Summary:".bold());
    println!("   Total sheets processed: {}", report.sheet_count());
    println!("   Total changes made: {}", report.total_changes());
    if !config.dry_run {
        println!(
            "{}",
            format!("✅ Saved corrected data to {}", output.display())
                .bold()
                .green()
        );
    }

    Ok(report)
}

/// Execute the check command: scan without writing, fail if anything would change
pub fn check(files: Vec<PathBuf>) -> GfixResult<()> {
    let engine = FixConfig::default().build_engine()?;

    let mut total_changes = 0;
    let mut dirty_files = 0;

    for file in &files {
        println!("{}", format!("🔎 Checking {}", file.display()).bold());
        let mut workbook = ExcelImporter::new(file).import()?;
        let report = engine.process_workbook(workbook.sheets_mut().iter_mut());

        if report.is_clean() {
            println!("   {} No date-corrupted gene symbols\n", "✅".green());
        } else {
            print!("{}", render_report(&report));
            total_changes += report.total_changes();
            dirty_files += 1;
        }
    }

    if total_changes > 0 {
        return Err(GfixError::Validation(format!(
            "{} date-corrupted gene symbol(s) found in {} of {} file(s). \
             Run 'gfix fix' to restore them.",
            total_changes,
            dirty_files,
            files.len()
        )));
    }

    println!("{}", "✅ All files are clean!".bold().green());
    Ok(())
}

/// Execute the genes command: list the built-in corruption table
pub fn genes() -> GfixResult<()> {
    let table = CorruptionTable::standard(DateSystem::V1900)?;
    print!("{}", render_table(&table));
    Ok(())
}

/// One block per sheet with location, old value and new value of each change
pub fn render_report(report: &WorkbookReport) -> String {
    let mut out = String::new();

    for sheet in &report.sheets {
        if sheet.changes.is_empty() {
            out.push_str(&format!(
                "   Sheet '{}': {}\n",
                sheet.sheet.bright_blue(),
                "no changes".dimmed()
            ));
            continue;
        }

        out.push_str(&format!(
            "{}\n",
            format!("Changes in sheet '{}':", sheet.sheet).bold()
        ));
        out.push_str(RULE);
        out.push('\n');
        for change in &sheet.changes {
            out.push_str(&format!(
                "Location: {} (row {}, column {})\n",
                change.location.a1().bright_blue(),
                change.location.row,
                change.location.col
            ));
            out.push_str(&format!("Old value: {}\n", change.old_value.to_string().red()));
            out.push_str(&format!("New value: {}\n", change.new_value.to_string().green()));
            out.push_str(RULE);
            out.push('\n');
        }
    }

    out
}

/// Corrupted day → symbol listing, in calendar order
pub fn render_table(table: &CorruptionTable) -> String {
    let mut out = format!(
        "{}\n",
        format!(
            "🧬 Known date-corrupted gene symbols ({} forms, {} genes)",
            table.len(),
            table.entries().len()
        )
        .bold()
        .green()
    );
    for (day, symbol) in table.mappings() {
        out.push_str(&format!(
            "   {}  →  {}\n",
            day.to_string().yellow(),
            symbol.as_str().bold()
        ));
    }
    out
}

/// Serialize the report as JSON or YAML depending on the file extension
pub fn write_report(path: &Path, report: &WorkbookReport) -> GfixResult<()> {
    let content = match ReportFormat::from_path(path)? {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| GfixError::Report(format!("Failed to serialize report: {}", e)))?,
        ReportFormat::Yaml => serde_yaml::to_string(report)
            .map_err(|e| GfixError::Report(format!("Failed to serialize report: {}", e)))?,
    };
    fs::write(path, content)?;
    Ok(())
}
