//! Run configuration shared by the CLI commands

use crate::core::{CorruptionTable, DateSystem, RestorationEngine};
use crate::error::{GfixError, GfixResult};
use std::path::{Path, PathBuf};

/// Settings for one `fix`/`check` run
#[derive(Debug, Clone, Default)]
pub struct FixConfig {
    /// Scan and report without writing the output workbook
    pub dry_run: bool,
    /// Print progress steps
    pub verbose: bool,
    /// Optional machine-readable report (.json, .yaml, .yml)
    pub report: Option<PathBuf>,
}

impl FixConfig {
    /// Build the engine over the built-in table. The importer hands over
    /// 1900-system serials, so the table decodes with that epoch. Fails only
    /// if the shipped table is inconsistent.
    pub fn build_engine(&self) -> GfixResult<RestorationEngine> {
        let table = CorruptionTable::standard(DateSystem::V1900)?;
        Ok(RestorationEngine::new(table))
    }
}

/// Serialization format of a change report file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
}

impl ReportFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> GfixResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            _ => Err(GfixError::Report(format!(
                "Unsupported report format: '{}'. Use .json or .yaml",
                extension
            ))),
        }
    }
}

/// `data/genes.xls` → `data/genes_fixed.xlsx`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workbook");
    input.with_file_name(format!("{}_fixed.xlsx", stem))
}
