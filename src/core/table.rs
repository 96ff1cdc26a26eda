//! Registry of gene symbols known to be mangled into dates
//!
//! Built once through [`CorruptionTableBuilder`], validated at `build()`,
//! read-only afterwards.

use super::dates::{DateNormalizer, DateSystem, MonthDay};
use crate::error::{GfixError, GfixResult};
use crate::types::CellValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Date keys of the HGNC symbols Excel converts. MAR-12..16 and MAR-31 are
/// additional keys seen for MARCH1/MARCH3 in real supplementary tables.
const KNOWN_CORRUPTIONS: &[(&str, &[&str])] = &[
    (
        "MARCHF1",
        &["MAR-01", "MAR-12", "MAR-13", "MAR-14", "MAR-15", "MAR-16"],
    ),
    ("MARCHF2", &["MAR-02"]),
    ("MARCHF3", &["MAR-03", "MAR-31"]),
    ("MARCHF4", &["MAR-04"]),
    ("MARCHF5", &["MAR-05"]),
    ("MARCHF6", &["MAR-06"]),
    ("MARCHF7", &["MAR-07"]),
    ("MARCHF8", &["MAR-08"]),
    ("MARCHF9", &["MAR-09"]),
    ("MARCHF10", &["MAR-10"]),
    ("MARCHF11", &["MAR-11"]),
    ("SEPTIN1", &["SEP-01"]),
    ("SEPTIN2", &["SEP-02"]),
    ("SEPTIN3", &["SEP-03"]),
    ("SEPTIN4", &["SEP-04"]),
    ("SEPTIN5", &["SEP-05"]),
    ("SEPTIN6", &["SEP-06"]),
    ("SEPTIN7", &["SEP-07"]),
    ("SEPTIN8", &["SEP-08"]),
    ("SEPTIN9", &["SEP-09"]),
    ("SEPTIN10", &["SEP-10"]),
    ("SEPTIN11", &["SEP-11"]),
    ("SEPTIN12", &["SEP-12"]),
    ("SEPTIN7P2", &["SEP-13"]),
    ("SEPTIN14", &["SEP-14"]),
    ("SELENOF", &["SEP-15"]),
    ("DELEC1", &["DEC-01"]),
];

//==============================================================================
// Table Types
//==============================================================================

/// Canonical gene symbol, e.g. "MARCHF1"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneSymbol(String);

impl GeneSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One shape a gene symbol takes after date auto-conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CorruptedForm {
    /// Display text such as "Mar-1", "1-Mar" or "3/1/2024"
    TextDate(String),
    /// Date-typed cell holding `serial`, which decodes to `date`
    SerialDate { serial: f64, date: NaiveDate },
}

impl CorruptedForm {
    pub fn text(value: impl Into<String>) -> Self {
        CorruptedForm::TextDate(value.into())
    }

    /// `None` when `serial` is not a valid date under `date_system`
    pub fn serial(serial: f64, date_system: DateSystem) -> Option<Self> {
        date_system
            .decode_serial(serial)
            .map(|date| CorruptedForm::SerialDate { serial, date })
    }
}

impl fmt::Display for CorruptedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptedForm::TextDate(s) => write!(f, "\"{}\"", s),
            CorruptedForm::SerialDate { serial, date } => write!(f, "serial {} ({})", serial, date),
        }
    }
}

/// A gene symbol with every corrupted form registered for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorruptionEntry {
    pub symbol: GeneSymbol,
    pub forms: Vec<CorruptedForm>,
}

//==============================================================================
// Builder
//==============================================================================

/// Collects (symbol, forms) pairs; `build()` rejects ambiguous data
#[derive(Debug, Default)]
pub struct CorruptionTableBuilder {
    date_system: DateSystem,
    entries: Vec<CorruptionEntry>,
}

impl CorruptionTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Epoch used to decode date-typed cells at lookup time
    pub fn date_system(mut self, date_system: DateSystem) -> Self {
        self.date_system = date_system;
        self
    }

    pub fn entry<I>(mut self, symbol: &str, forms: I) -> Self
    where
        I: IntoIterator<Item = CorruptedForm>,
    {
        self.entries.push(CorruptionEntry {
            symbol: GeneSymbol(symbol.to_string()),
            forms: forms.into_iter().collect(),
        });
        self
    }

    /// Shorthand for an entry made only of text forms
    pub fn text_entry(self, symbol: &str, forms: &[&str]) -> Self {
        self.entry(symbol, forms.iter().map(|f| CorruptedForm::text(*f)))
    }

    /// The built-in HGNC list
    pub fn with_known_corruptions(self) -> Self {
        KNOWN_CORRUPTIONS
            .iter()
            .fold(self, |builder, (symbol, forms)| {
                builder.text_entry(symbol, forms)
            })
    }

    /// Validate and freeze the table.
    ///
    /// Fails with [`GfixError::Configuration`] when a text form is not a
    /// recognizable date, or when two different symbols claim the same
    /// calendar day.
    pub fn build(self) -> GfixResult<CorruptionTable> {
        let normalizer = DateNormalizer::new(self.date_system)?;
        let mut index: HashMap<MonthDay, GeneSymbol> = HashMap::new();

        for entry in &self.entries {
            if entry.symbol.as_str().trim().is_empty() {
                return Err(GfixError::Configuration(
                    "Empty gene symbol in corruption table".to_string(),
                ));
            }

            for form in &entry.forms {
                let key = match form {
                    CorruptedForm::TextDate(text) => {
                        normalizer.normalize_text(text).ok_or_else(|| {
                            GfixError::Configuration(format!(
                                "Corrupted form {} for {} is not a recognizable date",
                                form, entry.symbol
                            ))
                        })?
                    }
                    CorruptedForm::SerialDate { date, .. } => MonthDay::from(*date),
                };

                match index.get(&key) {
                    Some(existing) if *existing != entry.symbol => {
                        return Err(GfixError::Configuration(format!(
                            "Ambiguous corrupted form {} ({}): registered for both {} and {}",
                            form, key, existing, entry.symbol
                        )));
                    }
                    Some(_) => {}
                    None => {
                        index.insert(key, entry.symbol.clone());
                    }
                }
            }
        }

        Ok(CorruptionTable {
            normalizer,
            entries: self.entries,
            index,
        })
    }
}

//==============================================================================
// Table
//==============================================================================

/// Read-only corrupted form → gene symbol registry
#[derive(Debug, Clone)]
pub struct CorruptionTable {
    normalizer: DateNormalizer,
    entries: Vec<CorruptionEntry>,
    index: HashMap<MonthDay, GeneSymbol>,
}

impl CorruptionTable {
    pub fn builder() -> CorruptionTableBuilder {
        CorruptionTableBuilder::new()
    }

    /// Built-in HGNC table for the given epoch
    pub fn standard(date_system: DateSystem) -> GfixResult<Self> {
        Self::builder()
            .date_system(date_system)
            .with_known_corruptions()
            .build()
    }

    /// Gene symbol whose corrupted form `value` is, if any.
    ///
    /// Exact after date normalization: "Mar-1", "3/1/2024" and a date cell
    /// holding March 1st all hit the same entry, anything else misses.
    pub fn lookup(&self, value: &CellValue) -> Option<&GeneSymbol> {
        self.normalizer
            .normalize(value)
            .and_then(|key| self.index.get(&key))
    }

    pub fn date_system(&self) -> DateSystem {
        self.normalizer.date_system()
    }

    pub fn entries(&self) -> &[CorruptionEntry] {
        &self.entries
    }

    /// Every registered day with its symbol, in calendar order
    pub fn mappings(&self) -> Vec<(MonthDay, &GeneSymbol)> {
        let mut mappings: Vec<_> = self.index.iter().map(|(k, v)| (*k, v)).collect();
        mappings.sort();
        mappings
    }

    /// Number of distinct registered days
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
