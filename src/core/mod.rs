//! Detection and restoration of date-corrupted gene symbols

pub mod dates;
pub mod engine;
pub mod table;

pub use dates::{DateNormalizer, DateSystem, MonthDay};
pub use engine::{RestorationEngine, Sheet};
pub use table::{
    CorruptedForm, CorruptionEntry, CorruptionTable, CorruptionTableBuilder, GeneSymbol,
};
