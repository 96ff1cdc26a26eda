//! Date normalization
//!
//! Maps a raw cell value to the calendar day it denotes, ignoring the year.
//! Spreadsheet auto-conversion turns "MARCH1" into March 1st of whatever year
//! it is at the time, so the month/day pair is all that survives of the
//! original symbol.

use crate::error::{GfixError, GfixResult};
use crate::types::CellValue;
use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

//==============================================================================
// Serial Date Epochs
//==============================================================================

/// Spreadsheet serial date convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateSystem {
    /// Windows default: serial 1 = 1900-01-01, with the Lotus 1-2-3 leap year bug
    #[default]
    V1900,
    /// Classic Mac: serial 0 = 1904-01-01
    V1904,
}

impl DateSystem {
    /// Decode a serial day count into a date. The fractional part (time of
    /// day) is dropped.
    pub fn decode_serial(self, serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let days = serial.floor() as u64;

        match self {
            DateSystem::V1900 => {
                let base = NaiveDate::from_ymd_opt(1899, 12, 31)?;
                match days {
                    // 0 is "1900-01-00", 60 is the fictitious 1900-02-29
                    0 | 60 => None,
                    d if d < 60 => base.checked_add_days(Days::new(d)),
                    d => base.checked_add_days(Days::new(d - 1)),
                }
            }
            DateSystem::V1904 => {
                NaiveDate::from_ymd_opt(1904, 1, 1)?.checked_add_days(Days::new(days))
            }
        }
    }

    /// Encode a date as a whole-day serial. `None` for dates before the epoch.
    pub fn encode_date(self, date: NaiveDate) -> Option<f64> {
        match self {
            DateSystem::V1900 => {
                let base = NaiveDate::from_ymd_opt(1899, 12, 31)?;
                let leap_bug = NaiveDate::from_ymd_opt(1900, 3, 1)?;
                let days = (date - base).num_days();
                match days {
                    d if d < 1 => None,
                    d if date < leap_bug => Some(d as f64),
                    d => Some((d + 1) as f64),
                }
            }
            DateSystem::V1904 => {
                let base = NaiveDate::from_ymd_opt(1904, 1, 1)?;
                let days = (date - base).num_days();
                (days >= 0).then_some(days as f64)
            }
        }
    }
}

impl fmt::Display for DateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSystem::V1900 => write!(f, "1900"),
            DateSystem::V1904 => write!(f, "1904"),
        }
    }
}

//==============================================================================
// Month/Day Key
//==============================================================================

/// A year-less calendar day, the canonical key of a corrupted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Validated against a leap year so that Feb 29 is accepted
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    /// Upper-case month abbreviation + zero-padded day, e.g. "MAR-01"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTHS[(self.month - 1) as usize];
        write!(f, "{}-{:02}", name[..3].to_uppercase(), self.day)
    }
}

/// Month number for a full English month name, its 3-letter abbreviation,
/// or "Sept". Case-insensitive.
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|full| *full == lower || (lower.len() == 3 && full.starts_with(&lower)))
        .map(|idx| idx as u32 + 1)
}

//==============================================================================
// Normalizer
//==============================================================================

/// Recognizes the shapes a corrupted gene symbol takes and reduces each to
/// its [`MonthDay`]
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    date_system: DateSystem,
    time_suffix: Regex,
    month_first: Regex,
    day_first: Regex,
    numeric: Regex,
}

impl DateNormalizer {
    pub fn new(date_system: DateSystem) -> GfixResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| GfixError::Configuration(format!("Regex error: {}", e)))
        };

        Ok(Self {
            date_system,
            // 2024-03-01 00:00:00, 2024-03-01T00:00, 3/1/2024 12:00 AM
            time_suffix: compile(
                r"(?:T|\s+)\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:\s*[AaPp][Mm])?$",
            )?,
            // Mar-1, MAR-01, March 1, Sep 2, 2024, Mar-1-24
            month_first: compile(
                r"^(?P<month>[A-Za-z]{3,9})\.?[-\s/]+(?P<day>\d{1,2})(?:(?:,\s*|[-\s/]+)(?P<year>\d{4}|\d{2}))?$",
            )?,
            // 1-Mar, 01-Mar-24, 1 March 2024
            day_first: compile(
                r"^(?P<day>\d{1,2})[-\s/]+(?P<month>[A-Za-z]{3,9})\.?(?:(?:,\s*|[-\s/]+)(?P<year>\d{4}|\d{2}))?$",
            )?,
            // 2024-03-01, 2024/03/01, 3/1/2024, 3/1/24, 01-03-2024
            numeric: compile(
                r"^(?P<a>\d{1,4})(?P<sep1>[-/])(?P<b>\d{1,2})(?P<sep2>[-/])(?P<c>\d{1,4})$",
            )?,
        })
    }

    pub fn date_system(&self) -> DateSystem {
        self.date_system
    }

    /// Calendar day denoted by `value`, if it is a date at all.
    ///
    /// Only text and date-typed cells can be dates; plain numbers, booleans,
    /// errors and blanks never are.
    pub fn normalize(&self, value: &CellValue) -> Option<MonthDay> {
        match value {
            CellValue::Text(s) => self.normalize_text(s),
            CellValue::Date(serial) => {
                self.date_system.decode_serial(*serial).map(MonthDay::from)
            }
            CellValue::Empty
            | CellValue::Number(_)
            | CellValue::Bool(_)
            | CellValue::Error(_) => None,
        }
    }

    /// Text-only variant of [`normalize`](Self::normalize)
    pub fn normalize_text(&self, raw: &str) -> Option<MonthDay> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
            return None;
        }
        let text = match self.time_suffix.find(trimmed) {
            Some(m) => trimmed[..m.start()].trim_end(),
            None => trimmed,
        };

        if let Some(caps) = self
            .month_first
            .captures(text)
            .or_else(|| self.day_first.captures(text))
        {
            let month = month_from_name(&caps["month"])?;
            let day = caps["day"].parse().ok()?;
            let year = caps.name("year").map(|y| y.as_str());
            return resolve(year, month, day);
        }

        let caps = self.numeric.captures(text)?;
        if caps["sep1"] != caps["sep2"] {
            return None;
        }
        let (a, b, c) = (&caps["a"], &caps["b"], &caps["c"]);

        if a.len() == 4 {
            // ISO-like: year first
            resolve(Some(a), b.parse().ok()?, c.parse().ok()?)
        } else if &caps["sep1"] == "/" {
            // US: month/day/year
            if !matches!(c.len(), 2 | 4) {
                return None;
            }
            resolve(Some(c), a.parse().ok()?, b.parse().ok()?)
        } else if c.len() == 4 {
            // day-month-year
            resolve(Some(c), b.parse().ok()?, a.parse().ok()?)
        } else {
            None
        }
    }
}

/// Validate (month, day) against the year when one is given.
/// Two-digit years follow the spreadsheet window: 00-29 → 20xx, 30-99 → 19xx.
fn resolve(year: Option<&str>, month: u32, day: u32) -> Option<MonthDay> {
    match year {
        None => MonthDay::new(month, day),
        Some(y) => {
            let mut year: i32 = y.parse().ok()?;
            if y.len() == 2 {
                year += if year < 30 { 2000 } else { 1900 };
            }
            NaiveDate::from_ymd_opt(year, month, day).map(MonthDay::from)
        }
    }
}
