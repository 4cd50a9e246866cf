//! Human-readable case reference numbers.
//!
//! Format: `{PREFIX}-{YY}-{NNNNN}`. The sequence is the total number of cases
//! across all types plus one, read from the store at generation time. Two
//! concurrent creations can observe the same count and produce the same
//! reference, so references are display identifiers, never keys.

use chrono::{DateTime, Datelike, Utc};

use super::CaseType;

/// Build a reference number from the current case count.
///
/// # Examples
/// ```
/// use casework::domain::{CaseType, reference_number};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
/// assert_eq!(reference_number(CaseType::HighHedges, now, 41), "HH-26-00042");
/// ```
pub fn reference_number(case_type: CaseType, now: DateTime<Utc>, existing_cases: u64) -> String {
    let year = now.year().rem_euclid(100);
    let sequence = existing_cases.saturating_add(1);
    format!("{}-{year:02}-{sequence:05}", case_type.reference_prefix())
}
