use crate::models::{AttendanceLedger, SeriesPoint};

/// Project the ledger into the daily trend line: one point per observed
/// day, oldest first. The iterator borrows the ledger, so a caller can
/// restart it by calling again.
pub fn daily_series(ledger: &AttendanceLedger) -> impl Iterator<Item = SeriesPoint> + '_ {
    ledger.iter().map(|(date, present)| SeriesPoint {
        label: date.format("%b %-d").to_string(),
        iso_date: date.format("%Y-%m-%d").to_string(),
        present_value: if *present { 100 } else { 0 },
    })
}
