use anyhow::{bail, Context};
use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{AttendanceLedger, CalendarCell, DayStatus};

/// Cells per month grid: six whole Sunday-first weeks.
pub const GRID_CELLS: usize = 42;

/// Build the 42-cell month view for `(year, month_index)`, where
/// `month_index` is 0-based. Padding days from adjacent months fill whole
/// weeks; a month that starts late in its first week gets a trailing week
/// entirely from the next month, which is accepted as-is. Pure over its
/// arguments; the clock is never read here.
pub fn month_grid(
    year: i32,
    month_index: u32,
    ledger: &AttendanceLedger,
) -> anyhow::Result<Vec<CalendarCell>> {
    if month_index > 11 {
        bail!("month index {month_index} out of range (expected 0-11)");
    }
    let first_of_month = NaiveDate::from_ymd_opt(year, month_index + 1, 1)
        .with_context(|| format!("year {year} is out of the supported calendar range"))?;

    // Walk back to the Sunday opening the first grid week. A month that
    // starts on Sunday keeps its own first day as cell 0.
    let start = first_of_month
        - Duration::days(i64::from(first_of_month.weekday().num_days_from_sunday()));

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for offset in 0..GRID_CELLS as i64 {
        let date = start + Duration::days(offset);
        let status = match ledger.get(&date) {
            Some(true) => DayStatus::Present,
            Some(false) => DayStatus::Absent,
            None => DayStatus::NoData,
        };
        cells.push(CalendarCell {
            day_of_month: date.day(),
            full_date: date,
            is_in_target_month: date.month0() == month_index,
            status,
        });
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn grid_always_has_42_cells() {
        let ledger = AttendanceLedger::new();
        for (year, month_index) in [(2025, 2), (2025, 11), (2024, 1), (2025, 0)] {
            let cells = month_grid(year, month_index, &ledger).unwrap();
            assert_eq!(cells.len(), GRID_CELLS, "{year}/{month_index}");
        }
    }

    #[test]
    fn grid_weeks_start_on_sunday() {
        let ledger = AttendanceLedger::new();
        let cells = month_grid(2025, 2, &ledger).unwrap();
        assert_eq!(cells[0].full_date.weekday(), Weekday::Sun);
        assert_eq!(cells[7].full_date.weekday(), Weekday::Sun);
        assert_eq!(cells[7].full_date, cells[0].full_date + Duration::days(7));
    }

    #[test]
    fn sunday_first_of_month_is_cell_zero() {
        // June 2025 starts on a Sunday.
        let ledger = AttendanceLedger::new();
        let cells = month_grid(2025, 5, &ledger).unwrap();
        assert_eq!(cells[0].full_date, date(2025, 6, 1));
        assert!(cells[0].is_in_target_month);
    }

    #[test]
    fn statuses_come_from_the_ledger() {
        let mut ledger = AttendanceLedger::new();
        ledger.insert(date(2025, 3, 10), true);
        ledger.insert(date(2025, 3, 11), false);
        let cells = month_grid(2025, 2, &ledger).unwrap();

        let status_of = |day: NaiveDate| {
            cells
                .iter()
                .find(|cell| cell.full_date == day)
                .map(|cell| cell.status)
                .unwrap()
        };
        assert_eq!(status_of(date(2025, 3, 10)), DayStatus::Present);
        assert_eq!(status_of(date(2025, 3, 11)), DayStatus::Absent);
        assert_eq!(status_of(date(2025, 3, 12)), DayStatus::NoData);
    }

    #[test]
    fn march_2025_with_empty_ledger() {
        let ledger = AttendanceLedger::new();
        let cells = month_grid(2025, 2, &ledger).unwrap();

        // March 1st 2025 is a Saturday, so the grid opens on Feb 23rd.
        assert_eq!(cells[0].full_date, date(2025, 2, 23));
        assert!(cells.iter().all(|cell| cell.status == DayStatus::NoData));

        let in_month: Vec<&CalendarCell> =
            cells.iter().filter(|cell| cell.is_in_target_month).collect();
        assert_eq!(in_month.len(), 31);
        assert_eq!(in_month[0].full_date, date(2025, 3, 1));
        assert_eq!(in_month[30].full_date, date(2025, 3, 31));
    }

    #[test]
    fn leap_february_pads_both_sides() {
        let ledger = AttendanceLedger::new();
        let cells = month_grid(2024, 1, &ledger).unwrap();
        assert_eq!(cells.len(), GRID_CELLS);
        let in_month = cells.iter().filter(|cell| cell.is_in_target_month).count();
        assert_eq!(in_month, 29);
    }

    #[test]
    fn december_grid_spills_into_january() {
        let ledger = AttendanceLedger::new();
        let cells = month_grid(2025, 11, &ledger).unwrap();
        assert_eq!(cells[0].full_date, date(2025, 11, 30));
        let last = cells.last().unwrap();
        assert_eq!(last.full_date, date(2026, 1, 10));
        assert!(!last.is_in_target_month);
    }

    #[test]
    fn month_index_out_of_range_is_an_error() {
        let ledger = AttendanceLedger::new();
        assert!(month_grid(2025, 12, &ledger).is_err());
    }

    #[test]
    fn same_inputs_rebuild_the_same_grid() {
        let mut ledger = AttendanceLedger::new();
        ledger.insert(date(2025, 3, 10), true);
        let first = month_grid(2025, 2, &ledger).unwrap();
        let second = month_grid(2025, 2, &ledger).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.full_date, b.full_date);
            assert_eq!(a.status, b.status);
            assert_eq!(a.is_in_target_month, b.is_in_target_month);
        }
    }
}
