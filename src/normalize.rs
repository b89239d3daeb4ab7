use chrono::NaiveDate;

use crate::models::{
    AttendanceLedger, CoursePercentage, NormalizedAttendance, RawDayRecord, WeeklyTrend,
};

/// Midpoint rule for fractional presence signals: at or above half of a
/// full day counts as present.
const PRESENT_AT_OR_ABOVE: f64 = 50.0;

/// Build the date-keyed ledger from raw day records. Unparseable day
/// strings are dropped and reported back, never fatal. Later entries for
/// the same date overwrite earlier ones; that resolution order is part of
/// the contract.
pub fn build_ledger(records: &[RawDayRecord]) -> NormalizedAttendance {
    let mut ledger = AttendanceLedger::new();
    let mut dropped = Vec::new();

    for record in records {
        let date = match NaiveDate::parse_from_str(&record.day, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                dropped.push(record.day.clone());
                continue;
            }
        };
        ledger.insert(date, record.attendance >= PRESENT_AT_OR_ABOVE);
    }

    NormalizedAttendance { ledger, dropped }
}

/// Clamp every course percentage into [0, 100], preserving input order.
pub fn normalize_percentages(courses: &[CoursePercentage]) -> Vec<CoursePercentage> {
    courses
        .iter()
        .map(|course| CoursePercentage {
            course_name: course.course_name.clone(),
            percentage: clamp_percentage(course.percentage),
        })
        .collect()
}

/// Clamp every weekly percentage into [0, 100]. The sequence stays
/// most-recent-first; reordering is the roll-up aggregator's job.
pub fn normalize_trends(trends: &[WeeklyTrend]) -> Vec<WeeklyTrend> {
    trends
        .iter()
        .map(|trend| WeeklyTrend {
            course_name: trend.course_name.clone(),
            weekly_percentages: trend
                .weekly_percentages
                .iter()
                .map(|value| clamp_percentage(*value))
                .collect(),
        })
        .collect()
}

pub fn clamp_percentage(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
