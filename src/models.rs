use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Date-keyed presence map for one student. At most one observation per
/// date; a missing date means "no data", which is not the same as absent.
/// Ascending iteration order is what the time-series projection relies on.
pub type AttendanceLedger = BTreeMap<NaiveDate, bool>;

/// One day record exactly as the portal feed supplied it.
#[derive(Debug, Clone)]
pub struct RawDayRecord {
    pub day: String,
    pub attendance: f64,
}

/// Ledger plus the day strings that failed to parse and were dropped.
#[derive(Debug, Clone, Default)]
pub struct NormalizedAttendance {
    pub ledger: AttendanceLedger,
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePercentage {
    pub course_name: String,
    pub percentage: f64,
}

/// Weekly attendance percentages for one course, most recent week first.
/// The most-recent-first ordering is a precondition on the upstream feed;
/// the roll-up aggregator is what turns it chronological.
#[derive(Debug, Clone)]
pub struct WeeklyTrend {
    pub course_name: String,
    pub weekly_percentages: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMissCount {
    pub course_name: String,
    pub missed_sessions: i64,
}

/// One point of the daily trend line. `present_value` is 100 or 0 so the
/// chart layer can plot it without mapping booleans.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub label: String,
    pub iso_date: String,
    pub present_value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    Present,
    Absent,
    NoData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub day_of_month: u32,
    pub full_date: NaiveDate,
    pub is_in_target_month: bool,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPoint {
    pub week_label: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWeeklySeries {
    pub course_name: String,
    pub points: Vec<WeekPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub course_name: String,
    pub percentage: f64,
    pub tier: RiskTier,
    pub direction: TrendDirection,
    pub color_class: &'static str,
}

/// Everything the portal front end needs for one student's dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub student_email: String,
    pub year: i32,
    pub month_index: u32,
    pub time_series: Vec<SeriesPoint>,
    pub calendar: Vec<CalendarCell>,
    pub weekly_trends: Vec<CourseWeeklySeries>,
    pub risks: Vec<RiskAssessment>,
    pub most_missed: Option<CourseMissCount>,
    pub dropped_days: Vec<String>,
}
