use std::fmt::Write;

use crate::models::{
    CalendarCell, CourseMissCount, CoursePercentage, DayStatus, NormalizedAttendance, WeeklyTrend,
};
use crate::{calendar, risk, rollup, series};

/// Assemble the markdown attendance report for one student. Inputs are
/// expected normalized (percentages clamped, ledger built); all the
/// derivations run in here.
pub fn build_report(
    student: &str,
    year: i32,
    month_index: u32,
    attendance: &NormalizedAttendance,
    courses: &[CoursePercentage],
    trends: &[WeeklyTrend],
    miss_counts: &[CourseMissCount],
) -> anyhow::Result<String> {
    let cells = calendar::month_grid(year, month_index, &attendance.ledger)?;
    let assessments = risk::classify_all(courses);
    let rollups = rollup::chronological_rollups(trends);

    let mut output = String::new();
    let _ = writeln!(output, "# Attendance Report");
    let _ = writeln!(
        output,
        "Student: {} (month {}-{:02})",
        student,
        year,
        month_index + 1
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Daily Attendance");

    let points: Vec<_> = series::daily_series(&attendance.ledger).collect();
    if points.is_empty() {
        let _ = writeln!(output, "No attendance records on file.");
    } else {
        let present = points.iter().filter(|p| p.present_value == 100).count();
        let _ = writeln!(
            output,
            "{} days recorded: {} present, {} absent.",
            points.len(),
            present,
            points.len() - present
        );
    }
    if !attendance.dropped.is_empty() {
        let _ = writeln!(
            output,
            "{} raw records dropped (unparseable dates): {}",
            attendance.dropped.len(),
            attendance.dropped.join(", ")
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Month Grid");
    let _ = writeln!(output, "| Sun | Mon | Tue | Wed | Thu | Fri | Sat |");
    let _ = writeln!(output, "| --- | --- | --- | --- | --- | --- | --- |");
    for week in cells.chunks(7) {
        let row: Vec<String> = week.iter().map(format_cell).collect();
        let _ = writeln!(output, "| {} |", row.join(" | "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Risk");

    if assessments.is_empty() {
        let _ = writeln!(output, "No course percentages on file.");
    } else {
        for assessment in &assessments {
            let _ = writeln!(
                output,
                "- {}: {:.1}% — {} risk, trending {}",
                assessment.course_name,
                assessment.percentage,
                assessment.tier,
                assessment.direction
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Missed Class");

    match risk::most_missed(miss_counts) {
        Some(worst) => {
            let _ = writeln!(
                output,
                "- {} ({} missed sessions)",
                worst.course_name, worst.missed_sessions
            );
        }
        None => {
            let _ = writeln!(output, "No miss counts on file.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Trend");

    if rollups.is_empty() {
        let _ = writeln!(output, "No weekly trend data on file.");
    } else {
        for course in &rollups {
            let weeks: Vec<String> = course
                .points
                .iter()
                .map(|point| format!("{} {:.1}%", point.week_label, point.percentage))
                .collect();
            let _ = writeln!(output, "- {}: {}", course.course_name, weeks.join(", "));
        }
    }

    Ok(output)
}

// Out-of-month days render parenthesized so the table reads like the
// de-emphasized padding cells of the portal calendar.
fn format_cell(cell: &CalendarCell) -> String {
    let marker = match cell.status {
        DayStatus::Present => " ✓",
        DayStatus::Absent => " ✗",
        DayStatus::NoData => "",
    };
    if cell.is_in_target_month {
        format!("{}{}", cell.day_of_month, marker)
    } else {
        format!("({}){}", cell.day_of_month, marker)
    }
}
