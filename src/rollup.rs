use crate::models::{CourseWeeklySeries, WeekPoint, WeeklyTrend};

/// Reverse one most-recent-first trend into an oldest-first series. Labels
/// are positional and assigned after the reversal, so "Week 1" always
/// names the oldest week of the reordered sequence. Percentage values are
/// carried through untouched.
pub fn chronological_rollup(trend: &WeeklyTrend) -> CourseWeeklySeries {
    let points = trend
        .weekly_percentages
        .iter()
        .rev()
        .enumerate()
        .map(|(index, &percentage)| WeekPoint {
            week_label: format!("Week {}", index + 1),
            percentage,
        })
        .collect();

    CourseWeeklySeries {
        course_name: trend.course_name.clone(),
        points,
    }
}

pub fn chronological_rollups(trends: &[WeeklyTrend]) -> Vec<CourseWeeklySeries> {
    trends.iter().map(chronological_rollup).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(course: &str, percentages: &[f64]) -> WeeklyTrend {
        WeeklyTrend {
            course_name: course.to_string(),
            weekly_percentages: percentages.to_vec(),
        }
    }

    #[test]
    fn most_recent_first_becomes_chronological() {
        let series = chronological_rollup(&trend("Mathematics", &[90.0, 85.0, 80.0]));
        let labels: Vec<&str> = series.points.iter().map(|p| p.week_label.as_str()).collect();
        let values: Vec<f64> = series.points.iter().map(|p| p.percentage).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3"]);
        assert_eq!(values, vec![80.0, 85.0, 90.0]);
    }

    #[test]
    fn single_point_trend_is_valid() {
        let series = chronological_rollup(&trend("History", &[77.5]));
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].week_label, "Week 1");
        assert_eq!(series.points[0].percentage, 77.5);
    }

    #[test]
    fn zero_trends_yield_an_empty_dataset() {
        assert!(chronological_rollups(&[]).is_empty());
    }

    #[test]
    fn reordering_never_alters_values() {
        let input = trend("Chemistry", &[91.25, 84.75, 79.5, 66.0]);
        let series = chronological_rollup(&input);
        let mut restored: Vec<f64> = series.points.iter().map(|p| p.percentage).collect();
        restored.reverse();
        assert_eq!(restored, input.weekly_percentages);
    }
}
