use crate::models::{
    CourseMissCount, CoursePercentage, RiskAssessment, RiskTier, TrendDirection,
};

/// Attendance below this percentage is high risk.
pub const HIGH_RISK_BELOW: f64 = 75.0;
/// Attendance at or above this percentage is low risk.
pub const LOW_RISK_AT: f64 = 85.0;

/// Classify one course. Thresholds are fixed constants so every course in
/// a render is compared on the same scale. Direction is derived from the
/// low-risk threshold, not from history.
pub fn classify(course: &CoursePercentage) -> RiskAssessment {
    let tier = tier_for(course.percentage);
    let direction = if course.percentage >= LOW_RISK_AT {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    RiskAssessment {
        course_name: course.course_name.clone(),
        percentage: course.percentage,
        tier,
        direction,
        color_class: color_class(tier),
    }
}

pub fn classify_all(courses: &[CoursePercentage]) -> Vec<RiskAssessment> {
    courses.iter().map(classify).collect()
}

pub fn tier_for(percentage: f64) -> RiskTier {
    if percentage < HIGH_RISK_BELOW {
        RiskTier::High
    } else if percentage < LOW_RISK_AT {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

pub fn color_class(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "green",
        RiskTier::Medium => "amber",
        RiskTier::High => "red",
    }
}

/// The course with the most missed sessions. Ties keep the course seen
/// first in input order.
pub fn most_missed(counts: &[CourseMissCount]) -> Option<&CourseMissCount> {
    let mut best: Option<&CourseMissCount> = None;
    for count in counts {
        match best {
            Some(current) if count.missed_sessions <= current.missed_sessions => {}
            _ => best = Some(count),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, percentage: f64) -> CoursePercentage {
        CoursePercentage {
            course_name: name.to_string(),
            percentage,
        }
    }

    fn misses(name: &str, missed_sessions: i64) -> CourseMissCount {
        CourseMissCount {
            course_name: name.to_string(),
            missed_sessions,
        }
    }

    #[test]
    fn tiers_follow_fixed_thresholds() {
        assert_eq!(tier_for(74.9), RiskTier::High);
        assert_eq!(tier_for(75.0), RiskTier::Medium);
        assert_eq!(tier_for(84.9), RiskTier::Medium);
        assert_eq!(tier_for(85.0), RiskTier::Low);
    }

    #[test]
    fn direction_flips_at_the_low_risk_threshold() {
        assert_eq!(classify(&course("Mathematics", 85.0)).direction, TrendDirection::Up);
        assert_eq!(classify(&course("Mathematics", 84.9)).direction, TrendDirection::Down);
    }

    #[test]
    fn color_class_tracks_the_tier() {
        assert_eq!(classify(&course("Art", 90.0)).color_class, "green");
        assert_eq!(classify(&course("Art", 80.0)).color_class, "amber");
        assert_eq!(classify(&course("Art", 60.0)).color_class, "red");
    }

    #[test]
    fn most_missed_picks_the_maximum() {
        let counts = vec![misses("Mathematics", 2), misses("History", 9), misses("Art", 5)];
        assert_eq!(most_missed(&counts).unwrap().course_name, "History");
    }

    #[test]
    fn most_missed_tie_keeps_first_in_input_order() {
        let counts = vec![misses("Chemistry", 5), misses("Physics", 5)];
        assert_eq!(most_missed(&counts).unwrap().course_name, "Chemistry");
    }

    #[test]
    fn most_missed_on_empty_input_is_none() {
        assert!(most_missed(&[]).is_none());
    }
}
