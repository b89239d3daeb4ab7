use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{CourseMissCount, CoursePercentage, RawDayRecord, WeeklyTrend};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let students = vec![
        (
            Uuid::parse_str("7b1c2a90-5a44-4c7e-9a6a-2f8d1b3c4e5f")?,
            "Amina Okoye",
            "amina.okoye@school.test",
        ),
        (
            Uuid::parse_str("2e9f4d11-8c3b-4a57-b1d2-6c7e8f9a0b1c")?,
            "Jonas Berg",
            "jonas.berg@school.test",
        ),
    ];

    for (id, name, email) in students {
        sqlx::query(
            r#"
            INSERT INTO attendance_portal.students (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(pool)
        .await?;
    }

    // Day values stay exactly as exported; seed-day-007 is a malformed row
    // of the kind real feeds contain, which the normalizer drops.
    let day_records = vec![
        ("seed-day-001", "amina.okoye@school.test", "2025-03-03", 100.0),
        ("seed-day-002", "amina.okoye@school.test", "2025-03-04", 100.0),
        ("seed-day-003", "amina.okoye@school.test", "2025-03-05", 0.0),
        ("seed-day-004", "amina.okoye@school.test", "2025-03-06", 100.0),
        ("seed-day-005", "amina.okoye@school.test", "2025-03-07", 100.0),
        ("seed-day-006", "amina.okoye@school.test", "2025-03-10", 0.0),
        ("seed-day-007", "amina.okoye@school.test", "03/11/2025", 100.0),
        ("seed-day-008", "jonas.berg@school.test", "2025-03-03", 100.0),
        ("seed-day-009", "jonas.berg@school.test", "2025-03-04", 60.0),
    ];

    for (source_key, email, day, attendance) in day_records {
        let student_id = student_id_by_email(pool, email).await?;
        sqlx::query(
            r#"
            INSERT INTO attendance_portal.day_records
            (id, student_id, day, attendance, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(day)
        .bind(attendance)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    let course_stats = vec![
        ("amina.okoye@school.test", "Mathematics", 92.0, 2),
        ("amina.okoye@school.test", "Chemistry", 81.5, 5),
        ("amina.okoye@school.test", "History", 68.0, 9),
        ("jonas.berg@school.test", "Mathematics", 88.0, 3),
    ];

    for (email, course_name, percentage, missed_sessions) in course_stats {
        let student_id = student_id_by_email(pool, email).await?;
        sqlx::query(
            r#"
            INSERT INTO attendance_portal.course_stats
            (id, student_id, course_name, percentage, missed_sessions)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, course_name) DO UPDATE
            SET percentage = EXCLUDED.percentage,
                missed_sessions = EXCLUDED.missed_sessions
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(course_name)
        .bind(percentage)
        .bind(missed_sessions)
        .execute(pool)
        .await?;
    }

    // week_offset 0 is the most recent week.
    let course_weeks = vec![
        ("amina.okoye@school.test", "Mathematics", 0, 92.0),
        ("amina.okoye@school.test", "Mathematics", 1, 90.5),
        ("amina.okoye@school.test", "Mathematics", 2, 88.0),
        ("amina.okoye@school.test", "Mathematics", 3, 85.0),
        ("amina.okoye@school.test", "History", 0, 68.0),
        ("amina.okoye@school.test", "History", 1, 72.0),
        ("amina.okoye@school.test", "History", 2, 75.0),
        ("amina.okoye@school.test", "History", 3, 80.0),
    ];

    for (email, course_name, week_offset, percentage) in course_weeks {
        let student_id = student_id_by_email(pool, email).await?;
        sqlx::query(
            r#"
            INSERT INTO attendance_portal.course_weeks
            (id, student_id, course_name, week_offset, percentage)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, course_name, week_offset) DO UPDATE
            SET percentage = EXCLUDED.percentage
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(course_name)
        .bind(week_offset)
        .bind(percentage)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn student_id_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Uuid> {
    let row = sqlx::query("SELECT id FROM attendance_portal.students WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .with_context(|| format!("no student with email {email}"))?;
    Ok(row.get("id"))
}

/// Raw day records in recording order, so the normalizer's last-write-wins
/// resolution of duplicate days is deterministic.
pub async fn fetch_day_records(pool: &PgPool, email: &str) -> anyhow::Result<Vec<RawDayRecord>> {
    let rows = sqlx::query(
        "SELECT d.day, d.attendance \
         FROM attendance_portal.day_records d \
         JOIN attendance_portal.students s ON s.id = d.student_id \
         WHERE s.email = $1 \
         ORDER BY d.recorded_at, d.id",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(RawDayRecord {
            day: row.get("day"),
            attendance: row.get("attendance"),
        });
    }

    Ok(records)
}

pub async fn fetch_course_stats(
    pool: &PgPool,
    email: &str,
) -> anyhow::Result<(Vec<CoursePercentage>, Vec<CourseMissCount>)> {
    let rows = sqlx::query(
        "SELECT c.course_name, c.percentage, c.missed_sessions \
         FROM attendance_portal.course_stats c \
         JOIN attendance_portal.students s ON s.id = c.student_id \
         WHERE s.email = $1 \
         ORDER BY c.course_name",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    let mut percentages = Vec::new();
    let mut miss_counts = Vec::new();
    for row in rows {
        let course_name: String = row.get("course_name");
        percentages.push(CoursePercentage {
            course_name: course_name.clone(),
            percentage: row.get("percentage"),
        });
        miss_counts.push(CourseMissCount {
            course_name,
            missed_sessions: i64::from(row.get::<i32, _>("missed_sessions")),
        });
    }

    Ok((percentages, miss_counts))
}

/// Weekly trends per course, each percentage list most-recent-week-first
/// (ascending week_offset), matching the aggregator's input precondition.
pub async fn fetch_weekly_trends(pool: &PgPool, email: &str) -> anyhow::Result<Vec<WeeklyTrend>> {
    let rows = sqlx::query(
        "SELECT w.course_name, w.percentage \
         FROM attendance_portal.course_weeks w \
         JOIN attendance_portal.students s ON s.id = w.student_id \
         WHERE s.email = $1 \
         ORDER BY w.course_name, w.week_offset",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    let mut trends: Vec<WeeklyTrend> = Vec::new();
    for row in rows {
        let course_name: String = row.get("course_name");
        let percentage: f64 = row.get("percentage");
        match trends.last_mut() {
            Some(trend) if trend.course_name == course_name => {
                trend.weekly_percentages.push(percentage);
            }
            _ => trends.push(WeeklyTrend {
                course_name,
                weekly_percentages: vec![percentage],
            }),
        }
    }

    Ok(trends)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        full_name: String,
        email: String,
        day: String,
        attendance: f64,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let student_id: Uuid = sqlx::query(
            r#"
            INSERT INTO attendance_portal.students (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.full_name)
        .bind(&row.email)
        .fetch_one(pool)
        .await?
        .get("id");

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO attendance_portal.day_records
            (id, student_id, day, attendance, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(&row.day)
        .bind(row.attendance)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
