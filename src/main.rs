use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod calendar;
mod db;
mod models;
mod normalize;
mod report;
mod risk;
mod rollup;
mod series;

use models::{DashboardPayload, DayStatus};

#[derive(Parser)]
#[command(name = "attendance-engine")]
#[command(about = "Attendance aggregation and calendar projection for the school portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import raw day records from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the six-week month grid for a student
    Calendar {
        #[arg(long)]
        email: String,
        #[arg(long)]
        year: Option<i32>,
        /// Zero-based month index (0 = January); defaults to the current month
        #[arg(long)]
        month: Option<u32>,
    },
    /// Write the chart-ready dashboard payload as JSON
    Dashboard {
        #[arg(long)]
        email: String,
        #[arg(long)]
        year: Option<i32>,
        /// Zero-based month index (0 = January); defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        #[arg(long, default_value = "dashboard.json")]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        email: String,
        #[arg(long)]
        year: Option<i32>,
        /// Zero-based month index (0 = January); defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} day records from {}.", csv.display());
        }
        Commands::Calendar { email, year, month } => {
            let (year, month_index) = resolve_month(year, month);
            let raw_days = db::fetch_day_records(&pool, &email).await?;
            let attendance = normalize::build_ledger(&raw_days);
            report_dropped(&attendance);
            let cells = calendar::month_grid(year, month_index, &attendance.ledger)?;
            print_grid(&cells);
        }
        Commands::Dashboard {
            email,
            year,
            month,
            out,
        } => {
            let (year, month_index) = resolve_month(year, month);
            let payload = assemble_dashboard(&pool, &email, year, month_index).await?;
            let json = serde_json::to_string_pretty(&payload)?;
            std::fs::write(&out, json)?;
            println!("Dashboard payload written to {}.", out.display());
        }
        Commands::Report {
            email,
            year,
            month,
            out,
        } => {
            let (year, month_index) = resolve_month(year, month);
            let snapshot = load_snapshot(&pool, &email).await?;
            report_dropped(&snapshot.attendance);
            let report = report::build_report(
                &email,
                year,
                month_index,
                &snapshot.attendance,
                &snapshot.courses,
                &snapshot.trends,
                &snapshot.miss_counts,
            )?;
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

struct StudentSnapshot {
    attendance: models::NormalizedAttendance,
    courses: Vec<models::CoursePercentage>,
    trends: Vec<models::WeeklyTrend>,
    miss_counts: Vec<models::CourseMissCount>,
}

/// Fetch and normalize one student's data. Clamping and ledger building
/// happen here, at the intake boundary, so every consumer sees the same
/// canonical snapshot.
async fn load_snapshot(pool: &PgPool, email: &str) -> anyhow::Result<StudentSnapshot> {
    let raw_days = db::fetch_day_records(pool, email).await?;
    let (courses, miss_counts) = db::fetch_course_stats(pool, email).await?;
    let trends = db::fetch_weekly_trends(pool, email).await?;

    Ok(StudentSnapshot {
        attendance: normalize::build_ledger(&raw_days),
        courses: normalize::normalize_percentages(&courses),
        trends: normalize::normalize_trends(&trends),
        miss_counts,
    })
}

async fn assemble_dashboard(
    pool: &PgPool,
    email: &str,
    year: i32,
    month_index: u32,
) -> anyhow::Result<DashboardPayload> {
    let snapshot = load_snapshot(pool, email).await?;
    report_dropped(&snapshot.attendance);

    Ok(DashboardPayload {
        student_email: email.to_string(),
        year,
        month_index,
        time_series: series::daily_series(&snapshot.attendance.ledger).collect(),
        calendar: calendar::month_grid(year, month_index, &snapshot.attendance.ledger)?,
        weekly_trends: rollup::chronological_rollups(&snapshot.trends),
        risks: risk::classify_all(&snapshot.courses),
        most_missed: risk::most_missed(&snapshot.miss_counts).cloned(),
        dropped_days: snapshot.attendance.dropped.clone(),
    })
}

/// Year and month default to the current UTC month. Resolved once here so
/// the engine itself never reads the clock.
fn resolve_month(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let today = Utc::now().date_naive();
    (
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month0()),
    )
}

fn report_dropped(attendance: &models::NormalizedAttendance) {
    if !attendance.dropped.is_empty() {
        println!(
            "Dropped {} unparseable day records: {}",
            attendance.dropped.len(),
            attendance.dropped.join(", ")
        );
    }
}

fn print_grid(cells: &[models::CalendarCell]) {
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                let marker = match cell.status {
                    DayStatus::Present => '+',
                    DayStatus::Absent => 'x',
                    DayStatus::NoData => ' ',
                };
                if cell.is_in_target_month {
                    format!(" {:>2}{} ", cell.day_of_month, marker)
                } else {
                    format!("({:>2}){}", cell.day_of_month, marker)
                }
            })
            .collect();
        println!("{}", row.join(""));
    }
}
