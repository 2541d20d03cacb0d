use std::collections::HashMap;

use clap::ValueEnum;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use worklog_core::TimesheetRollup;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Level {
    Years,
    Months,
    Weeks,
    Days,
}

// Helper structs for table rows
#[derive(Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Total (h)")]
    total: String,
    #[tabled(rename = "Attendance (h)")]
    attendance: String,
    #[tabled(rename = "Absence (h)")]
    absence: String,
    #[tabled(rename = "Projects")]
    projects: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Total (h)")]
    total: String,
    #[tabled(rename = "Attendance (h)")]
    attendance: String,
    #[tabled(rename = "Absence (h)")]
    absence: String,
    #[tabled(rename = "Projects")]
    projects: String,
}

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Week")]
    week: i64,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Total (h)")]
    total: String,
    #[tabled(rename = "Attendance (h)")]
    attendance: String,
    #[tabled(rename = "Absence (h)")]
    absence: String,
    #[tabled(rename = "Projects")]
    projects: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Week")]
    week: i64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Total (h)")]
    total: String,
    #[tabled(rename = "Attendance (h)")]
    attendance: String,
    #[tabled(rename = "Absence (h)")]
    absence: String,
    #[tabled(rename = "Projects")]
    projects: String,
}

fn hours(value: f64) -> String {
    format!("{:.1}", value)
}

// Project sums sorted by name so output stays deterministic.
fn project_summary(projects: &HashMap<String, f64>) -> String {
    if projects.is_empty() {
        return "-".to_string();
    }
    let mut items: Vec<(&String, &f64)> = projects.iter().collect();
    items.sort_by(|a, b| a.0.cmp(b.0));
    items
        .into_iter()
        .map(|(name, total)| format!("{} {:.1}", name, total))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_level(rollup: &TimesheetRollup, level: Level) {
    match level {
        Level::Years => {
            let rows: Vec<YearRow> = rollup
                .years
                .iter()
                .map(|b| YearRow {
                    year: b.year,
                    total: hours(b.totals.duration),
                    attendance: hours(b.totals.attendance),
                    absence: hours(b.totals.absence),
                    projects: project_summary(&b.totals.projects),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }
        Level::Months => {
            let rows: Vec<MonthRow> = rollup
                .months
                .iter()
                .map(|b| MonthRow {
                    year: b.year,
                    month: b.name.clone(),
                    total: hours(b.totals.duration),
                    attendance: hours(b.totals.attendance),
                    absence: hours(b.totals.absence),
                    projects: project_summary(&b.totals.projects),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }
        Level::Weeks => {
            let rows: Vec<WeekRow> = rollup
                .weeks
                .iter()
                .map(|b| WeekRow {
                    week: b.week,
                    range: rollup.week_label(b.week),
                    total: hours(b.totals.duration),
                    attendance: hours(b.totals.attendance),
                    absence: hours(b.totals.absence),
                    projects: project_summary(&b.totals.projects),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }
        Level::Days => {
            let rows: Vec<DayRow> = rollup.days.iter().map(day_row).collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }
    }
}

pub fn print_week(rollup: &TimesheetRollup, back: usize) {
    if back >= rollup.weeks.len() {
        println!("Only {} week(s) of data available.", rollup.weeks.len());
        return;
    }

    let bucket = &rollup.weeks[rollup.weeks.len() - 1 - back];
    println!(
        "\n\x1b[1;36mWeek {}\x1b[0m {} (Total: {:.1}h, Attendance: {:.1}h, Absence: {:.1}h)",
        bucket.week,
        rollup.week_label(bucket.week),
        bucket.totals.duration,
        bucket.totals.attendance,
        bucket.totals.absence,
    );

    let rows: Vec<DayRow> = rollup
        .days
        .iter()
        .filter(|d| d.week == bucket.week)
        .map(day_row)
        .collect();
    println!("{}", Table::new(rows).with(Style::modern()));
}

fn day_row(bucket: &worklog_core::DayBucket) -> DayRow {
    DayRow {
        week: bucket.week,
        date: bucket.date.format("%Y-%m-%d").to_string(),
        day: bucket.date.format("%a").to_string(),
        total: hours(bucket.totals.duration),
        attendance: hours(bucket.totals.attendance),
        absence: hours(bucket.totals.absence),
        projects: project_summary(&bucket.totals.projects),
    }
}
