mod report;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use worklog_core::{ChartData, DashboardDataService, FileEntryRepository, StoredRecord};

#[derive(Parser)]
#[command(name = "worklog")]
#[command(about = "Timesheet rollup reports over the local worklog store", long_about = None)]
struct Cli {
    /// Data directory (defaults to ~/.worklog)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record a timesheet entry
    Add {
        #[arg(long)]
        user: String,
        /// attendance or absence
        #[arg(long)]
        kind: String,
        /// Entry date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Project name, for attendance entries
        #[arg(long)]
        project: Option<String>,
        /// Worked or absent hours
        #[arg(long)]
        hours: f64,
    },
    /// List user ids present in the store
    Users,
    /// Print a rollup table for a user
    Report {
        #[arg(long)]
        user: String,
        /// Aggregation level
        #[arg(long, value_enum, default_value = "weeks")]
        by: report::Level,
    },
    /// Show one week in detail
    Week {
        #[arg(long)]
        user: String,
        /// How many weeks to go back from the latest
        #[arg(long, default_value_t = 0)]
        back: usize,
    },
}

fn canonical_kind(kind: &str) -> String {
    match kind.to_lowercase().as_str() {
        "attendance" => "Attendance".to_string(),
        "absence" => "Absence".to_string(),
        // Stored as given; unknown kinds still count toward totals.
        _ => kind.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let repo = FileEntryRepository::new(cli.data)?;

    match cli.command {
        Commands::Add {
            user,
            kind,
            date,
            project,
            hours,
        } => {
            if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
                println!("Error: Invalid date '{}', expected YYYY-MM-DD.", date);
                return Ok(());
            }
            if !hours.is_finite() || hours < 0.0 {
                println!("Error: Hours must be a non-negative number.");
                return Ok(());
            }

            let kind = canonical_kind(&kind);
            repo.append_record(StoredRecord {
                user_id: user.clone(),
                kind: kind.clone(),
                date: date.clone(),
                project,
                duration: hours,
            })?;
            println!("Recorded {} entry for {}: {} ({}h)", kind, user, date, hours);
        }
        Commands::Users => {
            let users = repo.list_users()?;
            if users.is_empty() {
                println!("No users found.");
            } else {
                for user in users {
                    println!("{}", user);
                }
            }
        }
        Commands::Report { user, by } => {
            let service = DashboardDataService::new(repo);
            match service.get_chart_data(&user).await? {
                ChartData::NoData => println!("No timesheet entries found for {}.", user),
                ChartData::Ready(rollup) => report::print_level(&rollup, by),
            }
        }
        Commands::Week { user, back } => {
            let service = DashboardDataService::new(repo);
            match service.get_chart_data(&user).await? {
                ChartData::NoData => println!("No timesheet entries found for {}.", user),
                ChartData::Ready(rollup) => report::print_week(&rollup, back),
            }
        }
    }
    Ok(())
}
