use clap::{Parser, Subcommand};
use importer::canonical::{
    models::CanonicalRoster, transformer::CanonicalTransformer, validator::CanonicalValidator,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::path::PathBuf;
use storage::services::{assignment, standings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "range-import")]
#[command(about = "Archery league roster import and event maintenance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a canonical roster file and upsert its participants
    Roster {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Run line-time assignment for an event
    Assign {
        #[arg(long)]
        event: Uuid,

        /// Clear existing assignments first
        #[arg(long)]
        reset: bool,
    },
    /// Print the event's standings
    Standings {
        #[arg(long)]
        event: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "range_import={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Roster {
            file,
            validate_only,
        } => {
            handle_roster_import(file, validate_only, &cli.database_url).await?;
        }
        Commands::Assign { event, reset } => {
            let pool = connect(&cli.database_url).await?;
            let summary = assignment::assign(&pool, event, reset).await?;

            match summary.reason {
                Some(reason) => tracing::info!("Nothing to assign: {}", reason),
                None => tracing::info!(
                    "✓ Assigned {}, waitlisted {}, skipped {}",
                    summary.assigned,
                    summary.waitlisted,
                    summary.skipped
                ),
            }
        }
        Commands::Standings { event } => {
            let pool = connect(&cli.database_url).await?;
            let entries = standings::event_standings(&pool, event).await?;

            if entries.is_empty() {
                tracing::warn!("No scores recorded for event {}", event);
            }
            for entry in entries {
                println!(
                    "{:>3}  {:<28} {:>5} {:>4}X  avg {:>6}  ({} periods)",
                    entry.rank,
                    format!("{} {}", entry.first_name, entry.last_name),
                    entry.total_score,
                    entry.x_count,
                    entry.average_score.to_string(),
                    entry.periods_shot
                );
            }
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

async fn handle_roster_import(
    file: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading canonical roster from: {}", file.display());

    let json_content = tokio::fs::read_to_string(&file).await?;
    let roster: CanonicalRoster = serde_json::from_str(&json_content)?;

    tracing::info!(
        "Loaded roster for event: {} (v{}, {} participants)",
        roster.event_slug,
        roster.format_version,
        roster.participants.len()
    );

    tracing::info!("Validating canonical roster...");
    let validation_report = CanonicalValidator::validate(&roster)?;
    validation_report.log_warnings();
    tracing::info!("✓ Validation successful!");

    if validate_only {
        return Ok(());
    }

    let pool = connect(database_url).await?;
    let summary = CanonicalTransformer::new(&pool)
        .import_to_database(&roster)
        .await?;

    tracing::info!(
        "✓ Import completed: {} created, {} updated",
        summary.created,
        summary.updated
    );

    Ok(())
}
