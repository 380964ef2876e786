use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use corrector::{
    parse_registry, BatchCorrector, CanonicalNameProvider, CanonicalRegistry, CorrectorConfig,
    FileNameProvider, ResolutionOutcome, SqliteCursorStore, SqliteNameProvider,
    SqliteRecordStore,
};
use database::{canonical_zone, sqlite_url_from_path, zone_record, Database};

#[derive(Debug, Parser)]
#[command(name = "commune-fix")]
#[command(about = "Correct free-text commune names against the canonical zone registry")]
struct Args {
    /// SQLite database path or sqlite: URL
    #[arg(long, env = "SQLITE_PATH", default_value = "./data/communes.db")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve every stored commune and rewrite unambiguous matches
    Run {
        /// Compute and report without writing
        #[arg(long)]
        dry_run: bool,

        /// Records per page (falls back to COMMUNE_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Maximum entries per report list (falls back to COMMUNE_REPORT_LIMIT)
        #[arg(long)]
        report_limit: Option<usize>,

        /// Continue after the last committed page of an interrupted run
        #[arg(long)]
        resume: bool,

        /// Read canonical names from a file instead of the database
        #[arg(long)]
        registry_file: Option<PathBuf>,

        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Show how raw values would resolve
    Resolve {
        /// Raw commune values
        #[arg(required = true)]
        raw: Vec<String>,

        /// Read canonical names from a file instead of the database
        #[arg(long)]
        registry_file: Option<PathBuf>,
    },

    /// Replace the stored registry with the names of a file (one per line)
    ImportRegistry {
        /// Registry file path
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let db = Database::connect(&sqlite_url_from_path(&args.db)).await?;
    db.migrate().await?;

    match args.command {
        Command::Run {
            dry_run,
            batch_size,
            report_limit,
            resume,
            registry_file,
            json,
        } => {
            let mut config = CorrectorConfig::from_env();
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            if let Some(report_limit) = report_limit {
                config.report_limit = report_limit;
            }
            config.dry_run |= dry_run;
            config.resume |= resume;

            let json = json.as_deref();
            match registry_file {
                Some(path) => run(FileNameProvider::new(path), &db, config, json).await?,
                None => run(SqliteNameProvider::new(db.clone()), &db, config, json).await?,
            }
        }
        Command::Resolve { raw, registry_file } => {
            let registry = match registry_file {
                Some(path) => CanonicalRegistry::load(&FileNameProvider::new(path)).await?,
                None => CanonicalRegistry::load(&SqliteNameProvider::new(db.clone())).await?,
            };
            for value in &raw {
                let outcome = registry.resolve(Some(value.as_str()));
                println!("{:<32} {}", format!("{:?}", value), describe(&outcome));
            }
        }
        Command::ImportRegistry { file } => {
            let contents = tokio::fs::read_to_string(&file).await?;
            let registry = CanonicalRegistry::build(parse_registry(&contents))?;
            let count =
                canonical_zone::replace_canonical_names(db.pool(), registry.names()).await?;
            info!(file = %file.display(), "Imported {} canonical zone names", count);
        }
    }

    db.close().await;
    Ok(())
}

async fn run<P>(
    provider: P,
    db: &Database,
    config: CorrectorConfig,
    json: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>>
where
    P: CanonicalNameProvider,
{
    let total = zone_record::count_records(db.pool()).await?;
    info!("{} zone records to check", total);

    let corrector = BatchCorrector::new(provider, SqliteRecordStore::new(db.clone()), config)
        .with_cursor_store(Arc::new(SqliteCursorStore::new(db.clone())));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let report = corrector.run_with_shutdown(shutdown).await?;
    print!("{}", report.summary());

    if let Some(path) = json {
        tokio::fs::write(path, report.to_json()?).await?;
        info!(path = %path.display(), "Wrote JSON report");
    }

    if report.cancelled {
        warn!("Run cancelled; rerun with --resume to continue");
    } else if corrector.config().dry_run && report.updated_count > 0 {
        info!(
            "Dry run: rerun without --dry-run to apply {} updates",
            report.updated_count
        );
    }

    Ok(())
}

fn describe(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::Skipped => "skipped (blank)".to_string(),
        ResolutionOutcome::Matched { canonical, tier } => {
            format!("matched {} ({:?})", canonical, tier)
        }
        ResolutionOutcome::Ambiguous { candidates } => {
            let names: Vec<&str> = candidates.iter().map(String::as_str).collect();
            format!("ambiguous: {}", names.join(" | "))
        }
        ResolutionOutcome::Unmatched => "unmatched".to_string(),
    }
}
