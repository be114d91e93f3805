use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payrelease::application::service::PaymentService;
use payrelease::config::Settings;
use payrelease::domain::ports::PaymentStoreBox;
use payrelease::domain::validation::Validator;
use payrelease::infrastructure::audit::TracingAuditSink;
use payrelease::infrastructure::in_memory::{InMemoryDirectory, InMemoryPaymentStore};
use payrelease::interfaces::batch::run_commands;
use payrelease::interfaces::csv::command_reader::CommandReader;
use payrelease::interfaces::csv::payment_writer::PaymentWriter;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Settings file (currency/provider whitelists, user directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn open_store(db_path: Option<PathBuf>) -> Result<PaymentStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = payrelease::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryPaymentStore::new()))
        }
        None => Ok(Box::new(InMemoryPaymentStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .init();

    let settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;
    let service = PaymentService::new(
        open_store(cli.db_path)?,
        Box::new(InMemoryDirectory::with_profiles(settings.profiles())),
        Arc::new(TracingAuditSink),
        Validator::new(settings.policy.clone()),
    );

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    let outcome = run_commands(&service, reader.commands()).await;
    // Audit writes run on spawned tasks; the runtime drops them on exit.
    service.flush_audit().await;
    let summary = outcome.into_diagnostic()?;
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        unreadable = summary.unreadable,
        "batch complete"
    );

    let payments = service.all_payments().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = PaymentWriter::new(stdout.lock());
    writer.write_payments(&payments).into_diagnostic()?;

    Ok(())
}
