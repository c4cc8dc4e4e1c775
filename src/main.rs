use clap::Parser;
use db_backup::backup::backup_config::BackupConfig;
use db_backup::backup::report::report;
use std::path::PathBuf;
use std::process::exit;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Dump a MySQL database to a timestamped file and print its path
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Env file to load before reading the environment (defaults to .env when present)
    #[arg(short, long)]
    env_file: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let res = BackupConfig::from_env(args.env_file.as_deref())
        .and_then(BackupConfig::validated)
        .and_then(|config| {
            if let Ok(json) = config.to_redacted_json() {
                debug!("Effective config: {json}");
            }
            config.run_backup(chrono::Utc::now())
        });

    let code = report(res, &mut std::io::stdout());
    exit(code);
}
