mod budget;
mod config;
mod db;
mod models;
mod run;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const DB_PATH_VAR: &str = "BUDGETCALC_DB";
const LOG_VAR: &str = "BUDGETCALC_LOG";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    init_logging(&data_dir)?;

    let config = config::Config::from_env();
    let db_path = get_db_path(&data_dir);
    let mut db = db::Database::open(&db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db, config),
        2.. => run::as_cli(&args, &mut db, config),
        _ => {
            eprintln!("Usage: budgetcalc [command]");
            Ok(())
        }
    }
}

/// Log to a file next to the database; the terminal belongs to the TUI.
fn init_logging(data_dir: &Path) -> Result<()> {
    let path = data_dir.join("budgetcalc.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetcalc", "BudgeCalc")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

fn get_db_path(data_dir: &Path) -> PathBuf {
    match std::env::var_os(DB_PATH_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir.join("budgetcalc.db"),
    }
}
