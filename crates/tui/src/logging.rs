use std::{fs::OpenOptions, path::Path, sync::Arc};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Installs the global tracing subscriber.
///
/// The terminal belongs to the UI, so events go to `config.log_file`.
pub fn init(config: &AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.log_file).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(&config.level))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

fn filter(level: &str) -> String {
    format!("duckvault_tui={level},duckvault={level},ledger={level}")
}
