use std::{fs, io, path::Path};

use log::{debug, info};
use thiserror::Error;

use crate::{estimator::EstimateError, model::TransitionTable};

/// Errors from loading or storing a cached transition table
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] io::Error),
    #[error("cache decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Read a previously stored table
pub fn load(path: &Path) -> Result<TransitionTable, CacheError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Persist a table, replacing any previous cache
pub fn store(path: &Path, table: &TransitionTable) -> Result<(), CacheError> {
    fs::write(path, serde_json::to_string(table)?)?;
    Ok(())
}

/// Load the cached table if present; otherwise build one, store it, and
/// return it
pub fn load_or_else<F>(path: &Path, build: F) -> Result<TransitionTable, CacheError>
where
    F: FnOnce() -> Result<TransitionTable, EstimateError>,
{
    if path.exists() {
        debug!("loading cached transition table from {}", path.display());
        return load(path);
    }
    info!("no transition table at {}; estimating", path.display());
    let table = build()?;
    store(path, &table)?;
    Ok(table)
}
