use crate::models::DailyHabits;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

/// Reads the single persisted day blob. An absent file is simply no
/// data; an unreadable or schema-mismatched blob is logged and treated
/// the same way, so the caller falls back to defaults rather than
/// trusting a corrupt record.
pub async fn load_day(path: &Path) -> Option<DailyHabits> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(day) => Some(day),
            Err(err) => {
                error!("failed to parse habits file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read habits file: {err}");
            None
        }
    }
}

pub async fn persist_day(path: &Path, day: &DailyHabits) -> Result<(), std::io::Error> {
    let payload = serde_json::to_vec_pretty(day).map_err(std::io::Error::other)?;
    fs::write(path, payload).await?;
    Ok(())
}
