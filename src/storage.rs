use crate::errors::AppError;
use crate::models::Filament;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/filaments.json"))
}

// A missing file is seeded with an empty collection; an unreadable or
// unparsable one is treated as empty too, with only a log line to show for it.
pub async fn load_filaments(path: &Path) -> Vec<Filament> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                error!("failed to parse filament file: {err}");
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if let Err(err) = fs::write(path, b"[]").await {
                error!("failed to seed filament file: {err}");
            }
            Vec::new()
        }
        Err(err) => {
            error!("failed to read filament file: {err}");
            Vec::new()
        }
    }
}

pub async fn persist_filaments(path: &Path, records: &[Filament]) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(records).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
