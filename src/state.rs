use crate::models::Filament;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

// The mutex doubles as the write serializer: every mutation holds it across
// the in-memory change and the full-file rewrite.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub filaments: Arc<Mutex<Vec<Filament>>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, filaments: Vec<Filament>) -> Self {
        Self {
            data_path,
            filaments: Arc::new(Mutex::new(filaments)),
        }
    }
}
