pub mod app;
pub mod errors;
pub mod handlers;
pub mod inventory;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{load_filaments, resolve_data_path};
