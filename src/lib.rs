pub mod app;
pub mod connectivity;
pub mod errors;
pub mod handlers;
pub mod mailer;
pub mod manager;
pub mod models;
pub mod remote;
pub mod state;
pub mod storage;
pub mod summary;

pub use app::router;
pub use connectivity::Connectivity;
pub use manager::HabitManager;
pub use state::AppState;
pub use storage::resolve_data_path;
