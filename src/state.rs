use crate::manager::HabitManager;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<HabitManager>,
}

impl AppState {
    pub fn new(manager: Arc<HabitManager>) -> Self {
        Self { manager }
    }
}
