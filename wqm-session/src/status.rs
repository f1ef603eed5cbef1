//! The status line, the pages' only textual feedback channel.

use serde::Serialize;
use wqm_core::View;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum Status {
    #[default]
    Idle,
    Loading(String),
    Ready(String),
    Failed(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Idle => "",
            Status::Loading(s) | Status::Ready(s) | Status::Failed(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Failed(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading(_))
    }

    pub fn loading() -> Self {
        Status::Loading("Loading…".to_string())
    }

    pub fn loading_zones() -> Self {
        Status::Loading("Loading zones…".to_string())
    }

    pub fn plotted_sites(n: usize) -> Self {
        Status::Ready(format!("Plotted {} sample sites.", n))
    }

    pub fn loaded_zones(n: usize) -> Self {
        Status::Ready(format!("Loaded {} zones. Click a zone to view details.", n))
    }

    pub fn loaded_samples(n: usize) -> Self {
        Status::Ready(format!("Loaded {} samples.", n))
    }

    /// "Error loading samples." and the like, for a failed bulk load.
    pub fn load_failed(view: View) -> Self {
        Status::Failed(format!("Error loading {}.", view.noun()))
    }
}
