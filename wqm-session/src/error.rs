use wqm_core::SourceError;
use wqm_render::RenderError;

/// Why a session step did not update the map.
///
/// The session has already reported the failure on its status line when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
