//! Errors surfaced by the board's views.

use thiserror::Error;

use projboard_state::StateError;

use crate::host::HostError;
use crate::project_input::InputError;

#[derive(Debug, Error)]
pub enum BoardError {
    /// Submitted input failed validation (the user has already been alerted).
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("no project matches '{0}'")]
    UnknownProject(String),

    #[error("'{prefix}' matches {matches} projects")]
    AmbiguousProject { prefix: String, matches: usize },
}
