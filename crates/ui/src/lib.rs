//! `projboard-ui`: the board's view layer.
//!
//! Views talk to a [`RenderHost`] (the rendering surface) and to a shared
//! [`ProjectState`](projboard_state::ProjectState). [`Document`] is an in-memory
//! host used by the terminal front end and by tests.
//!
//! - [`ProjectInput`] gathers and validates form input, then adds projects.
//! - [`ProjectList`] renders one status partition and accepts drops.
//! - [`ProjectItem`] renders one project and starts drags.
//! - [`ProjectBoard`] wires them together (the composition root).

pub mod board;
pub mod component;
pub mod document;
pub mod drag;
pub mod error;
pub mod host;
pub mod project_input;
pub mod project_item;
pub mod project_list;

pub use board::ProjectBoard;
pub use component::Component;
pub use document::Document;
pub use drag::{DataTransfer, DragState, DropEffect, TEXT_PLAIN};
pub use error::BoardError;
pub use host::{ElementRef, HostError, InsertPosition, RenderHost};
pub use project_input::{INVALID_INPUT_MESSAGE, InputError, InputField, ProjectInput, RawInput, UserInput};
pub use project_item::{ProjectItem, persons_phrase};
pub use project_list::ProjectList;
