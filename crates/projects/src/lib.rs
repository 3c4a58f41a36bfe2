//! Projects domain module.
//!
//! This crate contains the business rules for board projects, implemented purely
//! as deterministic domain logic (no rendering, no storage, no notification).

pub mod project;

pub use project::{
    CreateProject, MoveProject, Project, ProjectCommand, ProjectCreated, ProjectEvent, ProjectId,
    ProjectMoved, ProjectStatus,
};
