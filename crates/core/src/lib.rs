//! `projboard-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no rendering or IO concerns):
//! identifiers, the domain error model, aggregate traits and the input validator.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod validation;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use id::AggregateId;
pub use validation::{Validatable, ValidatableValue, Violation, validate};
