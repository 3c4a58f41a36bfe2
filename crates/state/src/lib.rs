//! `projboard-state`: the observable project store.
//!
//! [`ProjectState`] owns the ordered project list. Every mutation runs the
//! `Project` aggregate, then synchronously hands an immutable [`Snapshot`] to each
//! registered [`StateListener`] and to every channel [`Subscription`].
//!
//! [`Subscription`]: projboard_events::Subscription

pub mod listener;
pub mod snapshot;
pub mod store;

pub use listener::{ListenerRegistry, StateListener};
pub use snapshot::Snapshot;
pub use store::{ProjectSnapshot, ProjectState, StateError};
