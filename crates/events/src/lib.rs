//! Domain events, commands and the publish/subscribe mechanics used to fan
//! state changes out to observers.

pub mod bus;
pub mod command;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use command::Command;
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
