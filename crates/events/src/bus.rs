//! Publish/subscribe abstraction (mechanics only).
//!
//! The bus is the channel-based counterpart of the store's listener list: every
//! subscriber receives its own copy of each published message, in publication
//! order. Publishing never blocks on subscribers; they drain their channel when
//! it suits them.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscription to a message stream.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics). Dropping the subscription unsubscribes it;
/// the bus prunes dead subscribers on the next publish.
///
/// ```ignore
/// let subscription = state.subscribe();
/// state.add_project("Build API", "Design REST endpoints", 3)?;
/// for snapshot in subscription.drain() {
///     println!("revision {}", snapshot.revision());
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Collect every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Message bus (pub/sub abstraction).
///
/// - **Broadcast**: each subscriber gets a copy of every message.
/// - **Ordered**: a single publisher's messages arrive in publication order.
/// - **No storage**: late subscribers do not see earlier messages.
///
/// `publish()` can fail (e.g. a poisoned lock); the failure is surfaced to the
/// caller, which decides whether it matters.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
