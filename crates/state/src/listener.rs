//! Observer registration and fan-out.

use std::sync::{Arc, RwLock};

use crate::snapshot::Snapshot;

/// Receives a snapshot after every store mutation.
///
/// Implementations run synchronously on the mutating thread and must not
/// mutate the store they observe (nothing guards against the recursion).
pub trait StateListener<T>: Send + Sync {
    fn notify(&self, snapshot: &Snapshot<T>);
}

impl<T, L> StateListener<T> for Arc<L>
where
    L: StateListener<T> + ?Sized,
{
    fn notify(&self, snapshot: &Snapshot<T>) {
        (**self).notify(snapshot)
    }
}

/// Adapts a closure into a [`StateListener`].
pub(crate) struct FnListener<F>(pub(crate) F);

impl<T, F> StateListener<T> for FnListener<F>
where
    F: Fn(&Snapshot<T>) + Send + Sync,
{
    fn notify(&self, snapshot: &Snapshot<T>) {
        (self.0)(snapshot)
    }
}

/// Ordered list of listeners over snapshots of `T`.
///
/// Listeners are invoked in registration order. The same listener may be
/// registered twice (and is then notified twice); there is no removal.
pub struct ListenerRegistry<T> {
    listeners: RwLock<Vec<Arc<dyn StateListener<T>>>>,
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn StateListener<T>>) {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(listener),
            Err(_) => tracing::warn!("listener registry lock poisoned; listener not registered"),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every listener with `snapshot`.
    ///
    /// The registry lock is released before any listener runs, so listeners may
    /// register further listeners; those are first notified on the next call.
    pub fn notify_all(&self, snapshot: &Snapshot<T>) {
        let listeners: Vec<_> = match self.listeners.read() {
            Ok(l) => l.clone(),
            Err(_) => {
                tracing::warn!("listener registry lock poisoned; skipping notification");
                return;
            }
        };

        for listener in listeners {
            listener.notify(snapshot);
        }
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<T> core::fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, u64)>>>,
    }

    impl StateListener<u32> for Recorder {
        fn notify(&self, snapshot: &Snapshot<u32>) {
            self.log.lock().unwrap().push((self.name, snapshot.revision()));
        }
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry: ListenerRegistry<u32> = ListenerRegistry::new();
        registry.add(Arc::new(Recorder { name: "a", log: log.clone() }));
        registry.add(Arc::new(Recorder { name: "b", log: log.clone() }));

        registry.notify_all(&Snapshot::new(1, vec![10u32]));
        registry.notify_all(&Snapshot::new(2, vec![10u32, 20]));

        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn duplicate_registration_is_notified_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry: ListenerRegistry<u32> = ListenerRegistry::new();
        let listener: Arc<dyn StateListener<u32>> = Arc::new(Recorder { name: "dup", log: log.clone() });
        registry.add(listener.clone());
        registry.add(listener);

        registry.notify_all(&Snapshot::default());

        assert_eq!(registry.len(), 2);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn closures_can_listen() {
        let seen = Arc::new(Mutex::new(0usize));
        let registry: ListenerRegistry<u32> = ListenerRegistry::new();
        let sink = seen.clone();
        registry.add(Arc::new(FnListener(move |s: &Snapshot<u32>| {
            *sink.lock().unwrap() += s.len();
        })));

        registry.notify_all(&Snapshot::new(1, vec![1u32, 2, 3]));

        assert_eq!(*seen.lock().unwrap(), 3);
    }
}
