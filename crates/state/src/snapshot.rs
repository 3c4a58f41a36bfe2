//! Immutable point-in-time copies of store contents.

use std::sync::Arc;

/// An immutable copy of the store's item sequence.
///
/// Cloning is cheap (the items are shared), and nothing reachable from a
/// snapshot can mutate the store. `revision` counts the notifying mutations
/// that happened before the snapshot was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    revision: u64,
    items: Arc<[T]>,
}

impl<T> Snapshot<T> {
    pub fn new(revision: u64, items: impl Into<Arc<[T]>>) -> Self {
        Self {
            revision,
            items: items.into(),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            revision: 0,
            items: Arc::from(Vec::new()),
        }
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
