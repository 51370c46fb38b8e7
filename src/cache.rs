//! Client-side collection cache
//!
//! Each page keeps the collections it fetched in a [`CollectionCache`].
//! Mutations patch the cache locally; with [`Invalidation::Refetch`] the
//! page additionally re-fetches the collection after every successful
//! mutation. A snapshot can be taken before an optimistic change and
//! restored if the server rejects it.

use crate::client::ClientResult;
use crate::config::Invalidation;
use crate::model::{Entity, Id};
use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionCache<T> {
    name: &'static str,
    items: Vec<T>,
    snapshot: Option<Vec<T>>,
}

impl<T: Entity + Clone> CollectionCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            items: Vec::new(),
            snapshot: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Replace the whole collection (fresh fetch or optimistic reorder)
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.snapshot = None;
    }

    /// Newly created entities go first
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Remove exactly the entity with `id`; returns whether it was present
    pub fn remove(&mut self, id: Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Swap in the server's copy of an entity, keeping its position
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Remember the current items so an optimistic change can be undone
    pub fn checkpoint(&mut self) {
        self.snapshot = Some(self.items.clone());
    }

    /// Restore the last checkpoint; returns false if there was none
    pub fn rollback(&mut self) -> bool {
        match self.snapshot.take() {
            Some(items) => {
                self.items = items;
                true
            }
            None => false,
        }
    }

    /// Forget the last checkpoint after the change was confirmed
    pub fn commit(&mut self) {
        self.snapshot = None;
    }

    /// Apply the invalidation rule after a successful, locally patched mutation
    ///
    /// With `Refetch` the collection is reloaded; if that fails the patched
    /// state is kept and the failure is logged.
    pub async fn settle<F, Fut>(&mut self, policy: Invalidation, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Vec<T>>>,
    {
        if policy != Invalidation::Refetch {
            return;
        }

        match fetch().await {
            Ok(items) => {
                tracing::debug!(collection = self.name, count = items.len(), "Refetched");
                self.items = items;
            }
            Err(e) => {
                tracing::warn!(
                    collection = self.name,
                    error = %e,
                    "Refetch failed, keeping local copy"
                );
            }
        }
    }
}
