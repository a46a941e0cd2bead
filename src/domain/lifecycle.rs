// src/domain/lifecycle.rs

use std::ops::Deref;

/// Write intent attached to an entity for the current unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Updated,
    Removed,
}

/// An entity together with the write intent a repository should act on.
///
/// Repositories never inspect the entity to guess what happened to it: they
/// dispatch on [`Tracked::change`]. Read access goes through `Deref`; every
/// mutation goes through [`Tracked::update`] or [`Tracked::try_update`] so the
/// intent cannot drift from the data.
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    entity: T,
    change: Option<Change>,
}

impl<T> Tracked<T> {
    /// Wraps a brand new entity. Used by the domain constructors.
    pub fn created(entity: T) -> Self {
        Self {
            entity,
            change: Some(Change::Created),
        }
    }

    /// Wraps an entity hydrated from storage. No intent is attached.
    pub fn loaded(entity: T) -> Self {
        Self {
            entity,
            change: None,
        }
    }

    pub fn change(&self) -> Option<Change> {
        self.change
    }

    pub fn mark_create(&mut self) {
        self.change = Some(Change::Created);
    }

    /// Marks the entity as modified. A pending insert stays an insert.
    pub fn mark_update(&mut self) {
        if self.change != Some(Change::Created) {
            self.change = Some(Change::Updated);
        }
    }

    /// Marks the entity for soft deletion, overriding any earlier intent.
    pub fn mark_remove(&mut self) {
        self.change = Some(Change::Removed);
    }

    pub fn is_created(&self) -> bool {
        self.change == Some(Change::Created)
    }

    pub fn is_updated(&self) -> bool {
        self.change == Some(Change::Updated)
    }

    pub fn is_removed(&self) -> bool {
        self.change == Some(Change::Removed)
    }

    /// Applies an infallible mutation and marks the entity updated.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut self.entity);
        self.mark_update();
        out
    }

    /// Applies a fallible mutation. The intent only changes when it succeeds.
    pub fn try_update<R, E>(&mut self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let out = f(&mut self.entity)?;
        self.mark_update();
        Ok(out)
    }

    /// Mutable access for changes whose intent is carried by a child
    /// collection, e.g. appending a freshly created child.
    pub(crate) fn entity_mut(&mut self) -> &mut T {
        &mut self.entity
    }

    pub fn into_inner(self) -> T {
        self.entity
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        value: i32,
    }

    #[test]
    fn test_created_entity_reports_created() {
        let tracked = Tracked::created(Counter::default());
        assert!(tracked.is_created());
        assert!(!tracked.is_updated());
        assert!(!tracked.is_removed());
    }

    #[test]
    fn test_loaded_entity_has_no_intent() {
        let tracked = Tracked::loaded(Counter::default());
        assert_eq!(tracked.change(), None);
    }

    #[test]
    fn test_update_marks_loaded_entity() {
        let mut tracked = Tracked::loaded(Counter::default());
        tracked.update(|c| c.value += 1);
        assert!(tracked.is_updated());
        assert_eq!(tracked.value, 1);
    }

    #[test]
    fn test_update_keeps_pending_insert() {
        let mut tracked = Tracked::created(Counter::default());
        tracked.update(|c| c.value = 5);
        assert!(tracked.is_created());
    }

    #[test]
    fn test_remove_overrides_previous_intent() {
        let mut tracked = Tracked::loaded(Counter::default());
        tracked.mark_update();
        tracked.mark_remove();
        assert!(tracked.is_removed());
        assert!(!tracked.is_updated());
    }

    #[test]
    fn test_failed_update_leaves_intent_untouched() {
        let mut tracked = Tracked::loaded(Counter::default());
        let result: Result<(), &str> = tracked.try_update(|_| Err("nope"));
        assert!(result.is_err());
        assert_eq!(tracked.change(), None);
    }
}
