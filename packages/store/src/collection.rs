//! Ordered record collection shared by every store.
//!
//! A [`Collection`] is a `Vec` with id-based accessors. Insertion order is the
//! only ordering it maintains; derived views ([`Collection::by_subject`],
//! [`Collection::recent`]) return copies and leave the collection untouched.

use serde::{Deserialize, Serialize};

/// A record addressable by id.
pub trait Record {
    type Id: PartialEq + ?Sized;

    fn id(&self) -> &Self::Id;
}

/// A record that belongs to a subject.
pub trait SubjectScoped {
    fn subject_id(&self) -> &str;
}

/// A record stamped with a creation time in epoch milliseconds.
pub trait Timestamped {
    fn created_at(&self) -> i64;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn prepend(&mut self, record: T) {
        self.items.insert(0, record);
    }

    pub fn append(&mut self, record: T) {
        self.items.push(record);
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Replace the record whose id matches `record`'s. Returns `false` when
    /// there is no such record; the collection is then unchanged.
    pub fn update(&mut self, record: T) -> bool {
        match self.items.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Patch a record in place.
    pub fn modify(&mut self, id: &T::Id, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let pos = self.items.iter().position(|r| r.id() == id)?;
        Some(self.items.remove(pos))
    }

    /// Keep only records matching `keep`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|r| keep(r));
        before - self.items.len()
    }
}

impl<T: Record + SubjectScoped + Clone> Collection<T> {
    /// Records belonging to `subject_id`, in collection order.
    pub fn by_subject(&self, subject_id: &str) -> Vec<T> {
        self.items
            .iter()
            .filter(|r| r.subject_id() == subject_id)
            .cloned()
            .collect()
    }

    pub fn remove_by_subject(&mut self, subject_id: &str) -> usize {
        self.retain(|r| r.subject_id() != subject_id)
    }
}

impl<T: Record + Timestamped + Clone> Collection<T> {
    /// The `limit` newest records, newest first. Records with equal
    /// timestamps keep their collection order.
    pub fn recent(&self, limit: usize) -> Vec<T> {
        let mut sorted = self.items.clone();
        sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        sorted.truncate(limit);
        sorted
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
