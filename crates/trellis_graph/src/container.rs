// SPDX-License-Identifier: MIT OR Apache-2.0
//! Container policy for adjacency and membership collections.
//!
//! The graph never touches a concrete collection type directly: node
//! adjacency lists and group member sets go through [`Entries`], whose
//! backend is picked once from a [`ContainerKind`] when the graph is built.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Backend used for an [`Entries`] collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Ordered vector; duplicates allowed, linear search
    #[default]
    List,
    /// Insertion-ordered hash set; unique entries, constant time search
    Set,
}

impl ContainerKind {
    /// Create an empty collection with this backend
    pub fn entries<T: Hash + Eq>(self) -> Entries<T> {
        match self {
            Self::List => Entries::List(Vec::new()),
            Self::Set => Entries::Set(IndexSet::new()),
        }
    }
}

/// Collection of entries stored with a chosen backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entries<T: Hash + Eq> {
    /// Vector backend
    List(Vec<T>),
    /// Hash set backend
    Set(IndexSet<T>),
}

impl<T: Hash + Eq> Entries<T> {
    /// Backend kind of this collection
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::List(_) => ContainerKind::List,
            Self::Set(_) => ContainerKind::Set,
        }
    }

    /// Whether the same entry may be stored more than once
    pub fn is_multiset(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Insert an entry (a no-op for an entry already in a set)
    pub fn insert(&mut self, value: T) {
        match self {
            Self::List(v) => v.push(value),
            Self::Set(s) => {
                s.insert(value);
            }
        }
    }

    /// Remove one occurrence of `value`, returning whether it was found
    pub fn remove(&mut self, value: &T) -> bool {
        match self {
            Self::List(v) => match v.iter().position(|e| e == value) {
                Some(index) => {
                    v.remove(index);
                    true
                }
                None => false,
            },
            Self::Set(s) => s.shift_remove(value),
        }
    }

    /// Remove every occurrence of `value`, returning how many were removed
    pub fn remove_all(&mut self, value: &T) -> usize {
        match self {
            Self::List(v) => {
                let before = v.len();
                v.retain(|e| e != value);
                before - v.len()
            }
            Self::Set(s) => usize::from(s.shift_remove(value)),
        }
    }

    /// Membership test
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Self::List(v) => v.contains(value),
            Self::Set(s) => s.contains(value),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        match self {
            Self::List(v) => v.len(),
            Self::Set(s) => s.len(),
        }
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            Self::List(v) => Box::new(v.iter()),
            Self::Set(s) => Box::new(s.iter()),
        }
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        match self {
            Self::List(v) => v.clear(),
            Self::Set(s) => s.clear(),
        }
    }
}

impl<T: Hash + Eq> Default for Entries<T> {
    fn default() -> Self {
        ContainerKind::default().entries()
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a Entries<T> {
    type Item = &'a T;
    type IntoIter = Box<dyn Iterator<Item = &'a T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
