// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of primitive classes created by name.
//!
//! Deserializers only know the class name of the primitive they rebuild,
//! so the graph keeps, for each primitive kind, a table from class name to
//! an initializer run on the freshly built primitive.

use crate::error::{Result, TopologyError};
use indexmap::IndexMap;
use std::fmt;

/// Initializer run on a primitive created through its class name
pub type ClassInit<T> = Box<dyn Fn(&mut T)>;

/// Class name table for one primitive kind
pub struct ClassRegistry<T> {
    default_class: &'static str,
    classes: IndexMap<String, ClassInit<T>>,
}

impl<T> ClassRegistry<T> {
    /// Create a registry where only `default_class` is known
    pub fn new(default_class: &'static str) -> Self {
        Self {
            default_class,
            classes: IndexMap::new(),
        }
    }

    /// Class name always available without registration
    pub fn default_class(&self) -> &'static str {
        self.default_class
    }

    /// Register (or replace) the initializer for `class_name`
    pub fn register(&mut self, class_name: impl Into<String>, init: impl Fn(&mut T) + 'static) {
        self.classes.insert(class_name.into(), Box::new(init));
    }

    /// Whether `class_name` can be instantiated
    pub fn contains(&self, class_name: &str) -> bool {
        class_name == self.default_class || self.classes.contains_key(class_name)
    }

    /// Registered class names (the default class is not listed)
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Build a primitive of `class_name` with `make`, then run the class initializer
    pub fn instantiate(&self, class_name: &str, make: impl FnOnce() -> T) -> Result<T> {
        match self.classes.get(class_name) {
            Some(init) => {
                let mut value = make();
                init(&mut value);
                Ok(value)
            }
            None if class_name == self.default_class => Ok(make()),
            None => Err(TopologyError::UnknownClass(class_name.to_string())),
        }
    }
}

impl<T> fmt::Debug for ClassRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("default_class", &self.default_class)
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, DEFAULT_NODE_CLASS};

    #[test]
    fn test_default_class_always_known() {
        let registry: ClassRegistry<Node> = ClassRegistry::new(DEFAULT_NODE_CLASS);
        assert!(registry.contains(DEFAULT_NODE_CLASS));
        let node = registry.instantiate(DEFAULT_NODE_CLASS, Node::new).unwrap();
        assert_eq!(node.class_name(), DEFAULT_NODE_CLASS);
    }

    #[test]
    fn test_unknown_class() {
        let registry: ClassRegistry<Node> = ClassRegistry::new(DEFAULT_NODE_CLASS);
        assert_eq!(
            registry.instantiate("Image", Node::new).err(),
            Some(TopologyError::UnknownClass("Image".into()))
        );
    }

    #[test]
    fn test_registered_initializer_runs() {
        let mut registry: ClassRegistry<Node> = ClassRegistry::new(DEFAULT_NODE_CLASS);
        registry.register("Control", |n: &mut Node| n.set_serializable(false));
        let node = registry
            .instantiate("Control", || Node::with_class("Control"))
            .unwrap();
        assert!(!node.is_serializable());
        assert_eq!(registry.class_names().collect::<Vec<_>>(), vec!["Control"]);
    }
}
