//! Ordered, duplicate-free collections of configuration objects.

use std::collections::BTreeMap;

use snafu::Snafu;

use crate::object::{ConfigObject, ObjectKind};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("duplicate {kind} definition for key {key}"))]
    DuplicateKey { kind: ObjectKind, key: String },
}

/// An ordered, duplicate-free collection of configuration objects of one
/// kind, keyed and sorted by the object's natural key.
///
/// Two instances (old, new) exist per reconciliation cycle; the sorted order
/// is what lets the difference engine run a single linear merge-scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedSet<T: ConfigObject> {
    inner: BTreeMap<T::Key, T>,
}

impl<T: ConfigObject> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Inserts an object, failing if an object with the same key is already
    /// present.
    pub fn insert(&mut self, object: T) -> Result<(), Error> {
        let key = object.key();
        if self.inner.contains_key(&key) {
            return DuplicateKeySnafu {
                kind: T::KIND,
                key: format!("{key:?}"),
            }
            .fail();
        }
        self.inner.insert(key, object);
        Ok(())
    }

    /// Inserts an object, replacing any previous object with the same key.
    /// Used when expansion rebuilds a set from resolved objects.
    pub fn replace(&mut self, object: T) -> Option<T> {
        self.inner.insert(object.key(), object)
    }

    /// Removes the object with the given key. Removing an absent key is a
    /// no-op.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        self.inner.remove(key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.inner.get(key)
    }

    /// Mutable access to the object with the given key. The mutation must not
    /// change the object's key.
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.inner.get_mut(key)
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the objects in key order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.values()
    }

    /// Drains the set, yielding the objects in key order.
    pub fn drain(&mut self) -> impl Iterator<Item = T> {
        std::mem::take(&mut self.inner).into_values()
    }
}

impl<T: ConfigObject> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConfigObject> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::collections::btree_map::IntoValues<T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_values()
    }
}

impl<'a, T: ConfigObject> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_map::Values<'a, T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    fn command(name: &str) -> Command {
        Command {
            command_name: name.to_string(),
            command_line: Some("/bin/true".to_string()),
            ..Command::default()
        }
    }

    #[test]
    fn insert_rejects_duplicate_keys() {
        let mut set = OrderedSet::new();
        set.insert(command("check_ping")).expect("first insert");
        let err = set
            .insert(command("check_ping"))
            .expect_err("duplicate insert must fail");
        assert!(err.to_string().contains("check_ping"));
    }

    #[test]
    fn iteration_is_key_ordered() {
        let mut set = OrderedSet::new();
        set.insert(command("b")).expect("insert");
        set.insert(command("a")).expect("insert");
        set.insert(command("c")).expect("insert");
        let names: Vec<_> = set.iter().map(|c| c.command_name.clone()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut set = OrderedSet::new();
        set.insert(command("a")).expect("insert");
        assert!(set.remove(&"a".to_string()).is_some());
        assert!(set.remove(&"a".to_string()).is_none());
        assert!(set.is_empty());
    }
}
