//! Live entity registries.
//!
//! Registries preserve insertion order so iteration (and the events derived
//! from it) stays deterministic across reloads. They are owned by a
//! [`Registries`] aggregate that is passed explicitly to the appliers; there
//! is no global table.

use std::{fmt::Debug, hash::Hash};

use indexmap::{Equivalent, IndexMap};
use snafu::Snafu;

use crate::entity;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("an entity with key {key:?} is already registered"))]
    AlreadyRegistered { key: String },
}

/// An insertion-ordered map of live entities with unique keys.
#[derive(Debug)]
pub struct Registry<K, E> {
    entries: IndexMap<K, E>,
}

impl<K, E> Registry<K, E>
where
    K: Hash + Eq + Debug,
{
    /// Registers a new entity. Fails if the key is already present.
    pub fn insert(&mut self, key: K, entity: E) -> Result<(), Error> {
        if self.entries.contains_key(&key) {
            return AlreadyRegisteredSnafu {
                key: format!("{key:?}"),
            }
            .fail();
        }
        self.entries.insert(key, entity);
        Ok(())
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&E>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut E>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Removes an entity if present. Removing an absent key is a no-op, so
    /// removal stays idempotent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<E>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.values_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K, E> Default for Registry<K, E> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

/// An insertion-ordered multimap for entities whose key is shared, such as
/// the dependencies and escalations attached to one host or service.
#[derive(Debug)]
pub struct MultiRegistry<K, E> {
    entries: IndexMap<K, Vec<E>>,
}

impl<K, E> MultiRegistry<K, E>
where
    K: Hash + Eq,
{
    pub fn insert(&mut self, key: K, entity: E) {
        self.entries.entry(key).or_default().push(entity);
    }

    pub fn get(&self, key: &K) -> &[E] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Vec<E>> {
        self.entries.get_mut(key)
    }

    /// Removes the first entry under `key` matching the predicate, dropping
    /// the bucket when it empties. Returns the removed entity, if any.
    pub fn remove_where(&mut self, key: &K, pred: impl FnMut(&E) -> bool) -> Option<E> {
        let bucket = self.entries.get_mut(key)?;
        let index = bucket.iter().position(pred)?;
        let removed = bucket.remove(index);
        if bucket.is_empty() {
            self.entries.shift_remove(key);
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.entries
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(move |entity| (key, entity)))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.values_mut().flatten()
    }
}

impl<K, E> Default for MultiRegistry<K, E> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

/// All live registries of a running instance.
#[derive(Debug, Default)]
pub struct Registries {
    pub commands: Registry<String, entity::Command>,
    pub connectors: Registry<String, entity::Connector>,
    pub time_periods: Registry<String, entity::TimePeriod>,
    pub contacts: Registry<String, entity::Contact>,
    pub contact_groups: Registry<String, entity::ContactGroup>,
    pub hosts: Registry<String, entity::Host>,
    pub host_groups: Registry<String, entity::HostGroup>,
    pub services: Registry<(String, String), entity::Service>,
    pub service_groups: Registry<String, entity::ServiceGroup>,
    /// Keyed by dependent host name.
    pub host_dependencies: MultiRegistry<String, entity::HostDependency>,
    /// Keyed by (dependent host, dependent service description).
    pub service_dependencies: MultiRegistry<(String, String), entity::ServiceDependency>,
    /// Keyed by host name.
    pub host_escalations: MultiRegistry<String, entity::HostEscalation>,
    /// Keyed by (host, service description).
    pub service_escalations: MultiRegistry<(String, String), entity::ServiceEscalation>,
}

#[cfg(test)]
mod tests {
    use vigil_config::InheritableList;

    use super::*;

    fn contact(name: &str) -> entity::Contact {
        entity::Contact::from_config(&vigil_config::contact::Contact {
            contact_name: name.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn insert_rejects_duplicate_keys() {
        let mut registry = Registry::default();
        registry
            .insert("admin".to_string(), contact("admin"))
            .expect("first insert");
        let err = registry
            .insert("admin".to_string(), contact("admin"))
            .expect_err("duplicate insert must fail");
        assert!(err.to_string().contains("admin"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = Registry::default();
        registry
            .insert("admin".to_string(), contact("admin"))
            .expect("insert");
        assert!(registry.remove(&"admin".to_string()).is_some());
        assert!(registry.remove(&"admin".to_string()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn multi_registry_removes_single_matching_entry() {
        let mut registry = MultiRegistry::default();
        let escalation = |uid| {
            entity::HostEscalation::from_config(&vigil_config::escalation::HostEscalation {
                hosts: InheritableList::defined(["web".to_string()]),
                uid,
                ..Default::default()
            })
        };
        registry.insert("web".to_string(), escalation(1));
        registry.insert("web".to_string(), escalation(2));

        let removed = registry.remove_where(&"web".to_string(), |e| e.uid() == 1);
        assert_eq!(removed.map(|e| e.uid()), Some(1));
        assert_eq!(registry.get(&"web".to_string()).len(), 1);

        registry.remove_where(&"web".to_string(), |e| e.uid() == 2);
        assert!(registry.is_empty());
    }
}
