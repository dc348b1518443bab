//! Common contracts shared by every configuration object kind.

use std::{collections::BTreeSet, fmt::Debug};

use serde::{Deserialize, Serialize};

/// The closed set of entity kinds the reconciliation pipeline knows about.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Command,
    Connector,
    Contact,
    ContactGroup,
    TimePeriod,
    Host,
    HostGroup,
    Service,
    ServiceGroup,
    HostDependency,
    ServiceDependency,
    HostEscalation,
    ServiceEscalation,
}

/// A parsed, pre-expansion description of one entity.
///
/// The key identifies the entity within its kind and is stable across reload
/// cycles. The total order of the object must use the key as its primary
/// ordering field; full equality is structural equality of all fields. The
/// difference engine relies on both.
pub trait ConfigObject: Clone + Eq + Ord {
    type Key: Ord + Eq + Clone + Debug;

    const KIND: ObjectKind;

    fn key(&self) -> Self::Key;
}

/// Inherits a scalar property from a parent template if the child has not
/// defined it itself.
pub fn inherit_if_unset<T: Clone>(child: &mut Option<T>, parent: &Option<T>) {
    if child.is_none() {
        child.clone_from(parent);
    }
}

/// A set-valued object property that participates in template inheritance.
///
/// The `additive` flag corresponds to the `+value,...` syntax: the child's own
/// values are combined with the values of the first parent that defines the
/// property. A non-additive child definition overrides parents entirely.
///
/// Equality and ordering only consider the values; the inheritance flags are
/// resolution bookkeeping and must not influence the difference engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InheritableList<M: Ord + Clone + Debug = String> {
    values: BTreeSet<M>,
    additive: bool,
    defined: bool,
}

impl<M: Ord + Clone + Debug> InheritableList<M> {
    /// An explicit, overriding definition.
    pub fn defined(values: impl IntoIterator<Item = M>) -> Self {
        Self {
            values: values.into_iter().collect(),
            additive: false,
            defined: true,
        }
    }

    /// An explicit, additive (`+`) definition.
    pub fn additive(values: impl IntoIterator<Item = M>) -> Self {
        Self {
            values: values.into_iter().collect(),
            additive: true,
            defined: true,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn contains(&self, value: &M) -> bool {
        self.values.contains(value)
    }

    pub fn values(&self) -> &BTreeSet<M> {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.values.iter()
    }

    pub fn insert(&mut self, value: M) {
        self.values.insert(value);
        self.defined = true;
    }

    /// Replaces the values wholesale, marking the property as an overriding
    /// definition. Used when expansion rewrites a property into its flattened
    /// form.
    pub fn replace(&mut self, values: impl IntoIterator<Item = M>) {
        self.values = values.into_iter().collect();
        self.additive = false;
        self.defined = true;
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.additive = false;
        self.defined = false;
    }

    /// Merges a parent template's definition into this property.
    ///
    /// Called once per parent, in declared order. The first parent that
    /// defines the property settles it: afterwards the property counts as an
    /// overriding definition and later parents are ignored.
    pub fn inherit(&mut self, parent: &Self) {
        if !parent.defined {
            return;
        }
        if !self.defined {
            self.values.clone_from(&parent.values);
        } else if self.additive {
            self.values.extend(parent.values.iter().cloned());
        } else {
            return;
        }
        self.defined = true;
        self.additive = false;
    }
}

impl<M: Ord + Clone + Debug> PartialEq for InheritableList<M> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<M: Ord + Clone + Debug> Eq for InheritableList<M> {}

impl<M: Ord + Clone + Debug> PartialOrd for InheritableList<M> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Ord + Clone + Debug> Ord for InheritableList<M> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.values.cmp(&other.values)
    }
}

impl<M: Ord + Clone + Debug> FromIterator<M> for InheritableList<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self::defined(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> InheritableList {
        InheritableList::defined(values.iter().map(ToString::to_string))
    }

    #[test]
    fn undefined_property_takes_first_defining_parent() {
        let mut child = InheritableList::default();
        child.inherit(&InheritableList::default());
        assert!(!child.is_defined());

        child.inherit(&list(&["b"]));
        child.inherit(&list(&["c"]));
        assert_eq!(child, list(&["b"]));
    }

    #[test]
    fn additive_child_combines_with_first_defining_parent_only() {
        let mut child = InheritableList::additive(["a".to_string()]);
        child.inherit(&list(&["b"]));
        child.inherit(&list(&["c"]));
        assert_eq!(child, list(&["a", "b"]));
    }

    #[test]
    fn additive_child_skips_parents_that_leave_the_property_undefined() {
        let mut child = InheritableList::additive(["a".to_string()]);
        child.inherit(&InheritableList::default());
        child.inherit(&list(&["c"]));
        assert_eq!(child, list(&["a", "c"]));
    }

    #[test]
    fn overriding_child_ignores_parents() {
        let mut child = list(&["a"]);
        child.inherit(&list(&["b"]));
        assert_eq!(child, list(&["a"]));
    }

    #[test]
    fn equality_ignores_inheritance_flags() {
        assert_eq!(
            InheritableList::additive(["a".to_string()]),
            list(&["a"]),
        );
    }
}
