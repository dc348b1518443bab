//! Template ("use") inheritance resolution.

use std::collections::{BTreeMap, BTreeSet};

use snafu::Snafu;
use tracing::debug;

use crate::{
    object::{ConfigObject, ObjectKind},
    set::OrderedSet,
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{kind} references unknown template {template:?}"))]
    UnknownTemplate { kind: ObjectKind, template: String },

    #[snafu(display("{kind} template {template:?} is part of an inheritance cycle"))]
    TemplateCycle { kind: ObjectKind, template: String },

    #[snafu(display("{kind} uses template {template:?} which failed to resolve"))]
    UnresolvedTemplate { kind: ObjectKind, template: String },
}

/// A configuration object that supports `use` template inheritance.
pub trait Inherit {
    /// Parent template names, in declared order.
    fn template_names(&self) -> &[String];

    /// Merges one fully resolved parent into this object.
    ///
    /// Called once per parent in declared order. Undefined scalar properties
    /// take the first parent that defines them; additive set-valued
    /// properties combine with the first defining parent only.
    fn merge(&mut self, parent: &Self);
}

/// Resolves every template in `templates` into its flattened form.
///
/// Templates may themselves use other templates; resolution recurses and
/// memoizes. A template that is part of an inheritance cycle (or references
/// an unknown parent) is a hard error for that template and everything built
/// on it; unrelated templates still resolve.
fn resolve_template_map<T>(
    kind: ObjectKind,
    templates: &BTreeMap<String, T>,
) -> (BTreeMap<String, T>, Vec<Error>)
where
    T: Inherit + Clone,
{
    let mut resolved: BTreeMap<String, T> = BTreeMap::new();
    let mut errors = Vec::new();
    for name in templates.keys() {
        let mut in_progress: BTreeSet<String> = BTreeSet::new();
        if let Err(err) = resolve_one(kind, name, templates, &mut resolved, &mut in_progress) {
            errors.push(err);
        }
    }
    (resolved, errors)
}

fn resolve_one<'a, T>(
    kind: ObjectKind,
    name: &'a str,
    templates: &'a BTreeMap<String, T>,
    resolved: &mut BTreeMap<String, T>,
    in_progress: &mut BTreeSet<String>,
) -> Result<(), Error>
where
    T: Inherit + Clone,
{
    if resolved.contains_key(name) {
        return Ok(());
    }
    if !in_progress.insert(name.to_string()) {
        return TemplateCycleSnafu {
            kind,
            template: name.to_string(),
        }
        .fail();
    }

    let template = templates.get(name).ok_or_else(|| {
        Error::UnknownTemplate {
            kind,
            template: name.to_string(),
        }
    })?;
    let mut flattened = template.clone();
    for parent_name in template.template_names().to_vec() {
        resolve_one(kind, &parent_name, templates, resolved, in_progress)?;
        // Resolved just above, or on an earlier iteration.
        if let Some(parent) = resolved.get(&parent_name) {
            flattened.merge(parent);
        }
    }

    in_progress.remove(name);
    resolved.insert(name.to_string(), flattened);
    Ok(())
}

/// Resolves template inheritance for every object of one kind.
///
/// Objects whose resolution fails (unknown parent, inheritance cycle) are
/// dropped from the set and reported; siblings are still resolved.
pub fn resolve_objects<T>(
    objects: &mut OrderedSet<T>,
    templates: &BTreeMap<String, T>,
) -> Vec<Error>
where
    T: ConfigObject + Inherit,
{
    let (resolved_templates, mut errors) = resolve_template_map(T::KIND, templates);

    let drained: Vec<T> = objects.drain().collect();
    'next_object: for mut object in drained {
        for parent_name in object.template_names().to_vec() {
            let Some(parent) = resolved_templates.get(&parent_name) else {
                let error = if templates.contains_key(&parent_name) {
                    Error::UnresolvedTemplate {
                        kind: T::KIND,
                        template: parent_name,
                    }
                } else {
                    Error::UnknownTemplate {
                        kind: T::KIND,
                        template: parent_name,
                    }
                };
                errors.push(error);
                continue 'next_object;
            };
            object.merge(parent);
        }
        objects.replace(object);
    }

    if !errors.is_empty() {
        debug!(
            kind = %T::KIND,
            errors = errors.len(),
            "template resolution dropped objects"
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::Host,
        object::InheritableList,
    };

    fn template(name: &str, contacts: &[&str], parents: &[&str]) -> (String, Host) {
        // An empty slice means "no contacts directive", not an explicitly
        // empty list; a defined empty list would mask parent templates.
        let contacts = if contacts.is_empty() {
            InheritableList::default()
        } else {
            InheritableList::defined(contacts.iter().map(ToString::to_string))
        };
        (
            name.to_string(),
            Host {
                contacts,
                use_templates: parents.iter().map(ToString::to_string).collect(),
                ..Host::default()
            },
        )
    }

    #[test]
    fn scalar_comes_from_first_defining_parent() {
        let templates: BTreeMap<String, Host> = [
            (
                "first".to_string(),
                Host {
                    check_interval: None,
                    retry_interval: Some(2),
                    ..Host::default()
                },
            ),
            (
                "second".to_string(),
                Host {
                    check_interval: Some(10),
                    retry_interval: Some(7),
                    ..Host::default()
                },
            ),
        ]
        .into();

        let mut objects = OrderedSet::new();
        objects
            .insert(Host {
                host_name: "web".to_string(),
                use_templates: vec!["first".to_string(), "second".to_string()],
                ..Host::default()
            })
            .expect("unique key");

        let errors = resolve_objects(&mut objects, &templates);
        assert!(errors.is_empty());
        let web = objects.get(&"web".to_string()).expect("resolved host");
        // check_interval is undefined in "first", so "second" supplies it.
        assert_eq!(web.check_interval, Some(10));
        // retry_interval is defined in "first"; "second" never contributes.
        assert_eq!(web.retry_interval, Some(2));
    }

    #[test]
    fn additive_values_come_from_first_defining_parent_only() {
        let templates: BTreeMap<String, Host> = [
            template("first", &["b"], &[]),
            template("second", &["c"], &[]),
        ]
        .into();

        let mut objects = OrderedSet::new();
        objects
            .insert(Host {
                host_name: "web".to_string(),
                contacts: InheritableList::additive(["a".to_string()]),
                use_templates: vec!["first".to_string(), "second".to_string()],
                ..Host::default()
            })
            .expect("unique key");

        let errors = resolve_objects(&mut objects, &templates);
        assert!(errors.is_empty());
        let web = objects.get(&"web".to_string()).expect("resolved host");
        let contacts: Vec<_> = web.contacts.iter().cloned().collect();
        assert_eq!(contacts, ["a", "b"]);
    }

    #[test]
    fn templates_resolve_recursively() {
        let templates: BTreeMap<String, Host> = [
            template("leaf", &["deep"], &[]),
            template("mid", &[], &["leaf"]),
        ]
        .into();

        let mut objects = OrderedSet::new();
        objects
            .insert(Host {
                host_name: "web".to_string(),
                use_templates: vec!["mid".to_string()],
                ..Host::default()
            })
            .expect("unique key");

        let errors = resolve_objects(&mut objects, &templates);
        assert!(errors.is_empty());
        let web = objects.get(&"web".to_string()).expect("resolved host");
        assert!(web.contacts.contains(&"deep".to_string()));
    }

    #[test]
    fn inheritance_cycle_terminates_with_an_error() {
        let templates: BTreeMap<String, Host> = [
            template("a", &[], &["b"]),
            template("b", &[], &["a"]),
        ]
        .into();

        let mut objects = OrderedSet::new();
        objects
            .insert(Host {
                host_name: "web".to_string(),
                use_templates: vec!["a".to_string()],
                ..Host::default()
            })
            .expect("unique key");

        let errors = resolve_objects(&mut objects, &templates);
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, Error::TemplateCycle { .. }))
        );
        // The object using the broken template is dropped.
        assert!(objects.is_empty());
    }

    #[test]
    fn unknown_template_drops_the_object_but_not_siblings() {
        let templates = BTreeMap::new();

        let mut objects = OrderedSet::new();
        objects
            .insert(Host {
                host_name: "broken".to_string(),
                use_templates: vec!["missing".to_string()],
                ..Host::default()
            })
            .expect("unique key");
        objects
            .insert(Host {
                host_name: "fine".to_string(),
                ..Host::default()
            })
            .expect("unique key");

        let errors = resolve_objects(&mut objects, &templates);
        assert_eq!(errors.len(), 1);
        assert!(objects.get(&"fine".to_string()).is_some());
        assert!(objects.get(&"broken".to_string()).is_none());
    }
}
