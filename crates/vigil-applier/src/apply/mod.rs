//! Appliers: translate configuration differences into live table mutations.
//!
//! One applier per object kind. Each knows how to add, modify and remove its
//! live entity, and how to resolve the entity's cross-references once all
//! kinds have been applied. Appliers never look at objects of another kind
//! except through the registries, so the orchestrator is free to run them in
//! dependency order.

use snafu::Snafu;
use tracing::warn;
use vigil_config::{ConfigObject, ObjectKind};

use crate::{
    entity::NamedRef,
    event::{Event, EventKind, EventSink},
    registry::Registries,
};

pub mod command;
pub mod contact;
pub mod dependency;
pub mod escalation;
pub mod group;
pub mod host;
pub mod service;
pub mod state;
pub mod timeperiod;

pub use state::{ApplyReport, Phase, StateApplier};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{kind} {key:?} already exists"))]
    AlreadyExists { kind: ObjectKind, key: String },

    #[snafu(display("{kind} {key:?} not found"))]
    NotFound { kind: ObjectKind, key: String },

    /// Content-keyed kinds are never classified as modified by the
    /// difference engine; reaching this is a caller bug.
    #[snafu(display("{kind} objects cannot be modified in place"))]
    UnsupportedModification { kind: ObjectKind },
}

/// Everything an applier mutation needs: the live tables and the event sink.
pub struct ApplyContext<'a> {
    pub registries: &'a mut Registries,
    pub sink: &'a dyn EventSink,
}

impl ApplyContext<'_> {
    pub(crate) fn emit(&self, kind: EventKind, object: ObjectKind, key: impl Into<String>) {
        self.sink.emit(Event::new(kind, object, key));
    }
}

/// Per-kind application logic.
pub trait Applier {
    type Object: ConfigObject;

    /// Inserts a new live entity. Fails if an entity with the same key is
    /// already registered.
    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error>;

    /// Updates an existing live entity in place, preserving its runtime
    /// state. Fails if the entity is missing, or if the kind does not
    /// support in-place modification.
    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error>;

    /// Removes a live entity and detaches references other entities hold to
    /// it. Removing an already-absent entity is a no-op.
    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error>;

    /// Binds the entity's cross-references against the live tables. Returns
    /// the number of dangling references found (logged as warnings); a
    /// missing entity itself is a hard error.
    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error>;
}

/// Display form of a (host, service) key.
pub(crate) fn pair_key(key: &(String, String)) -> String {
    format!("{}/{}", key.0, key.1)
}

/// Binds or unbinds references against precomputed existence checks,
/// returning the dangling count. `checks` is produced by the caller before
/// taking the mutable borrow on the owning entity.
pub(crate) fn bind_checked(
    refs: &mut [NamedRef],
    checks: &[bool],
    object: ObjectKind,
    key: &str,
    target: ObjectKind,
) -> u32 {
    let mut dangling = 0;
    for (reference, exists) in refs.iter_mut().zip(checks) {
        if *exists {
            reference.bind();
        } else {
            reference.unbind();
            warn!(
                object = %object,
                key = %key,
                target = %target,
                reference = %reference.name(),
                "dangling reference"
            );
            dangling += 1;
        }
    }
    dangling
}

/// Same for an optional scalar reference.
pub(crate) fn bind_opt_checked(
    slot: &mut Option<NamedRef>,
    exists: bool,
    object: ObjectKind,
    key: &str,
    target: ObjectKind,
) -> u32 {
    match slot {
        Some(reference) => bind_checked(std::slice::from_mut(reference), &[exists], object, key, target),
        None => 0,
    }
}

/// Rebuilds a group member list from the configured names, emitting one
/// unlink event per previous member and one link event per new member. A
/// membership whose name sequence is unchanged emits nothing.
///
/// Takes the sink rather than the whole context so callers can rebuild while
/// holding a mutable borrow into the registries.
pub(crate) fn rebuild_members<'a>(
    sink: &dyn EventSink,
    object: ObjectKind,
    group: &str,
    members: &mut Vec<NamedRef>,
    names: impl Iterator<Item = &'a String>,
) {
    let names: Vec<&String> = names.collect();
    let unchanged = members.len() == names.len()
        && members
            .iter()
            .zip(&names)
            .all(|(member, name)| member.name() == name.as_str());
    if unchanged {
        return;
    }
    for member in &*members {
        sink.emit(Event::member(
            EventKind::MemberUnlinked,
            object,
            group,
            member.name(),
        ));
    }
    *members = names
        .into_iter()
        .map(|name| {
            sink.emit(Event::member(EventKind::MemberLinked, object, group, name.as_str()));
            NamedRef::unbound(name)
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::event::RecordingSink;

    #[rstest]
    #[case::grow(&["c1"], &["c1", "c2"], 3)]
    #[case::shrink(&["c1", "c2"], &["c1"], 3)]
    #[case::replace(&["c1"], &["c2"], 2)]
    #[case::unchanged(&["c1", "c2"], &["c1", "c2"], 0)]
    fn member_rebuild_emits_one_unlink_per_old_and_one_link_per_new(
        #[case] old: &[&str],
        #[case] new: &[&str],
        #[case] expected_events: usize,
    ) {
        let sink = RecordingSink::default();
        let mut members: Vec<NamedRef> = old.iter().map(|n| NamedRef::unbound(*n)).collect();
        let names: Vec<String> = new.iter().map(ToString::to_string).collect();

        rebuild_members(
            &sink,
            ObjectKind::ContactGroup,
            "cg",
            &mut members,
            names.iter(),
        );

        assert_eq!(sink.events().len(), expected_events);
        let rebuilt: Vec<&str> = members.iter().map(NamedRef::name).collect();
        assert_eq!(rebuilt, new);
    }
}
