//! Live entities: the long-lived, mutable runtime representations held in
//! the live registries.
//!
//! Unlike configuration objects, live entities carry runtime-only state and
//! hold their cross-references as [`NamedRef`]s: the referenced key plus a
//! bound marker set by the resolution pass. Consumers must treat an unbound
//! reference as "not usable" and must not act on it.

pub mod command;
pub mod contact;
pub mod dependency;
pub mod escalation;
pub mod group;
pub mod host;
pub mod service;
pub mod timeperiod;

pub use command::{Command, Connector};
pub use contact::Contact;
pub use dependency::{HostDependency, ServiceDependency};
pub use escalation::{HostEscalation, ServiceEscalation};
pub use group::{ContactGroup, HostGroup, ServiceGroup, ServiceMemberRef};
pub use host::Host;
pub use service::Service;
pub use timeperiod::TimePeriod;

/// A cross-reference to another live entity, stored as the referenced key
/// until the resolution pass binds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedRef {
    name: String,
    bound: bool,
}

impl NamedRef {
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn bind(&mut self) {
        self.bound = true;
    }

    pub fn unbind(&mut self) {
        self.bound = false;
    }
}

/// Replaces a reference list with fresh unbound references when the
/// referenced name set changed; keeps already-bound references otherwise.
pub(crate) fn sync_refs<'a>(
    refs: &mut Vec<NamedRef>,
    names: impl Iterator<Item = &'a String>,
) {
    let names: Vec<&String> = names.collect();
    let unchanged = refs.len() == names.len()
        && refs.iter().zip(&names).all(|(r, n)| r.name() == n.as_str());
    if !unchanged {
        *refs = names.into_iter().map(NamedRef::unbound).collect();
    }
}

/// Same for an optional scalar reference.
pub(crate) fn sync_opt_ref(slot: &mut Option<NamedRef>, name: Option<&String>) {
    match (slot.as_ref(), name) {
        (Some(current), Some(new)) if current.name() == new => {}
        (None, None) => {}
        _ => *slot = name.map(NamedRef::unbound),
    }
}
