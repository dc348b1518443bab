//! Host and service escalation configuration objects.
//!
//! Escalations are content-ordered like dependencies, but two escalations can
//! be structurally distinguishable only by their notification-number ranges,
//! so each carries a process-lifetime-unique identifier assigned at
//! construction. The uid takes no part in equality or ordering; the live
//! multimap uses it to pick the exact entry to unlink on removal.

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
};

use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::{
    host::HostState,
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    service::ServiceState,
    template::Inherit,
};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> u64 {
    NEXT_UID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A notification escalation attached to hosts.
#[derive(Clone, Debug, Educe, Serialize, Deserialize)]
#[educe(PartialEq, Eq)]
pub struct HostEscalation {
    pub hosts: InheritableList,
    pub host_groups: InheritableList,
    pub contacts: InheritableList,
    pub contact_groups: InheritableList,
    pub first_notification: Option<u32>,
    pub last_notification: Option<u32>,
    pub notification_interval: Option<u32>,
    pub escalation_period: Option<String>,
    pub escalation_options: BTreeSet<HostState>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
    #[educe(PartialEq(ignore))]
    #[serde(skip, default = "next_uid")]
    pub uid: u64,
}

impl HostEscalation {
    /// The host this escalation is attached to, once expanded.
    pub fn host_name(&self) -> &str {
        self.hosts.iter().next().map_or("", String::as_str)
    }
}

impl Default for HostEscalation {
    fn default() -> Self {
        Self {
            hosts: InheritableList::default(),
            host_groups: InheritableList::default(),
            contacts: InheritableList::default(),
            contact_groups: InheritableList::default(),
            first_notification: None,
            last_notification: None,
            notification_interval: None,
            escalation_period: None,
            escalation_options: BTreeSet::new(),
            use_templates: Vec::new(),
            uid: next_uid(),
        }
    }
}

impl PartialOrd for HostEscalation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HostEscalation {
    fn cmp(&self, other: &Self) -> Ordering {
        // Content order only: the uid must never influence the diff.
        (
            &self.hosts,
            &self.host_groups,
            &self.contacts,
            &self.contact_groups,
            self.first_notification,
            self.last_notification,
            self.notification_interval,
            &self.escalation_period,
            &self.escalation_options,
            &self.use_templates,
        )
            .cmp(&(
                &other.hosts,
                &other.host_groups,
                &other.contacts,
                &other.contact_groups,
                other.first_notification,
                other.last_notification,
                other.notification_interval,
                &other.escalation_period,
                &other.escalation_options,
                &other.use_templates,
            ))
    }
}

impl ConfigObject for HostEscalation {
    type Key = Self;

    const KIND: ObjectKind = ObjectKind::HostEscalation;

    fn key(&self) -> Self::Key {
        self.clone()
    }
}

impl Inherit for HostEscalation {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        self.hosts.inherit(&parent.hosts);
        self.host_groups.inherit(&parent.host_groups);
        self.contacts.inherit(&parent.contacts);
        self.contact_groups.inherit(&parent.contact_groups);
        inherit_if_unset(&mut self.first_notification, &parent.first_notification);
        inherit_if_unset(&mut self.last_notification, &parent.last_notification);
        inherit_if_unset(&mut self.notification_interval, &parent.notification_interval);
        inherit_if_unset(&mut self.escalation_period, &parent.escalation_period);
        if self.escalation_options.is_empty() {
            self.escalation_options.clone_from(&parent.escalation_options);
        }
    }
}

/// A notification escalation attached to services.
#[derive(Clone, Debug, Educe, Serialize, Deserialize)]
#[educe(PartialEq, Eq)]
pub struct ServiceEscalation {
    pub hosts: InheritableList,
    pub host_groups: InheritableList,
    pub service_description: Option<String>,
    pub contacts: InheritableList,
    pub contact_groups: InheritableList,
    pub first_notification: Option<u32>,
    pub last_notification: Option<u32>,
    pub notification_interval: Option<u32>,
    pub escalation_period: Option<String>,
    pub escalation_options: BTreeSet<ServiceState>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
    #[educe(PartialEq(ignore))]
    #[serde(skip, default = "next_uid")]
    pub uid: u64,
}

impl ServiceEscalation {
    pub fn host_name(&self) -> &str {
        self.hosts.iter().next().map_or("", String::as_str)
    }
}

impl Default for ServiceEscalation {
    fn default() -> Self {
        Self {
            hosts: InheritableList::default(),
            host_groups: InheritableList::default(),
            service_description: None,
            contacts: InheritableList::default(),
            contact_groups: InheritableList::default(),
            first_notification: None,
            last_notification: None,
            notification_interval: None,
            escalation_period: None,
            escalation_options: BTreeSet::new(),
            use_templates: Vec::new(),
            uid: next_uid(),
        }
    }
}

impl PartialOrd for ServiceEscalation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceEscalation {
    fn cmp(&self, other: &Self) -> Ordering {
        (
            &self.hosts,
            &self.host_groups,
            &self.service_description,
            &self.contacts,
            &self.contact_groups,
            self.first_notification,
            self.last_notification,
            self.notification_interval,
            &self.escalation_period,
            &self.escalation_options,
            &self.use_templates,
        )
            .cmp(&(
                &other.hosts,
                &other.host_groups,
                &other.service_description,
                &other.contacts,
                &other.contact_groups,
                other.first_notification,
                other.last_notification,
                other.notification_interval,
                &other.escalation_period,
                &other.escalation_options,
                &other.use_templates,
            ))
    }
}

impl ConfigObject for ServiceEscalation {
    type Key = Self;

    const KIND: ObjectKind = ObjectKind::ServiceEscalation;

    fn key(&self) -> Self::Key {
        self.clone()
    }
}

impl Inherit for ServiceEscalation {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        self.hosts.inherit(&parent.hosts);
        self.host_groups.inherit(&parent.host_groups);
        inherit_if_unset(&mut self.service_description, &parent.service_description);
        self.contacts.inherit(&parent.contacts);
        self.contact_groups.inherit(&parent.contact_groups);
        inherit_if_unset(&mut self.first_notification, &parent.first_notification);
        inherit_if_unset(&mut self.last_notification, &parent.last_notification);
        inherit_if_unset(&mut self.notification_interval, &parent.notification_interval);
        inherit_if_unset(&mut self.escalation_period, &parent.escalation_period);
        if self.escalation_options.is_empty() {
            self.escalation_options.clone_from(&parent.escalation_options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_are_unique_and_ignored_by_equality() {
        let a = HostEscalation {
            hosts: InheritableList::defined(["web".to_string()]),
            ..HostEscalation::default()
        };
        let b = HostEscalation {
            hosts: InheritableList::defined(["web".to_string()]),
            ..HostEscalation::default()
        };
        assert_ne!(a.uid, b.uid);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }
}
