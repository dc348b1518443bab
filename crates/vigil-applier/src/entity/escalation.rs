//! Live escalation entities.
//!
//! Like dependencies, escalations are immutable while live. The canonical
//! configuration object travels with the entity: its content is the
//! escalation's identity, and its uid picks the exact entry to unlink when
//! the same host carries several escalations.

use std::collections::BTreeSet;

use vigil_config::{escalation, host::HostState, service::ServiceState};

use super::NamedRef;

#[derive(Clone, Debug)]
pub struct HostEscalation {
    pub host: NamedRef,
    pub contacts: Vec<NamedRef>,
    pub contact_groups: Vec<NamedRef>,
    pub first_notification: u32,
    pub last_notification: u32,
    pub notification_interval: u32,
    pub escalation_period: Option<NamedRef>,
    pub escalation_options: BTreeSet<HostState>,
    /// The canonical configuration object this entity was built from, kept
    /// for duplicate detection on add and exact-entry matching on resolve
    /// and removal.
    pub config: escalation::HostEscalation,
}

impl HostEscalation {
    pub fn from_config(cfg: &escalation::HostEscalation) -> Self {
        Self {
            host: NamedRef::unbound(cfg.host_name()),
            contacts: cfg.contacts.iter().map(NamedRef::unbound).collect(),
            contact_groups: cfg.contact_groups.iter().map(NamedRef::unbound).collect(),
            first_notification: cfg.first_notification.unwrap_or(0),
            last_notification: cfg.last_notification.unwrap_or(0),
            notification_interval: cfg.notification_interval.unwrap_or(0),
            escalation_period: cfg.escalation_period.as_ref().map(NamedRef::unbound),
            escalation_options: cfg.escalation_options.clone(),
            config: cfg.clone(),
        }
    }

    pub fn uid(&self) -> u64 {
        self.config.uid
    }
}

#[derive(Clone, Debug)]
pub struct ServiceEscalation {
    pub host: NamedRef,
    pub service_description: String,
    pub contacts: Vec<NamedRef>,
    pub contact_groups: Vec<NamedRef>,
    pub first_notification: u32,
    pub last_notification: u32,
    pub notification_interval: u32,
    pub escalation_period: Option<NamedRef>,
    pub escalation_options: BTreeSet<ServiceState>,
    pub config: escalation::ServiceEscalation,
}

impl ServiceEscalation {
    pub fn from_config(cfg: &escalation::ServiceEscalation) -> Self {
        Self {
            host: NamedRef::unbound(cfg.host_name()),
            service_description: cfg.service_description.clone().unwrap_or_default(),
            contacts: cfg.contacts.iter().map(NamedRef::unbound).collect(),
            contact_groups: cfg.contact_groups.iter().map(NamedRef::unbound).collect(),
            first_notification: cfg.first_notification.unwrap_or(0),
            last_notification: cfg.last_notification.unwrap_or(0),
            notification_interval: cfg.notification_interval.unwrap_or(0),
            escalation_period: cfg.escalation_period.as_ref().map(NamedRef::unbound),
            escalation_options: cfg.escalation_options.clone(),
            config: cfg.clone(),
        }
    }

    pub fn uid(&self) -> u64 {
        self.config.uid
    }
}
