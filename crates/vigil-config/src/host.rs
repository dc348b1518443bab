//! Host configuration objects.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    template::Inherit,
};

/// Host states used in option sets (notification options, dependency failure
/// criteria, escalation criteria).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum HostState {
    Up,
    Down,
    Unreachable,
    Pending,
}

/// A monitored host. Key: the host name.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Host {
    pub host_name: String,
    pub alias: Option<String>,
    pub address: Option<String>,
    /// Names of hosts this host is topologically behind.
    pub parents: InheritableList,
    /// Names of host groups this host declares membership of.
    pub host_groups: InheritableList,
    pub contacts: InheritableList,
    pub contact_groups: InheritableList,
    pub check_command: Option<String>,
    pub check_period: Option<String>,
    pub check_interval: Option<u32>,
    pub retry_interval: Option<u32>,
    pub max_check_attempts: Option<u32>,
    pub event_handler: Option<String>,
    pub notification_period: Option<String>,
    pub notification_interval: Option<u32>,
    pub first_notification_delay: Option<u32>,
    pub notification_options: Option<BTreeSet<HostState>>,
    pub notifications_enabled: Option<bool>,
    pub active_checks_enabled: Option<bool>,
    pub passive_checks_enabled: Option<bool>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl ConfigObject for Host {
    type Key = String;

    const KIND: ObjectKind = ObjectKind::Host;

    fn key(&self) -> Self::Key {
        self.host_name.clone()
    }
}

impl Inherit for Host {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        inherit_if_unset(&mut self.alias, &parent.alias);
        inherit_if_unset(&mut self.address, &parent.address);
        self.parents.inherit(&parent.parents);
        self.host_groups.inherit(&parent.host_groups);
        self.contacts.inherit(&parent.contacts);
        self.contact_groups.inherit(&parent.contact_groups);
        inherit_if_unset(&mut self.check_command, &parent.check_command);
        inherit_if_unset(&mut self.check_period, &parent.check_period);
        inherit_if_unset(&mut self.check_interval, &parent.check_interval);
        inherit_if_unset(&mut self.retry_interval, &parent.retry_interval);
        inherit_if_unset(&mut self.max_check_attempts, &parent.max_check_attempts);
        inherit_if_unset(&mut self.event_handler, &parent.event_handler);
        inherit_if_unset(&mut self.notification_period, &parent.notification_period);
        inherit_if_unset(&mut self.notification_interval, &parent.notification_interval);
        inherit_if_unset(
            &mut self.first_notification_delay,
            &parent.first_notification_delay,
        );
        inherit_if_unset(&mut self.notification_options, &parent.notification_options);
        inherit_if_unset(&mut self.notifications_enabled, &parent.notifications_enabled);
        inherit_if_unset(
            &mut self.active_checks_enabled,
            &parent.active_checks_enabled,
        );
        inherit_if_unset(
            &mut self.passive_checks_enabled,
            &parent.passive_checks_enabled,
        );
    }
}
