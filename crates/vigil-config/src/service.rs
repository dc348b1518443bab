//! Service configuration objects.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    template::Inherit,
};

/// Service states used in option sets.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
    Pending,
}

/// A monitored service.
///
/// Before expansion a service may name several hosts and host groups; the
/// expansion pass materializes one instance per resolved host, so canonical
/// services carry exactly one host. The key is the (host name, service
/// description) pair, using the first named host before expansion.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Service {
    pub hosts: InheritableList,
    pub service_description: String,
    pub host_groups: InheritableList,
    pub service_groups: InheritableList,
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
    pub notification_options: Option<BTreeSet<ServiceState>>,
    pub notifications_enabled: Option<bool>,
    pub active_checks_enabled: Option<bool>,
    pub passive_checks_enabled: Option<bool>,
    pub is_volatile: Option<bool>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl Service {
    /// The host this service is attached to. Only meaningful once expansion
    /// has reduced `hosts` to a single entry.
    pub fn host_name(&self) -> &str {
        self.hosts
            .iter()
            .next()
            .map_or("", String::as_str)
    }
}

impl ConfigObject for Service {
    type Key = (String, String);

    const KIND: ObjectKind = ObjectKind::Service;

    fn key(&self) -> Self::Key {
        (
            self.host_name().to_string(),
            self.service_description.clone(),
        )
    }
}

impl Inherit for Service {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        self.hosts.inherit(&parent.hosts);
        self.host_groups.inherit(&parent.host_groups);
        self.service_groups.inherit(&parent.service_groups);
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
        inherit_if_unset(&mut self.is_volatile, &parent.is_volatile);
    }
}
