//! Contact configuration objects.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    host::HostState,
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    service::ServiceState,
    template::Inherit,
};

/// A notification recipient. Key: the contact name.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Contact {
    pub contact_name: String,
    pub alias: Option<String>,
    pub email: Option<String>,
    pub pager: Option<String>,
    /// Names of contact groups this contact declares membership of.
    pub contact_groups: InheritableList,
    pub host_notification_period: Option<String>,
    pub service_notification_period: Option<String>,
    pub host_notification_commands: InheritableList,
    pub service_notification_commands: InheritableList,
    pub host_notification_options: Option<BTreeSet<HostState>>,
    pub service_notification_options: Option<BTreeSet<ServiceState>>,
    pub host_notifications_enabled: Option<bool>,
    pub service_notifications_enabled: Option<bool>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl ConfigObject for Contact {
    type Key = String;

    const KIND: ObjectKind = ObjectKind::Contact;

    fn key(&self) -> Self::Key {
        self.contact_name.clone()
    }
}

impl Inherit for Contact {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        inherit_if_unset(&mut self.alias, &parent.alias);
        inherit_if_unset(&mut self.email, &parent.email);
        inherit_if_unset(&mut self.pager, &parent.pager);
        self.contact_groups.inherit(&parent.contact_groups);
        inherit_if_unset(
            &mut self.host_notification_period,
            &parent.host_notification_period,
        );
        inherit_if_unset(
            &mut self.service_notification_period,
            &parent.service_notification_period,
        );
        self.host_notification_commands
            .inherit(&parent.host_notification_commands);
        self.service_notification_commands
            .inherit(&parent.service_notification_commands);
        inherit_if_unset(
            &mut self.host_notification_options,
            &parent.host_notification_options,
        );
        inherit_if_unset(
            &mut self.service_notification_options,
            &parent.service_notification_options,
        );
        inherit_if_unset(
            &mut self.host_notifications_enabled,
            &parent.host_notifications_enabled,
        );
        inherit_if_unset(
            &mut self.service_notifications_enabled,
            &parent.service_notifications_enabled,
        );
    }
}
