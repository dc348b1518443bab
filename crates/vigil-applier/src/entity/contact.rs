//! The live contact entity.

use std::collections::BTreeSet;

use vigil_config::{contact, host::HostState, service::ServiceState};

use super::{NamedRef, sync_opt_ref, sync_refs};

#[derive(Clone, Debug)]
pub struct Contact {
    pub name: String,
    pub alias: String,
    pub email: Option<String>,
    pub pager: Option<String>,
    pub host_notification_period: Option<NamedRef>,
    pub service_notification_period: Option<NamedRef>,
    pub host_notification_commands: Vec<NamedRef>,
    pub service_notification_commands: Vec<NamedRef>,
    pub host_notification_options: BTreeSet<HostState>,
    pub service_notification_options: BTreeSet<ServiceState>,
    pub host_notifications_enabled: bool,
    pub service_notifications_enabled: bool,
}

impl Contact {
    pub fn from_config(cfg: &contact::Contact) -> Self {
        let mut live = Self {
            name: cfg.contact_name.clone(),
            alias: String::new(),
            email: None,
            pager: None,
            host_notification_period: None,
            service_notification_period: None,
            host_notification_commands: Vec::new(),
            service_notification_commands: Vec::new(),
            host_notification_options: BTreeSet::new(),
            service_notification_options: BTreeSet::new(),
            host_notifications_enabled: true,
            service_notifications_enabled: true,
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &contact::Contact) {
        self.alias = cfg
            .alias
            .clone()
            .unwrap_or_else(|| cfg.contact_name.clone());
        self.email = cfg.email.clone();
        self.pager = cfg.pager.clone();
        sync_opt_ref(
            &mut self.host_notification_period,
            cfg.host_notification_period.as_ref(),
        );
        sync_opt_ref(
            &mut self.service_notification_period,
            cfg.service_notification_period.as_ref(),
        );
        sync_refs(
            &mut self.host_notification_commands,
            cfg.host_notification_commands.iter(),
        );
        sync_refs(
            &mut self.service_notification_commands,
            cfg.service_notification_commands.iter(),
        );
        self.host_notification_options =
            cfg.host_notification_options.clone().unwrap_or_default();
        self.service_notification_options =
            cfg.service_notification_options.clone().unwrap_or_default();
        self.host_notifications_enabled = cfg.host_notifications_enabled.unwrap_or(true);
        self.service_notifications_enabled = cfg.service_notifications_enabled.unwrap_or(true);
    }
}
