//! The live service entity.

use std::collections::BTreeSet;

use vigil_config::service::{self, ServiceState};

use super::{NamedRef, sync_opt_ref, sync_refs};
use crate::retention::{Comment, Downtime};

const DEFAULT_CHECK_INTERVAL: u32 = 5;
const DEFAULT_RETRY_INTERVAL: u32 = 1;
const DEFAULT_MAX_CHECK_ATTEMPTS: u32 = 3;
const DEFAULT_NOTIFICATION_INTERVAL: u32 = 30;

#[derive(Clone, Debug)]
pub struct Service {
    pub host: NamedRef,
    pub description: String,
    pub contacts: Vec<NamedRef>,
    pub contact_groups: Vec<NamedRef>,
    pub check_command: Option<NamedRef>,
    pub check_period: Option<NamedRef>,
    pub event_handler: Option<NamedRef>,
    pub notification_period: Option<NamedRef>,
    pub check_interval: u32,
    pub retry_interval: u32,
    pub max_check_attempts: u32,
    pub notification_interval: u32,
    pub first_notification_delay: u32,
    pub notification_options: BTreeSet<ServiceState>,
    pub notifications_enabled: bool,
    pub active_checks_enabled: bool,
    pub passive_checks_enabled: bool,
    pub is_volatile: bool,
    /// Uids of the escalations attached to this service.
    pub escalations: Vec<u64>,

    // Runtime state, preserved across configuration modification.
    pub acknowledged: bool,
    pub notification_number: u32,
    pub comments: Vec<Comment>,
    pub downtimes: Vec<Downtime>,
}

impl Service {
    pub fn from_config(cfg: &service::Service) -> Self {
        let mut live = Self {
            host: NamedRef::unbound(cfg.host_name()),
            description: cfg.service_description.clone(),
            contacts: Vec::new(),
            contact_groups: Vec::new(),
            check_command: None,
            check_period: None,
            event_handler: None,
            notification_period: None,
            check_interval: 0,
            retry_interval: 0,
            max_check_attempts: 0,
            notification_interval: 0,
            first_notification_delay: 0,
            notification_options: BTreeSet::new(),
            notifications_enabled: true,
            active_checks_enabled: true,
            passive_checks_enabled: true,
            is_volatile: false,
            escalations: Vec::new(),
            acknowledged: false,
            notification_number: 0,
            comments: Vec::new(),
            downtimes: Vec::new(),
        };
        live.update_from(cfg);
        live
    }

    /// Overwrites configuration-derived fields; runtime state and linked
    /// escalations survive. The key fields (host, description) never change
    /// through here since a changed key diffs as delete plus add.
    pub fn update_from(&mut self, cfg: &service::Service) {
        sync_refs(&mut self.contacts, cfg.contacts.iter());
        sync_refs(&mut self.contact_groups, cfg.contact_groups.iter());
        sync_opt_ref(&mut self.check_command, cfg.check_command.as_ref());
        sync_opt_ref(&mut self.check_period, cfg.check_period.as_ref());
        sync_opt_ref(&mut self.event_handler, cfg.event_handler.as_ref());
        sync_opt_ref(&mut self.notification_period, cfg.notification_period.as_ref());
        self.check_interval = cfg.check_interval.unwrap_or(DEFAULT_CHECK_INTERVAL);
        self.retry_interval = cfg.retry_interval.unwrap_or(DEFAULT_RETRY_INTERVAL);
        self.max_check_attempts = cfg.max_check_attempts.unwrap_or(DEFAULT_MAX_CHECK_ATTEMPTS);
        self.notification_interval = cfg
            .notification_interval
            .unwrap_or(DEFAULT_NOTIFICATION_INTERVAL);
        self.first_notification_delay = cfg.first_notification_delay.unwrap_or(0);
        self.notification_options = cfg.notification_options.clone().unwrap_or_default();
        self.notifications_enabled = cfg.notifications_enabled.unwrap_or(true);
        self.active_checks_enabled = cfg.active_checks_enabled.unwrap_or(true);
        self.passive_checks_enabled = cfg.passive_checks_enabled.unwrap_or(true);
        self.is_volatile = cfg.is_volatile.unwrap_or(false);
    }

    pub fn key(&self) -> (String, String) {
        (self.host.name().to_string(), self.description.clone())
    }
}
