//! The live host entity.

use std::collections::BTreeSet;

use vigil_config::host::{self, HostState};

use super::{NamedRef, sync_opt_ref, sync_refs};
use crate::retention::{Comment, Downtime};

/// Default check cadence for hosts whose configuration leaves it unset after
/// template resolution.
const DEFAULT_CHECK_INTERVAL: u32 = 5;
const DEFAULT_RETRY_INTERVAL: u32 = 1;
const DEFAULT_MAX_CHECK_ATTEMPTS: u32 = 3;
const DEFAULT_NOTIFICATION_INTERVAL: u32 = 30;

#[derive(Clone, Debug)]
pub struct Host {
    pub name: String,
    pub alias: String,
    pub address: String,
    pub parents: Vec<NamedRef>,
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
    pub notification_options: BTreeSet<HostState>,
    pub notifications_enabled: bool,
    pub active_checks_enabled: bool,
    pub passive_checks_enabled: bool,
    /// Uids of the escalations attached to this host, linked by the
    /// resolution pass and unlinked by escalation removal.
    pub escalations: Vec<u64>,

    // Runtime state: survives configuration modification and is seeded from
    // retention data on restart.
    pub acknowledged: bool,
    pub notification_number: u32,
    pub comments: Vec<Comment>,
    pub downtimes: Vec<Downtime>,
}

impl Host {
    pub fn from_config(cfg: &host::Host) -> Self {
        let mut live = Self {
            name: cfg.host_name.clone(),
            alias: String::new(),
            address: String::new(),
            parents: Vec::new(),
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
            escalations: Vec::new(),
            acknowledged: false,
            notification_number: 0,
            comments: Vec::new(),
            downtimes: Vec::new(),
        };
        live.update_from(cfg);
        live
    }

    /// Overwrites the configuration-derived fields, leaving runtime state
    /// (acknowledgement, notification counters, comments, downtimes, linked
    /// escalations) untouched.
    pub fn update_from(&mut self, cfg: &host::Host) {
        self.alias = cfg.alias.clone().unwrap_or_else(|| cfg.host_name.clone());
        self.address = cfg.address.clone().unwrap_or_default();
        sync_refs(&mut self.parents, cfg.parents.iter());
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
    }
}
