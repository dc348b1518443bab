//! Live group entities.
//!
//! Group members are stored as unbound references and bound by the
//! resolution pass; membership rebuilds on modification are driven by the
//! group appliers so member link events can be emitted per change.

use vigil_config::group;

use super::{NamedRef, sync_refs};

#[derive(Clone, Debug)]
pub struct HostGroup {
    pub name: String,
    pub alias: String,
    pub members: Vec<NamedRef>,
}

impl HostGroup {
    pub fn from_config(cfg: &group::HostGroup) -> Self {
        let mut live = Self {
            name: cfg.hostgroup_name.clone(),
            alias: String::new(),
            members: Vec::new(),
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &group::HostGroup) {
        self.alias = cfg
            .alias
            .clone()
            .unwrap_or_else(|| cfg.hostgroup_name.clone());
        sync_refs(&mut self.members, cfg.members.iter());
    }
}

#[derive(Clone, Debug)]
pub struct ContactGroup {
    pub name: String,
    pub alias: String,
    pub members: Vec<NamedRef>,
}

impl ContactGroup {
    pub fn from_config(cfg: &group::ContactGroup) -> Self {
        let mut live = Self {
            name: cfg.contactgroup_name.clone(),
            alias: String::new(),
            members: Vec::new(),
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &group::ContactGroup) {
        self.alias = cfg
            .alias
            .clone()
            .unwrap_or_else(|| cfg.contactgroup_name.clone());
        sync_refs(&mut self.members, cfg.members.iter());
    }
}

/// A service group member reference: the (host, description) pair plus the
/// bound marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceMemberRef {
    pub host: String,
    pub description: String,
    pub bound: bool,
}

impl ServiceMemberRef {
    pub fn unbound(host: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            description: description.into(),
            bound: false,
        }
    }

    pub fn key(&self) -> (String, String) {
        (self.host.clone(), self.description.clone())
    }
}

#[derive(Clone, Debug)]
pub struct ServiceGroup {
    pub name: String,
    pub alias: String,
    pub members: Vec<ServiceMemberRef>,
}

impl ServiceGroup {
    pub fn from_config(cfg: &group::ServiceGroup) -> Self {
        let mut live = Self {
            name: cfg.servicegroup_name.clone(),
            alias: String::new(),
            members: Vec::new(),
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &group::ServiceGroup) {
        self.alias = cfg
            .alias
            .clone()
            .unwrap_or_else(|| cfg.servicegroup_name.clone());
        let unchanged = self.members.len() == cfg.members.len()
            && self
                .members
                .iter()
                .zip(cfg.members.iter())
                .all(|(m, (h, d))| m.host == *h && m.description == *d);
        if !unchanged {
            self.members = cfg
                .members
                .iter()
                .map(|(h, d)| ServiceMemberRef::unbound(h, d))
                .collect();
        }
    }
}
