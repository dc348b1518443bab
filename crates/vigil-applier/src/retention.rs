//! Runtime state retention.
//!
//! Retention data captures the runtime state of hosts and services
//! (acknowledgements, notification counters, comments, downtimes) so a
//! restart can restore it after the configuration has been applied. Entries
//! whose host or service no longer exists are skipped, not errors: the
//! configuration may legitimately have dropped them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::Registries;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub entry_time: u64,
    pub persistent: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downtime {
    pub author: String,
    pub comment: String,
    pub start_time: u64,
    pub end_time: u64,
    pub fixed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRetention {
    pub acknowledged: bool,
    pub notification_number: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub downtimes: Vec<Downtime>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRetention {
    pub acknowledged: bool,
    pub notification_number: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub downtimes: Vec<Downtime>,
}

/// A snapshot of runtime state keyed by the live entity keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionState {
    pub hosts: BTreeMap<String, HostRetention>,
    pub services: BTreeMap<(String, String), ServiceRetention>,
}

/// Merges retained runtime state into the live tables. Entries with no
/// matching live entity are skipped with a debug log.
pub fn apply_retention(registries: &mut Registries, retention: &RetentionState) {
    for (name, saved) in &retention.hosts {
        let Some(host) = registries.hosts.get_mut(name) else {
            debug!(host = %name, "skipping retained state for unknown host");
            continue;
        };
        host.acknowledged = saved.acknowledged;
        host.notification_number = saved.notification_number;
        host.comments = saved.comments.clone();
        host.downtimes = saved.downtimes.clone();
    }

    for (key, saved) in &retention.services {
        let Some(service) = registries.services.get_mut(key) else {
            debug!(host = %key.0, service = %key.1, "skipping retained state for unknown service");
            continue;
        };
        service.acknowledged = saved.acknowledged;
        service.notification_number = saved.notification_number;
        service.comments = saved.comments.clone();
        service.downtimes = saved.downtimes.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity;

    #[test]
    fn retention_restores_known_hosts_and_skips_unknown() {
        let mut registries = Registries::default();
        registries
            .hosts
            .insert(
                "web".to_string(),
                entity::Host::from_config(&vigil_config::host::Host {
                    host_name: "web".to_string(),
                    ..Default::default()
                }),
            )
            .expect("insert host");

        let mut retention = RetentionState::default();
        retention.hosts.insert(
            "web".to_string(),
            HostRetention {
                acknowledged: true,
                notification_number: 3,
                ..Default::default()
            },
        );
        retention
            .hosts
            .insert("gone".to_string(), HostRetention::default());

        apply_retention(&mut registries, &retention);

        let web = registries
            .hosts
            .get(&"web".to_string())
            .expect("retained host");
        assert!(web.acknowledged);
        assert_eq!(web.notification_number, 3);
        assert!(!registries.hosts.contains_key(&"gone".to_string()));
    }
}
