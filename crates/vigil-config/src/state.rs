//! The full parsed configuration for one reload cycle.

use std::collections::BTreeMap;

use crate::{
    command::{Command, Connector},
    contact::Contact,
    dependency::{HostDependency, ServiceDependency},
    escalation::{HostEscalation, ServiceEscalation},
    expand,
    group::{ContactGroup, HostGroup, ServiceGroup},
    host::Host,
    object::ConfigObject,
    service::Service,
    set::OrderedSet,
    timeperiod::TimePeriod,
};

/// The registrable objects of one kind plus the (unregistered) templates
/// that seed their inheritance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindSet<T: ConfigObject> {
    pub objects: OrderedSet<T>,
    pub templates: BTreeMap<String, T>,
}

impl<T: ConfigObject> Default for KindSet<T> {
    fn default() -> Self {
        Self {
            objects: OrderedSet::new(),
            templates: BTreeMap::new(),
        }
    }
}

/// One complete configuration state: every ordered configuration set the
/// parser produced for one reload cycle.
///
/// Two instances exist per cycle: the state retained from the previous cycle
/// (old) and the freshly parsed one (new). The new state must be
/// [expanded](State::expand) before it is diffed against the old one.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub commands: KindSet<Command>,
    pub connectors: KindSet<Connector>,
    pub contacts: KindSet<Contact>,
    pub contact_groups: KindSet<ContactGroup>,
    pub time_periods: KindSet<TimePeriod>,
    pub hosts: KindSet<Host>,
    pub host_groups: KindSet<HostGroup>,
    pub services: KindSet<Service>,
    pub service_groups: KindSet<ServiceGroup>,
    pub host_dependencies: KindSet<HostDependency>,
    pub service_dependencies: KindSet<ServiceDependency>,
    pub host_escalations: KindSet<HostEscalation>,
    pub service_escalations: KindSet<ServiceEscalation>,
}

impl State {
    /// Resolves template inheritance, flattens group membership and
    /// materializes dependencies and escalations into canonical 1-to-1 form.
    ///
    /// Objects whose expansion fails are dropped from the state and returned
    /// as errors; the rest of the state is expanded normally. Expanding an
    /// already expanded state is a no-op.
    pub fn expand(&mut self) -> Vec<expand::Error> {
        expand::expand_state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::InheritableList;

    #[test]
    fn expansion_is_idempotent() {
        let mut state = State::default();
        state
            .hosts
            .objects
            .insert(Host {
                host_name: "web1".to_string(),
                address: Some("10.0.0.1".to_string()),
                ..Host::default()
            })
            .expect("unique");
        state
            .host_groups
            .objects
            .insert(HostGroup {
                hostgroup_name: "web".to_string(),
                members: InheritableList::defined(["web1".to_string()]),
                ..HostGroup::default()
            })
            .expect("unique");
        state
            .services
            .objects
            .insert(Service {
                service_description: "http".to_string(),
                host_groups: InheritableList::defined(["web".to_string()]),
                ..Service::default()
            })
            .expect("unique");

        let errors = state.expand();
        assert!(errors.is_empty());
        let first = state.clone();

        let errors = state.expand();
        assert!(errors.is_empty());
        assert_eq!(state.services.objects, first.services.objects);
        assert_eq!(state.hosts.objects, first.hosts.objects);
        assert_eq!(state.host_groups.objects, first.host_groups.objects);
    }
}
