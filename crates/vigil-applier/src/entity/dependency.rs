//! Live dependency entities.
//!
//! Dependencies arrive in canonical 1-to-1, single-kind form from expansion
//! and are immutable while live: a changed dependency diffs as a delete plus
//! an add, so there is no `update_from`.

use std::collections::BTreeSet;

use vigil_config::{
    dependency::{self, DependencyKind},
    host::HostState,
    service::ServiceState,
};

use super::NamedRef;

#[derive(Clone, Debug)]
pub struct HostDependency {
    pub dependent_host: NamedRef,
    pub host: NamedRef,
    pub kind: DependencyKind,
    pub inherits_parent: bool,
    pub dependency_period: Option<NamedRef>,
    pub failure_options: BTreeSet<HostState>,
    /// The canonical configuration object this entity was built from, kept
    /// for content matching on removal.
    pub config: dependency::HostDependency,
}

impl HostDependency {
    pub fn from_config(cfg: &dependency::HostDependency) -> Self {
        let kind = cfg.dependency_kind.unwrap_or(DependencyKind::Execution);
        let failure_options = match kind {
            DependencyKind::Execution => cfg.execution_failure_options.clone(),
            DependencyKind::Notification => cfg.notification_failure_options.clone(),
        };
        Self {
            dependent_host: NamedRef::unbound(cfg.dependent_host_name()),
            host: NamedRef::unbound(cfg.host_name()),
            kind,
            inherits_parent: cfg.inherits_parent.unwrap_or(false),
            dependency_period: cfg.dependency_period.as_ref().map(NamedRef::unbound),
            failure_options,
            config: cfg.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceDependency {
    pub dependent_host: NamedRef,
    pub dependent_service_description: String,
    pub host: NamedRef,
    pub service_description: String,
    pub kind: DependencyKind,
    pub inherits_parent: bool,
    pub dependency_period: Option<NamedRef>,
    pub failure_options: BTreeSet<ServiceState>,
    pub config: dependency::ServiceDependency,
}

impl ServiceDependency {
    pub fn from_config(cfg: &dependency::ServiceDependency) -> Self {
        let kind = cfg.dependency_kind.unwrap_or(DependencyKind::Execution);
        let failure_options = match kind {
            DependencyKind::Execution => cfg.execution_failure_options.clone(),
            DependencyKind::Notification => cfg.notification_failure_options.clone(),
        };
        Self {
            dependent_host: NamedRef::unbound(cfg.dependent_host_name()),
            dependent_service_description: cfg
                .dependent_service_description
                .clone()
                .unwrap_or_default(),
            host: NamedRef::unbound(cfg.host_name()),
            service_description: cfg.service_description.clone().unwrap_or_default(),
            kind,
            inherits_parent: cfg.inherits_parent.unwrap_or(false),
            dependency_period: cfg.dependency_period.as_ref().map(NamedRef::unbound),
            failure_options,
            config: cfg.clone(),
        }
    }
}
