//! Host and service dependency configuration objects.
//!
//! Dependencies have no stable identity beyond their full content: the whole
//! object is its own key, so the difference engine only ever classifies them
//! as added or deleted, never modified.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    host::HostState,
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    service::ServiceState,
    template::Inherit,
};

/// What a dependency suppresses when its criteria match.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum DependencyKind {
    Execution,
    Notification,
}

/// A suppression link between hosts.
///
/// Before expansion a dependency may name several hosts and groups on each
/// side and carry both execution and notification failure options; the
/// expansion pass materializes the cartesian product into canonical 1-to-1,
/// single-kind objects, each carrying only its own kind's options.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostDependency {
    pub dependent_hosts: InheritableList,
    pub dependent_host_groups: InheritableList,
    pub hosts: InheritableList,
    pub host_groups: InheritableList,
    /// Set once the object is in canonical 1-to-1, typed form.
    pub dependency_kind: Option<DependencyKind>,
    pub inherits_parent: Option<bool>,
    pub dependency_period: Option<String>,
    pub execution_failure_options: BTreeSet<HostState>,
    pub notification_failure_options: BTreeSet<HostState>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl HostDependency {
    /// The dependent host of a canonical dependency.
    pub fn dependent_host_name(&self) -> &str {
        self.dependent_hosts.iter().next().map_or("", String::as_str)
    }

    /// The depended-upon host of a canonical dependency.
    pub fn host_name(&self) -> &str {
        self.hosts.iter().next().map_or("", String::as_str)
    }

    pub fn is_expanded(&self) -> bool {
        self.dependency_kind.is_some()
    }
}

impl ConfigObject for HostDependency {
    type Key = Self;

    const KIND: ObjectKind = ObjectKind::HostDependency;

    fn key(&self) -> Self::Key {
        self.clone()
    }
}

impl Inherit for HostDependency {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        self.dependent_hosts.inherit(&parent.dependent_hosts);
        self.dependent_host_groups
            .inherit(&parent.dependent_host_groups);
        self.hosts.inherit(&parent.hosts);
        self.host_groups.inherit(&parent.host_groups);
        inherit_if_unset(&mut self.inherits_parent, &parent.inherits_parent);
        inherit_if_unset(&mut self.dependency_period, &parent.dependency_period);
        if self.execution_failure_options.is_empty() {
            self.execution_failure_options.clone_from(&parent.execution_failure_options);
        }
        if self.notification_failure_options.is_empty() {
            self.notification_failure_options.clone_from(&parent.notification_failure_options);
        }
    }
}

/// A suppression link between services, shaped like [`HostDependency`] with
/// service descriptions on both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceDependency {
    pub dependent_hosts: InheritableList,
    pub dependent_host_groups: InheritableList,
    pub dependent_service_description: Option<String>,
    pub hosts: InheritableList,
    pub host_groups: InheritableList,
    pub service_description: Option<String>,
    pub dependency_kind: Option<DependencyKind>,
    pub inherits_parent: Option<bool>,
    pub dependency_period: Option<String>,
    pub execution_failure_options: BTreeSet<ServiceState>,
    pub notification_failure_options: BTreeSet<ServiceState>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl ServiceDependency {
    pub fn dependent_host_name(&self) -> &str {
        self.dependent_hosts.iter().next().map_or("", String::as_str)
    }

    pub fn host_name(&self) -> &str {
        self.hosts.iter().next().map_or("", String::as_str)
    }

    pub fn is_expanded(&self) -> bool {
        self.dependency_kind.is_some()
    }
}

impl ConfigObject for ServiceDependency {
    type Key = Self;

    const KIND: ObjectKind = ObjectKind::ServiceDependency;

    fn key(&self) -> Self::Key {
        self.clone()
    }
}

impl Inherit for ServiceDependency {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        self.dependent_hosts.inherit(&parent.dependent_hosts);
        self.dependent_host_groups
            .inherit(&parent.dependent_host_groups);
        inherit_if_unset(
            &mut self.dependent_service_description,
            &parent.dependent_service_description,
        );
        self.hosts.inherit(&parent.hosts);
        self.host_groups.inherit(&parent.host_groups);
        inherit_if_unset(&mut self.service_description, &parent.service_description);
        inherit_if_unset(&mut self.inherits_parent, &parent.inherits_parent);
        inherit_if_unset(&mut self.dependency_period, &parent.dependency_period);
        if self.execution_failure_options.is_empty() {
            self.execution_failure_options.clone_from(&parent.execution_failure_options);
        }
        if self.notification_failure_options.is_empty() {
            self.notification_failure_options.clone_from(&parent.notification_failure_options);
        }
    }
}
