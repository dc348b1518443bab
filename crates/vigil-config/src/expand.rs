//! Expansion: template resolution, group flattening, declared-membership
//! folding and cartesian materialization of dependencies and escalations.
//!
//! Expansion runs on the new configuration before the difference engine ever
//! sees it, and is idempotent: expanding an already-flat state is a no-op.
//! Objects whose expansion fails are dropped and reported; their siblings are
//! unaffected.

use std::collections::{BTreeMap, BTreeSet};

use itertools::iproduct;
use snafu::Snafu;
use tracing::debug;

use crate::{
    dependency::{DependencyKind, HostDependency, ServiceDependency},
    escalation::{HostEscalation, ServiceEscalation},
    group::{GroupObject, HostGroup},
    host::Host,
    object::{ConfigObject, InheritableList, ObjectKind},
    service::Service,
    set::OrderedSet,
    state::State,
    template, validation,
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(transparent)]
    Template { source: template::Error },

    #[snafu(transparent)]
    Validation { source: validation::Error },

    #[snafu(display("{kind} {group:?} is its own direct or transitive sub-group member"))]
    GroupCycle { kind: ObjectKind, group: String },

    #[snafu(display("{kind} {group:?} lists unknown sub-group {member:?}"))]
    UnknownSubGroup {
        kind: ObjectKind,
        group: String,
        member: String,
    },

    #[snafu(display("{kind} {name:?} references unknown {group_kind} {group:?}"))]
    UnknownGroupReference {
        kind: ObjectKind,
        name: String,
        group_kind: ObjectKind,
        group: String,
    },

    #[snafu(display("service {description:?} expands to no host"))]
    ServiceWithoutHost { description: String },

    #[snafu(display("{kind} expands to no entity on a side that requires at least one"))]
    EmptyDependencySide { kind: ObjectKind },

    #[snafu(display("{kind} defines neither execution nor notification failure options"))]
    NoFailureOptions { kind: ObjectKind },

    #[snafu(display("{kind} is attached to unknown host {host:?}"))]
    EscalationHostNotFound { kind: ObjectKind, host: String },

    #[snafu(display(
        "service escalation is attached to unknown service {description:?} on host {host:?}"
    ))]
    EscalationServiceNotFound { host: String, description: String },

    #[snafu(display("service escalation does not name a service description"))]
    EscalationWithoutService,

    #[snafu(display("service dependency does not name both service descriptions"))]
    DependencyWithoutService,
}

/// Runs the full expansion pipeline over a freshly parsed state.
pub(crate) fn expand_state(state: &mut State) -> Vec<Error> {
    let mut errors: Vec<Error> = Vec::new();

    // Template resolution first: everything below operates on flattened
    // objects.
    macro_rules! resolve_kind {
        ($field:ident) => {
            errors.extend(
                template::resolve_objects(&mut state.$field.objects, &state.$field.templates)
                    .into_iter()
                    .map(Error::from),
            );
        };
    }
    resolve_kind!(time_periods);
    resolve_kind!(connectors);
    resolve_kind!(commands);
    resolve_kind!(contacts);
    resolve_kind!(contact_groups);
    resolve_kind!(hosts);
    resolve_kind!(host_groups);
    resolve_kind!(services);
    resolve_kind!(service_groups);
    resolve_kind!(host_dependencies);
    resolve_kind!(service_dependencies);
    resolve_kind!(host_escalations);
    resolve_kind!(service_escalations);

    // Name validation on every kind with a name-shaped key, after templates
    // so inherited names are covered too.
    errors.extend(validate_names(&mut state.time_periods.objects, |t| {
        &t.timeperiod_name
    }));
    errors.extend(validate_names(&mut state.connectors.objects, |c| {
        &c.connector_name
    }));
    errors.extend(validate_names(&mut state.commands.objects, |c| {
        &c.command_name
    }));
    errors.extend(validate_names(&mut state.contacts.objects, |c| {
        &c.contact_name
    }));
    errors.extend(validate_names(&mut state.contact_groups.objects, |g| {
        &g.contactgroup_name
    }));
    errors.extend(validate_names(&mut state.hosts.objects, |h| &h.host_name));
    errors.extend(validate_names(&mut state.host_groups.objects, |g| {
        &g.hostgroup_name
    }));
    errors.extend(validate_names(&mut state.services.objects, |s| {
        &s.service_description
    }));
    errors.extend(validate_names(&mut state.service_groups.objects, |g| {
        &g.servicegroup_name
    }));

    // Nested sub-groups are flattened into direct member lists.
    errors.extend(flatten_groups(&mut state.host_groups.objects));
    errors.extend(flatten_groups(&mut state.contact_groups.objects));
    errors.extend(flatten_groups(&mut state.service_groups.objects));

    // Memberships declared on the member side are folded into the group's
    // member list, so the group's member list is the single source of truth
    // from here on.
    errors.extend(fold_memberships(
        state.hosts.objects.iter().map(|h| {
            (h.host_name.clone(), ObjectKind::Host, h.host_groups.clone())
        }),
        &mut state.host_groups.objects,
    ));
    errors.extend(fold_memberships(
        state.contacts.objects.iter().map(|c| {
            (
                c.contact_name.clone(),
                ObjectKind::Contact,
                c.contact_groups.clone(),
            )
        }),
        &mut state.contact_groups.objects,
    ));

    // Services materialize into one instance per resolved host; service group
    // membership folding needs the canonical (host, description) keys.
    errors.extend(expand_services(
        &mut state.services.objects,
        &state.host_groups.objects,
    ));
    errors.extend(fold_service_memberships(state));

    errors.extend(expand_host_dependencies(
        &mut state.host_dependencies.objects,
        &state.host_groups.objects,
    ));
    errors.extend(expand_service_dependencies(
        &mut state.service_dependencies.objects,
        &state.host_groups.objects,
    ));

    errors.extend(expand_host_escalations(
        &mut state.host_escalations.objects,
        &state.host_groups.objects,
        &state.hosts.objects,
    ));
    errors.extend(expand_service_escalations(
        &mut state.service_escalations.objects,
        &state.host_groups.objects,
        &state.services.objects,
    ));

    if !errors.is_empty() {
        debug!(errors = errors.len(), "expansion dropped objects");
    }
    errors
}

/// Drops objects whose name violates the naming convention.
fn validate_names<T: ConfigObject>(
    set: &mut OrderedSet<T>,
    name_of: impl Fn(&T) -> &str,
) -> Vec<Error> {
    let mut errors = Vec::new();
    let drained: Vec<T> = set.drain().collect();
    for object in drained {
        match validation::validate_name(T::KIND, name_of(&object)) {
            Ok(()) => {
                set.replace(object);
            }
            Err(err) => errors.push(err.into()),
        }
    }
    errors
}

/// Flattens nested sub-group references into direct member lists.
///
/// Resolution is memoized per group key. A group reached again while its own
/// resolution is still in progress is part of a membership cycle: that is a
/// hard error for the group, never a hang.
fn flatten_groups<G: GroupObject<Key = String>>(set: &mut OrderedSet<G>) -> Vec<Error> {
    let groups: BTreeMap<String, G> = set
        .drain()
        .map(|g| (g.group_name().to_string(), g))
        .collect();

    let mut resolved: BTreeMap<String, BTreeSet<G::Member>> = BTreeMap::new();
    let mut errors = Vec::new();
    for name in groups.keys() {
        let mut in_progress = BTreeSet::new();
        if let Err(err) = resolve_group(name, &groups, &mut resolved, &mut in_progress) {
            errors.push(err);
        }
    }

    for (name, mut group) in groups {
        let Some(members) = resolved.get(&name) else {
            // Resolution failed above; the group is dropped.
            continue;
        };
        group.members_mut().replace(members.iter().cloned());
        group.group_members_mut().clear();
        set.replace(group);
    }
    errors
}

fn resolve_group<G: GroupObject>(
    name: &str,
    groups: &BTreeMap<String, G>,
    resolved: &mut BTreeMap<String, BTreeSet<G::Member>>,
    in_progress: &mut BTreeSet<String>,
) -> Result<(), Error> {
    if resolved.contains_key(name) {
        return Ok(());
    }
    if !in_progress.insert(name.to_string()) {
        return GroupCycleSnafu {
            kind: G::KIND,
            group: name.to_string(),
        }
        .fail();
    }

    let group = &groups[name];
    let mut members: BTreeSet<G::Member> = group.members().values().clone();
    for sub_group in group.group_members().iter() {
        if !groups.contains_key(sub_group) {
            return UnknownSubGroupSnafu {
                kind: G::KIND,
                group: name.to_string(),
                member: sub_group.clone(),
            }
            .fail();
        }
        resolve_group(sub_group, groups, resolved, in_progress)?;
        if let Some(sub_members) = resolved.get(sub_group) {
            members.extend(sub_members.iter().cloned());
        }
    }

    in_progress.remove(name);
    resolved.insert(name.to_string(), members);
    Ok(())
}

/// Folds group memberships declared on the member side (a host's
/// `host_groups`, a contact's `contact_groups`) into the group member lists.
fn fold_memberships<G>(
    declarations: impl Iterator<Item = (String, ObjectKind, InheritableList)>,
    groups: &mut OrderedSet<G>,
) -> Vec<Error>
where
    G: GroupObject<Key = String, Member = String>,
{
    let mut errors = Vec::new();
    for (member_name, member_kind, declared_groups) in declarations {
        for group_name in declared_groups.iter() {
            match groups.get_mut(group_name) {
                Some(group) => group.members_mut().insert(member_name.clone()),
                None => errors.push(Error::UnknownGroupReference {
                    kind: member_kind,
                    name: member_name.clone(),
                    group_kind: G::KIND,
                    group: group_name.clone(),
                }),
            }
        }
    }
    errors
}

fn fold_service_memberships(state: &mut State) -> Vec<Error> {
    let mut errors = Vec::new();
    for service in &state.services.objects {
        let member = (
            service.host_name().to_string(),
            service.service_description.clone(),
        );
        for group_name in service.service_groups.iter() {
            match state.service_groups.objects.get_mut(group_name) {
                Some(group) => group.members_mut().insert(member.clone()),
                None => errors.push(Error::UnknownGroupReference {
                    kind: ObjectKind::Service,
                    name: format!("{}/{}", member.0, member.1),
                    group_kind: ObjectKind::ServiceGroup,
                    group: group_name.clone(),
                }),
            }
        }
    }
    errors
}

/// Resolves a (hosts, host groups) reference pair into the flat set of host
/// names it designates.
fn resolve_host_set(
    referrer_kind: ObjectKind,
    referrer_name: &str,
    hosts: &InheritableList,
    host_groups: &InheritableList,
    groups: &OrderedSet<HostGroup>,
) -> Result<BTreeSet<String>, Error> {
    let mut resolved: BTreeSet<String> = hosts.values().clone();
    for group_name in host_groups.iter() {
        let group = groups.get(group_name).ok_or_else(|| {
            Error::UnknownGroupReference {
                kind: referrer_kind,
                name: referrer_name.to_string(),
                group_kind: ObjectKind::HostGroup,
                group: group_name.clone(),
            }
        })?;
        resolved.extend(group.members().iter().cloned());
    }
    Ok(resolved)
}

/// Materializes one service instance per resolved host.
fn expand_services(
    services: &mut OrderedSet<Service>,
    host_groups: &OrderedSet<HostGroup>,
) -> Vec<Error> {
    let mut errors = Vec::new();
    let drained: Vec<Service> = services.drain().collect();
    for service in drained {
        if service.hosts.len() == 1 && service.host_groups.is_empty() {
            services.replace(service);
            continue;
        }
        let resolved = match resolve_host_set(
            ObjectKind::Service,
            &service.service_description,
            &service.hosts,
            &service.host_groups,
            host_groups,
        ) {
            Ok(resolved) => resolved,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        if resolved.is_empty() {
            errors.push(Error::ServiceWithoutHost {
                description: service.service_description.clone(),
            });
            continue;
        }
        for host in resolved {
            let mut instance = service.clone();
            instance.hosts.replace([host]);
            instance.host_groups.clear();
            services.replace(instance);
        }
    }
    errors
}

/// Materializes the cartesian product of a host dependency's sides, one
/// canonical object per (host, dependent host, dependency kind) triple.
/// Each canonical object carries only its own kind's failure options.
fn expand_host_dependencies(
    dependencies: &mut OrderedSet<HostDependency>,
    host_groups: &OrderedSet<HostGroup>,
) -> Vec<Error> {
    let mut errors = Vec::new();
    let drained: Vec<HostDependency> = dependencies.drain().collect();
    'next: for dependency in drained {
        if dependency.is_expanded() {
            dependencies.replace(dependency);
            continue;
        }
        let sides = [
            (&dependency.hosts, &dependency.host_groups),
            (&dependency.dependent_hosts, &dependency.dependent_host_groups),
        ]
        .map(|(hosts, groups)| {
            resolve_host_set(ObjectKind::HostDependency, "", hosts, groups, host_groups)
        });
        let [masters, dependents] = match sides {
            [Ok(masters), Ok(dependents)] => [masters, dependents],
            [Err(err), _] | [_, Err(err)] => {
                errors.push(err);
                continue 'next;
            }
        };
        if masters.is_empty() || dependents.is_empty() {
            errors.push(Error::EmptyDependencySide {
                kind: ObjectKind::HostDependency,
            });
            continue;
        }
        if dependency.execution_failure_options.is_empty()
            && dependency.notification_failure_options.is_empty()
        {
            errors.push(Error::NoFailureOptions {
                kind: ObjectKind::HostDependency,
            });
            continue;
        }

        for (master, dependent) in iproduct!(&masters, &dependents) {
            for kind in [DependencyKind::Execution, DependencyKind::Notification] {
                let options = match kind {
                    DependencyKind::Execution => &dependency.execution_failure_options,
                    DependencyKind::Notification => &dependency.notification_failure_options,
                };
                if options.is_empty() {
                    continue;
                }
                let mut instance = dependency.clone();
                instance.hosts.replace([master.clone()]);
                instance.host_groups.clear();
                instance.dependent_hosts.replace([dependent.clone()]);
                instance.dependent_host_groups.clear();
                instance.dependency_kind = Some(kind);
                match kind {
                    DependencyKind::Execution => instance.notification_failure_options.clear(),
                    DependencyKind::Notification => instance.execution_failure_options.clear(),
                }
                dependencies.replace(instance);
            }
        }
    }
    errors
}

fn expand_service_dependencies(
    dependencies: &mut OrderedSet<ServiceDependency>,
    host_groups: &OrderedSet<HostGroup>,
) -> Vec<Error> {
    let mut errors = Vec::new();
    let drained: Vec<ServiceDependency> = dependencies.drain().collect();
    'next: for dependency in drained {
        if dependency.is_expanded() {
            dependencies.replace(dependency);
            continue;
        }
        if dependency.service_description.is_none()
            || dependency.dependent_service_description.is_none()
        {
            errors.push(Error::DependencyWithoutService);
            continue;
        }
        let sides = [
            (&dependency.hosts, &dependency.host_groups),
            (&dependency.dependent_hosts, &dependency.dependent_host_groups),
        ]
        .map(|(hosts, groups)| {
            resolve_host_set(ObjectKind::ServiceDependency, "", hosts, groups, host_groups)
        });
        let [masters, dependents] = match sides {
            [Ok(masters), Ok(dependents)] => [masters, dependents],
            [Err(err), _] | [_, Err(err)] => {
                errors.push(err);
                continue 'next;
            }
        };
        if masters.is_empty() || dependents.is_empty() {
            errors.push(Error::EmptyDependencySide {
                kind: ObjectKind::ServiceDependency,
            });
            continue;
        }
        if dependency.execution_failure_options.is_empty()
            && dependency.notification_failure_options.is_empty()
        {
            errors.push(Error::NoFailureOptions {
                kind: ObjectKind::ServiceDependency,
            });
            continue;
        }

        for (master, dependent) in iproduct!(&masters, &dependents) {
            for kind in [DependencyKind::Execution, DependencyKind::Notification] {
                let options = match kind {
                    DependencyKind::Execution => &dependency.execution_failure_options,
                    DependencyKind::Notification => &dependency.notification_failure_options,
                };
                if options.is_empty() {
                    continue;
                }
                let mut instance = dependency.clone();
                instance.hosts.replace([master.clone()]);
                instance.host_groups.clear();
                instance.dependent_hosts.replace([dependent.clone()]);
                instance.dependent_host_groups.clear();
                instance.dependency_kind = Some(kind);
                match kind {
                    DependencyKind::Execution => instance.notification_failure_options.clear(),
                    DependencyKind::Notification => instance.execution_failure_options.clear(),
                }
                dependencies.replace(instance);
            }
        }
    }
    errors
}

/// Materializes one host escalation per attached host, then applies
/// special-variable inheritance: contact groups, notification interval and
/// escalation period default to the attached host's values. This narrower
/// inheritance path runs after group expansion, not through templates.
fn expand_host_escalations(
    escalations: &mut OrderedSet<HostEscalation>,
    host_groups: &OrderedSet<HostGroup>,
    hosts: &OrderedSet<Host>,
) -> Vec<Error> {
    let mut errors = Vec::new();
    let drained: Vec<HostEscalation> = escalations.drain().collect();
    for escalation in drained {
        let resolved = match resolve_host_set(
            ObjectKind::HostEscalation,
            "",
            &escalation.hosts,
            &escalation.host_groups,
            host_groups,
        ) {
            Ok(resolved) => resolved,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        for host_name in resolved {
            let Some(host) = hosts.get(&host_name) else {
                errors.push(Error::EscalationHostNotFound {
                    kind: ObjectKind::HostEscalation,
                    host: host_name,
                });
                continue;
            };
            let mut instance = escalation.clone();
            instance.hosts.replace([host_name]);
            instance.host_groups.clear();
            if !instance.contact_groups.is_defined() {
                instance.contact_groups.inherit(&host.contact_groups);
            }
            if instance.notification_interval.is_none() {
                instance.notification_interval = host.notification_interval;
            }
            if instance.escalation_period.is_none() {
                instance.escalation_period.clone_from(&host.notification_period);
            }
            escalations.replace(instance);
        }
    }
    errors
}

fn expand_service_escalations(
    escalations: &mut OrderedSet<ServiceEscalation>,
    host_groups: &OrderedSet<HostGroup>,
    services: &OrderedSet<Service>,
) -> Vec<Error> {
    let mut errors = Vec::new();
    let drained: Vec<ServiceEscalation> = escalations.drain().collect();
    for escalation in drained {
        let Some(description) = escalation.service_description.clone() else {
            errors.push(Error::EscalationWithoutService);
            continue;
        };
        let resolved = match resolve_host_set(
            ObjectKind::ServiceEscalation,
            "",
            &escalation.hosts,
            &escalation.host_groups,
            host_groups,
        ) {
            Ok(resolved) => resolved,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        for host_name in resolved {
            let service_key = (host_name.clone(), description.clone());
            let Some(service) = services.get(&service_key) else {
                errors.push(Error::EscalationServiceNotFound {
                    host: host_name,
                    description: description.clone(),
                });
                continue;
            };
            let mut instance = escalation.clone();
            instance.hosts.replace([host_name]);
            instance.host_groups.clear();
            if !instance.contact_groups.is_defined() {
                instance.contact_groups.inherit(&service.contact_groups);
            }
            if instance.notification_interval.is_none() {
                instance.notification_interval = service.notification_interval;
            }
            if instance.escalation_period.is_none() {
                instance.escalation_period.clone_from(&service.notification_period);
            }
            escalations.replace(instance);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostState;

    fn host(name: &str) -> Host {
        Host {
            host_name: name.to_string(),
            address: Some("127.0.0.1".to_string()),
            ..Host::default()
        }
    }

    fn host_group(name: &str, members: &[&str], sub_groups: &[&str]) -> HostGroup {
        HostGroup {
            hostgroup_name: name.to_string(),
            members: InheritableList::defined(members.iter().map(ToString::to_string)),
            hostgroup_members: InheritableList::defined(sub_groups.iter().map(ToString::to_string)),
            ..HostGroup::default()
        }
    }

    #[test]
    fn nested_groups_flatten_recursively() {
        let mut groups = OrderedSet::new();
        groups
            .insert(host_group("all", &["gateway"], &["web", "db"]))
            .expect("unique");
        groups.insert(host_group("web", &["web1", "web2"], &[])).expect("unique");
        groups.insert(host_group("db", &["db1"], &[])).expect("unique");

        let errors = flatten_groups(&mut groups);
        assert!(errors.is_empty());
        let all = groups.get(&"all".to_string()).expect("flattened group");
        let members: Vec<_> = all.members.iter().cloned().collect();
        assert_eq!(members, ["db1", "gateway", "web1", "web2"]);
        assert!(all.hostgroup_members.is_empty());
    }

    #[test]
    fn group_that_is_its_own_transitive_member_fails_without_hanging() {
        let mut groups = OrderedSet::new();
        groups.insert(host_group("a", &[], &["b"])).expect("unique");
        groups.insert(host_group("b", &[], &["a"])).expect("unique");

        let errors = flatten_groups(&mut groups);
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, Error::GroupCycle { .. }))
        );
        assert!(groups.is_empty());
    }

    #[test]
    fn directly_self_referential_group_fails() {
        let mut groups = OrderedSet::new();
        groups.insert(host_group("a", &["h"], &["a"])).expect("unique");

        let errors = flatten_groups(&mut groups);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], Error::GroupCycle { .. }));
    }

    #[test]
    fn flattening_an_already_flat_set_is_a_no_op() {
        let mut groups = OrderedSet::new();
        groups.insert(host_group("web", &["web1"], &[])).expect("unique");
        let before = groups.clone();

        let errors = flatten_groups(&mut groups);
        assert!(errors.is_empty());
        assert_eq!(groups, before);
    }

    #[test]
    fn objects_with_illegal_names_are_dropped() {
        let mut hosts = OrderedSet::new();
        hosts.insert(host("ok")).expect("unique");
        hosts.insert(host("bad;name")).expect("unique");

        let errors = validate_names(&mut hosts, |h| &h.host_name);
        assert_eq!(errors.len(), 1);
        assert_eq!(hosts.len(), 1);
        assert!(hosts.get(&"ok".to_string()).is_some());
    }

    #[test]
    fn services_materialize_per_host() {
        let mut groups = OrderedSet::new();
        groups.insert(host_group("web", &["web1", "web2"], &[])).expect("unique");

        let mut services = OrderedSet::new();
        services
            .insert(Service {
                service_description: "http".to_string(),
                host_groups: InheritableList::defined(["web".to_string()]),
                ..Service::default()
            })
            .expect("unique");

        let errors = expand_services(&mut services, &groups);
        assert!(errors.is_empty());
        assert_eq!(services.len(), 2);
        assert!(services.get(&("web1".to_string(), "http".to_string())).is_some());
        assert!(services.get(&("web2".to_string(), "http".to_string())).is_some());
    }

    #[test]
    fn host_dependency_expands_to_the_cartesian_product_per_kind() {
        let mut groups = OrderedSet::new();
        groups.insert(host_group("masters", &["a", "b"], &[])).expect("unique");

        let mut dependencies = OrderedSet::new();
        dependencies
            .insert(HostDependency {
                host_groups: InheritableList::defined(["masters".to_string()]),
                dependent_hosts: InheritableList::defined(["x".to_string()]),
                execution_failure_options: BTreeSet::from([HostState::Down]),
                notification_failure_options: BTreeSet::from([
                    HostState::Down,
                    HostState::Unreachable,
                ]),
                ..HostDependency::default()
            })
            .expect("unique");

        let errors = expand_host_dependencies(&mut dependencies, &groups);
        assert!(errors.is_empty());
        // 2 masters x 1 dependent x 2 kinds.
        assert_eq!(dependencies.len(), 4);
        for dependency in &dependencies {
            assert!(dependency.is_expanded());
            match dependency.dependency_kind {
                Some(DependencyKind::Execution) => {
                    assert!(!dependency.execution_failure_options.is_empty());
                    assert!(dependency.notification_failure_options.is_empty());
                }
                Some(DependencyKind::Notification) => {
                    assert!(dependency.execution_failure_options.is_empty());
                    assert!(!dependency.notification_failure_options.is_empty());
                }
                None => unreachable!("expanded dependency must be typed"),
            }
        }
    }

    #[test]
    fn dependency_with_an_empty_side_is_a_shape_error() {
        let groups = OrderedSet::new();
        let mut dependencies = OrderedSet::new();
        dependencies
            .insert(HostDependency {
                hosts: InheritableList::defined(["a".to_string()]),
                execution_failure_options: BTreeSet::from([HostState::Down]),
                ..HostDependency::default()
            })
            .expect("unique");

        let errors = expand_host_dependencies(&mut dependencies, &groups);
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, Error::EmptyDependencySide { .. }))
        );
        assert!(dependencies.is_empty());
    }

    #[test]
    fn escalation_inherits_special_variables_from_its_host() {
        let mut hosts = OrderedSet::new();
        hosts
            .insert(Host {
                notification_interval: Some(45),
                notification_period: Some("workhours".to_string()),
                contact_groups: InheritableList::defined(["admins".to_string()]),
                ..host("web1")
            })
            .expect("unique");

        let groups = OrderedSet::new();
        let mut escalations = OrderedSet::new();
        escalations
            .insert(HostEscalation {
                hosts: InheritableList::defined(["web1".to_string()]),
                first_notification: Some(3),
                ..HostEscalation::default()
            })
            .expect("unique");

        let errors = expand_host_escalations(&mut escalations, &groups, &hosts);
        assert!(errors.is_empty());
        let escalation = escalations.iter().next().expect("one escalation");
        assert_eq!(escalation.notification_interval, Some(45));
        assert_eq!(escalation.escalation_period.as_deref(), Some("workhours"));
        assert!(escalation.contact_groups.contains(&"admins".to_string()));
    }

    #[test]
    fn escalation_explicit_values_are_not_overridden() {
        let mut hosts = OrderedSet::new();
        hosts
            .insert(Host {
                notification_interval: Some(45),
                ..host("web1")
            })
            .expect("unique");

        let groups = OrderedSet::new();
        let mut escalations = OrderedSet::new();
        escalations
            .insert(HostEscalation {
                hosts: InheritableList::defined(["web1".to_string()]),
                notification_interval: Some(10),
                ..HostEscalation::default()
            })
            .expect("unique");

        let errors = expand_host_escalations(&mut escalations, &groups, &hosts);
        assert!(errors.is_empty());
        let escalation = escalations.iter().next().expect("one escalation");
        assert_eq!(escalation.notification_interval, Some(10));
    }
}
