//! End-to-end reload scenarios: parse-free states in, live tables out.

use std::{collections::BTreeSet, sync::Arc};

use vigil_applier::{EventKind, Phase, RecordingSink, StateApplier};
use vigil_config::{
    InheritableList, ObjectKind, State,
    contact::Contact,
    dependency::HostDependency,
    escalation::HostEscalation,
    group::ContactGroup,
    host::{Host, HostState},
};

fn contact(name: &str) -> Contact {
    Contact {
        contact_name: name.to_string(),
        ..Default::default()
    }
}

fn host(name: &str) -> Host {
    Host {
        host_name: name.to_string(),
        address: Some(format!("10.0.0.{}", name.len())),
        ..Default::default()
    }
}

fn contact_group(name: &str, members: &[&str]) -> ContactGroup {
    ContactGroup {
        contactgroup_name: name.to_string(),
        members: InheritableList::defined(members.iter().map(ToString::to_string)),
        ..Default::default()
    }
}

fn state_with_contacts_and_group(members: &[&str]) -> State {
    let mut state = State::default();
    state
        .contacts
        .objects
        .insert(contact("c1"))
        .expect("insert c1");
    state
        .contacts
        .objects
        .insert(contact("c2"))
        .expect("insert c2");
    state
        .contact_groups
        .objects
        .insert(contact_group("cg1", members))
        .expect("insert cg1");
    state
}

/// Builds the same configuration from scratch, the way each reload of a
/// configuration directory would.
fn state_with_escalated_host() -> State {
    let mut state = State::default();
    state
        .hosts
        .objects
        .insert(host("web"))
        .expect("insert web");
    state
        .contacts
        .objects
        .insert(contact("c1"))
        .expect("insert c1");
    state
        .host_escalations
        .objects
        .insert(HostEscalation {
            hosts: InheritableList::defined(["web".to_string()]),
            contacts: InheritableList::defined(["c1".to_string()]),
            first_notification: Some(2),
            ..Default::default()
        })
        .expect("insert escalation");
    state
}

#[test]
fn initial_apply_reaches_ready_without_errors() {
    let mut applier = StateApplier::default();
    assert_eq!(applier.phase(), Phase::Waiting);

    let report = applier.apply(state_with_contacts_and_group(&["c1"]));

    assert!(report.is_success());
    assert_eq!(report.warnings, 0);
    assert_eq!(applier.phase(), Phase::Ready);
    assert_eq!(applier.registries().contacts.len(), 2);
    assert_eq!(applier.registries().contact_groups.len(), 1);
}

#[test]
fn group_member_change_rebuilds_membership_with_link_events() {
    let sink = Arc::new(RecordingSink::default());
    let mut applier = StateApplier::new(sink.clone());
    applier.apply(state_with_contacts_and_group(&["c1"]));

    // Growing cg1 from {c1} to {c1, c2} rebuilds the whole member list: one
    // unlink for the previous member, one link per new member.
    let events_before = sink.events().len();
    let report = applier.apply(state_with_contacts_and_group(&["c1", "c2"]));
    assert!(report.is_success());

    let events: Vec<_> = sink.events().split_off(events_before);
    let unlinks: Vec<_> = events
        .iter()
        .filter(|e| e.kind == EventKind::MemberUnlinked)
        .collect();
    let links: Vec<_> = events
        .iter()
        .filter(|e| e.kind == EventKind::MemberLinked)
        .collect();
    assert_eq!(unlinks.len(), 1);
    assert_eq!(unlinks[0].member.as_deref(), Some("c1"));
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].member.as_deref(), Some("c1"));
    assert_eq!(links[1].member.as_deref(), Some("c2"));

    let group = applier
        .registries()
        .contact_groups
        .get("cg1")
        .expect("cg1 must stay live");
    assert_eq!(group.members.len(), 2);
    assert!(group.members.iter().all(vigil_applier::entity::NamedRef::is_bound));
}

#[test]
fn reapplying_the_same_state_emits_nothing() {
    let sink = Arc::new(RecordingSink::default());
    let mut applier = StateApplier::new(sink.clone());

    let state = state_with_contacts_and_group(&["c1", "c2"]);
    applier.apply(state.clone());
    let events_before = sink.events().len();

    let report = applier.apply(state);

    assert!(report.is_success());
    assert_eq!(report.warnings, 0);
    assert_eq!(sink.events().len(), events_before);
}

#[test]
fn adding_a_group_emits_created_without_member_events() {
    let sink = Arc::new(RecordingSink::default());
    let mut applier = StateApplier::new(sink.clone());

    applier.apply(state_with_contacts_and_group(&["c1", "c2"]));

    let member_events = sink
        .events()
        .iter()
        .filter(|e| {
            matches!(e.kind, EventKind::MemberLinked | EventKind::MemberUnlinked)
        })
        .count();
    assert_eq!(member_events, 0);
    assert!(sink.events().iter().any(|e| {
        e.kind == EventKind::Created && e.object == ObjectKind::ContactGroup && e.key == "cg1"
    }));
}

#[test]
fn dependency_expansion_materializes_the_cartesian_product() {
    let mut state = State::default();
    for name in ["a", "b", "m"] {
        state.hosts.objects.insert(host(name)).expect("insert host");
    }
    state
        .host_dependencies
        .objects
        .insert(HostDependency {
            dependent_hosts: InheritableList::defined(["a".to_string(), "b".to_string()]),
            hosts: InheritableList::defined(["m".to_string()]),
            execution_failure_options: BTreeSet::from([HostState::Down]),
            notification_failure_options: BTreeSet::from([HostState::Unreachable]),
            ..Default::default()
        })
        .expect("insert dependency");

    let mut applier = StateApplier::default();
    let report = applier.apply(state);

    assert!(report.is_success());
    assert_eq!(report.warnings, 0);
    // 2 dependent hosts x 1 host x 2 kinds.
    assert_eq!(applier.registries().host_dependencies.len(), 4);
    assert_eq!(applier.registries().host_dependencies.get(&"a".to_string()).len(), 2);
    assert_eq!(applier.registries().host_dependencies.get(&"b".to_string()).len(), 2);
}

#[test]
fn removing_an_escalation_unlinks_it_from_its_host() {
    let mut applier = StateApplier::default();
    let report = applier.apply(state_with_escalated_host());
    assert!(report.is_success());

    let web = applier.registries().hosts.get("web").expect("web is live");
    assert_eq!(web.escalations.len(), 1);
    assert_eq!(
        applier.registries().host_escalations.get(&"web".to_string()).len(),
        1
    );

    let mut without_escalation = State::default();
    without_escalation
        .hosts
        .objects
        .insert(host("web"))
        .expect("insert web");
    without_escalation
        .contacts
        .objects
        .insert(contact("c1"))
        .expect("insert c1");
    let report = applier.apply(without_escalation);
    assert!(report.is_success());

    let web = applier.registries().hosts.get("web").expect("web is live");
    assert!(web.escalations.is_empty());
    assert!(applier.registries().host_escalations.is_empty());
}

#[test]
fn unchanged_escalation_survives_a_fresh_reload() {
    let sink = Arc::new(RecordingSink::default());
    let mut applier = StateApplier::new(sink.clone());

    // Two separately constructed states: content-identical, but the
    // escalation carries a different uid in each, as on a real reload.
    let report = applier.apply(state_with_escalated_host());
    assert!(report.is_success());
    let events_before = sink.events().len();

    let report = applier.apply(state_with_escalated_host());

    assert_eq!(report.errors, 0);
    assert_eq!(report.warnings, 0);
    assert_eq!(sink.events().len(), events_before);

    let escalations = applier
        .registries()
        .host_escalations
        .get(&"web".to_string());
    assert_eq!(escalations.len(), 1);
    let web = applier.registries().hosts.get("web").expect("web is live");
    assert_eq!(web.escalations, vec![escalations[0].uid()]);
}

#[test]
fn dangling_references_are_warnings_not_errors() {
    let mut state = State::default();
    let mut web = host("web");
    web.contacts = InheritableList::defined(["nobody".to_string()]);
    state.hosts.objects.insert(web).expect("insert web");

    let mut applier = StateApplier::default();
    let report = applier.apply(state);

    assert_eq!(report.errors, 0);
    assert_eq!(report.warnings, 1);
    let web = applier.registries().hosts.get("web").expect("web is live");
    assert_eq!(web.contacts.len(), 1);
    assert!(!web.contacts[0].is_bound());
}

#[test]
fn retention_survives_a_reload() {
    use vigil_applier::retention::{HostRetention, RetentionState};

    let mut state = State::default();
    state.hosts.objects.insert(host("web")).expect("insert web");

    let mut retention = RetentionState::default();
    retention.hosts.insert(
        "web".to_string(),
        HostRetention {
            acknowledged: true,
            notification_number: 2,
            ..Default::default()
        },
    );

    let mut applier = StateApplier::default();
    let report = applier.apply_with_retention(state, &retention);

    assert!(report.is_success());
    let web = applier.registries().hosts.get("web").expect("web is live");
    assert!(web.acknowledged);
    assert_eq!(web.notification_number, 2);
}
