//! The reload orchestrator.
//!
//! [`StateApplier`] owns the live registries and the currently applied
//! configuration. Each reload takes a freshly parsed [`State`], expands it,
//! diffs it against the current one kind by kind, applies the differences in
//! dependency order, then re-resolves every cross-reference. There is no
//! rollback: individual failures are counted and logged, and the apply keeps
//! going so one bad object cannot veto the rest of the reload.
//!
//! Requiring `&mut self` for [`StateApplier::apply`] makes overlapping
//! reloads unrepresentable.

use std::sync::Arc;

use tracing::{error, info, instrument};
use vigil_config::{ConfigObject, Difference, OrderedSet, State};

use super::{
    Applier, ApplyContext,
    command::{CommandApplier, ConnectorApplier},
    contact::ContactApplier,
    dependency::{HostDependencyApplier, ServiceDependencyApplier},
    escalation::{HostEscalationApplier, ServiceEscalationApplier},
    group::{ContactGroupApplier, HostGroupApplier, ServiceGroupApplier},
    host::HostApplier,
    service::ServiceApplier,
    timeperiod::TimePeriodApplier,
};
use crate::{
    event::{EventSink, NullSink},
    registry::Registries,
    retention::{self, RetentionState},
};

/// Where the applier is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// No configuration applied yet.
    Waiting,
    /// A reload is in progress.
    Applying,
    /// The last reload finished.
    Ready,
}

/// Outcome of a reload: hard failures and dangling-reference warnings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub errors: u32,
    pub warnings: u32,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

pub struct StateApplier {
    registries: Registries,
    current: State,
    sink: Arc<dyn EventSink>,
    phase: Phase,
}

impl StateApplier {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            registries: Registries::default(),
            current: State::default(),
            sink,
            phase: Phase::Waiting,
        }
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// The configuration currently applied to the live tables.
    pub fn current(&self) -> &State {
        &self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies a freshly parsed configuration, replacing the current one.
    #[instrument(skip_all)]
    pub fn apply(&mut self, new_state: State) -> ApplyReport {
        self.apply_inner(new_state, None)
    }

    /// Same as [`StateApplier::apply`], then merges retained runtime state
    /// into the live tables.
    #[instrument(skip_all)]
    pub fn apply_with_retention(
        &mut self,
        new_state: State,
        retention: &RetentionState,
    ) -> ApplyReport {
        self.apply_inner(new_state, Some(retention))
    }

    fn apply_inner(&mut self, mut new_state: State, retention: Option<&RetentionState>) -> ApplyReport {
        self.phase = Phase::Applying;
        let mut report = ApplyReport::default();

        for err in new_state.expand() {
            error!(%err, "configuration expansion failed");
            report.errors += 1;
        }

        // Escalations are content-keyed but identified at runtime by a uid
        // assigned on construction. A freshly parsed state carries new uids
        // even for unchanged escalations, so carry the current uid over to
        // each content-equal new object before diffing; otherwise resolution,
        // removal and the host/service uid link lists would no longer match
        // the live entries.
        adopt_uids(
            &self.current.host_escalations.objects,
            &mut new_state.host_escalations.objects,
            |esc| esc.uid,
            |esc, uid| esc.uid = uid,
        );
        adopt_uids(
            &self.current.service_escalations.objects,
            &mut new_state.service_escalations.objects,
            |esc| esc.uid,
            |esc, uid| esc.uid = uid,
        );

        let mut ctx = ApplyContext {
            registries: &mut self.registries,
            sink: self.sink.as_ref(),
        };

        // Dependency order: referenced kinds before referencing kinds.
        report.errors += apply_kind(
            &TimePeriodApplier,
            &self.current.time_periods.objects,
            &new_state.time_periods.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ConnectorApplier,
            &self.current.connectors.objects,
            &new_state.connectors.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &CommandApplier,
            &self.current.commands.objects,
            &new_state.commands.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ContactApplier,
            &self.current.contacts.objects,
            &new_state.contacts.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ContactGroupApplier,
            &self.current.contact_groups.objects,
            &new_state.contact_groups.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &HostApplier,
            &self.current.hosts.objects,
            &new_state.hosts.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &HostGroupApplier,
            &self.current.host_groups.objects,
            &new_state.host_groups.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ServiceApplier,
            &self.current.services.objects,
            &new_state.services.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ServiceGroupApplier,
            &self.current.service_groups.objects,
            &new_state.service_groups.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &HostDependencyApplier,
            &self.current.host_dependencies.objects,
            &new_state.host_dependencies.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ServiceDependencyApplier,
            &self.current.service_dependencies.objects,
            &new_state.service_dependencies.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &HostEscalationApplier,
            &self.current.host_escalations.objects,
            &new_state.host_escalations.objects,
            &mut ctx,
        );
        report.errors += apply_kind(
            &ServiceEscalationApplier,
            &self.current.service_escalations.objects,
            &new_state.service_escalations.objects,
            &mut ctx,
        );

        self.current = new_state;
        self.resolve_all(&mut report);

        if let Some(retention) = retention {
            retention::apply_retention(&mut self.registries, retention);
        }

        self.phase = Phase::Ready;
        info!(
            errors = report.errors,
            warnings = report.warnings,
            "configuration applied"
        );
        report
    }

    /// Re-binds every cross-reference in the live tables against the tables
    /// themselves. Dangling references count as warnings; a configuration
    /// object with no live counterpart is a hard error.
    fn resolve_all(&mut self, report: &mut ApplyReport) {
        resolve_kind(
            &TimePeriodApplier,
            &self.current.time_periods.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ConnectorApplier,
            &self.current.connectors.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &CommandApplier,
            &self.current.commands.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ContactApplier,
            &self.current.contacts.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ContactGroupApplier,
            &self.current.contact_groups.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &HostApplier,
            &self.current.hosts.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &HostGroupApplier,
            &self.current.host_groups.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ServiceApplier,
            &self.current.services.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ServiceGroupApplier,
            &self.current.service_groups.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &HostDependencyApplier,
            &self.current.host_dependencies.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ServiceDependencyApplier,
            &self.current.service_dependencies.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &HostEscalationApplier,
            &self.current.host_escalations.objects,
            &mut self.registries,
            report,
        );
        resolve_kind(
            &ServiceEscalationApplier,
            &self.current.service_escalations.objects,
            &mut self.registries,
            report,
        );
    }
}

impl Default for StateApplier {
    fn default() -> Self {
        Self::new(Arc::new(NullSink))
    }
}

/// Applies one kind's difference: additions, then in-place modifications,
/// then deletions. Returns the number of hard failures.
fn apply_kind<A: Applier>(
    applier: &A,
    old: &OrderedSet<A::Object>,
    new: &OrderedSet<A::Object>,
    ctx: &mut ApplyContext,
) -> u32 {
    let kind = <A::Object as ConfigObject>::KIND;
    let diff = Difference::between(old, new);
    let mut errors = 0;
    for object in diff.added() {
        if let Err(err) = applier.add_object(ctx, object) {
            error!(%err, %kind, "failed to add object");
            errors += 1;
        }
    }
    for object in diff.modified() {
        if let Err(err) = applier.modify_object(ctx, object) {
            error!(%err, %kind, "failed to modify object");
            errors += 1;
        }
    }
    for object in diff.deleted() {
        if let Err(err) = applier.remove_object(ctx, object) {
            error!(%err, %kind, "failed to remove object");
            errors += 1;
        }
    }
    errors
}

/// Copies the uid of every object in `old` onto its content-equal
/// counterpart in `new`. Objects without a counterpart keep their fresh uid.
fn adopt_uids<T: ConfigObject<Key = T>>(
    old: &OrderedSet<T>,
    new: &mut OrderedSet<T>,
    uid_of: impl Fn(&T) -> u64,
    adopt: impl Fn(&mut T, u64),
) {
    let drained: Vec<T> = new.drain().collect();
    for mut object in drained {
        if let Some(previous) = old.get(&object) {
            adopt(&mut object, uid_of(previous));
        }
        new.replace(object);
    }
}

fn resolve_kind<A: Applier>(
    applier: &A,
    objects: &OrderedSet<A::Object>,
    registries: &mut Registries,
    report: &mut ApplyReport,
) {
    let kind = <A::Object as ConfigObject>::KIND;
    for object in objects {
        match applier.resolve_object(registries, object) {
            Ok(dangling) => report.warnings += dangling,
            Err(err) => {
                error!(%err, %kind, "failed to resolve object");
                report.errors += 1;
            }
        }
    }
}
