//! Host and service dependency appliers.
//!
//! Dependencies are content-keyed: the difference engine never classifies
//! them as modified, so in-place modification is rejected as a caller bug.
//! The live multimaps are keyed by the dependent side; removal matches the
//! exact configuration content within the bucket.

use snafu::OptionExt;
use vigil_config::{ObjectKind, dependency};

use super::{Applier, ApplyContext, Error, NotFoundSnafu, UnsupportedModificationSnafu, bind_opt_checked};
use crate::{entity, event::EventKind, registry::Registries};

fn host_dep_key(object: &dependency::HostDependency) -> String {
    format!("{} on {}", object.dependent_host_name(), object.host_name())
}

fn service_dep_key(object: &dependency::ServiceDependency) -> String {
    format!(
        "{}/{} on {}/{}",
        object.dependent_host_name(),
        object.dependent_service_description.as_deref().unwrap_or(""),
        object.host_name(),
        object.service_description.as_deref().unwrap_or("")
    )
}

pub struct HostDependencyApplier;

impl Applier for HostDependencyApplier {
    type Object = dependency::HostDependency;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries.host_dependencies.insert(
            object.dependent_host_name().to_string(),
            entity::HostDependency::from_config(object),
        );
        ctx.emit(
            EventKind::Created,
            ObjectKind::HostDependency,
            host_dep_key(object),
        );
        Ok(())
    }

    fn modify_object(&self, _ctx: &mut ApplyContext, _object: &Self::Object) -> Result<(), Error> {
        UnsupportedModificationSnafu {
            kind: ObjectKind::HostDependency,
        }
        .fail()
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let removed = ctx.registries.host_dependencies.remove_where(
            &object.dependent_host_name().to_string(),
            |dep| dep.config == *object,
        );
        if removed.is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::HostDependency,
                host_dep_key(object),
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let dependent_exists = registries.hosts.contains_key(object.dependent_host_name());
        let host_exists = registries.hosts.contains_key(object.host_name());
        let period_exists = object
            .dependency_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));

        let bucket = registries
            .host_dependencies
            .get_mut(&object.dependent_host_name().to_string())
            .context(NotFoundSnafu {
                kind: ObjectKind::HostDependency,
                key: host_dep_key(object),
            })?;
        let dependency = bucket
            .iter_mut()
            .find(|dep| dep.config == *object)
            .context(NotFoundSnafu {
                kind: ObjectKind::HostDependency,
                key: host_dep_key(object),
            })?;

        let display = host_dep_key(object);
        let mut dangling = 0;
        dangling += super::bind_checked(
            std::slice::from_mut(&mut dependency.dependent_host),
            &[dependent_exists],
            ObjectKind::HostDependency,
            &display,
            ObjectKind::Host,
        );
        dangling += super::bind_checked(
            std::slice::from_mut(&mut dependency.host),
            &[host_exists],
            ObjectKind::HostDependency,
            &display,
            ObjectKind::Host,
        );
        dangling += bind_opt_checked(
            &mut dependency.dependency_period,
            period_exists,
            ObjectKind::HostDependency,
            &display,
            ObjectKind::TimePeriod,
        );
        Ok(dangling)
    }
}

pub struct ServiceDependencyApplier;

impl Applier for ServiceDependencyApplier {
    type Object = dependency::ServiceDependency;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = (
            object.dependent_host_name().to_string(),
            object
                .dependent_service_description
                .clone()
                .unwrap_or_default(),
        );
        ctx.registries
            .service_dependencies
            .insert(key, entity::ServiceDependency::from_config(object));
        ctx.emit(
            EventKind::Created,
            ObjectKind::ServiceDependency,
            service_dep_key(object),
        );
        Ok(())
    }

    fn modify_object(&self, _ctx: &mut ApplyContext, _object: &Self::Object) -> Result<(), Error> {
        UnsupportedModificationSnafu {
            kind: ObjectKind::ServiceDependency,
        }
        .fail()
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = (
            object.dependent_host_name().to_string(),
            object
                .dependent_service_description
                .clone()
                .unwrap_or_default(),
        );
        let removed = ctx
            .registries
            .service_dependencies
            .remove_where(&key, |dep| dep.config == *object);
        if removed.is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::ServiceDependency,
                service_dep_key(object),
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let dependent_key = (
            object.dependent_host_name().to_string(),
            object
                .dependent_service_description
                .clone()
                .unwrap_or_default(),
        );
        let target_key = (
            object.host_name().to_string(),
            object.service_description.clone().unwrap_or_default(),
        );
        let dependent_exists = registries.services.contains_key(&dependent_key);
        let target_exists = registries.services.contains_key(&target_key);
        let period_exists = object
            .dependency_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));

        let bucket = registries
            .service_dependencies
            .get_mut(&dependent_key)
            .context(NotFoundSnafu {
                kind: ObjectKind::ServiceDependency,
                key: service_dep_key(object),
            })?;
        let dependency = bucket
            .iter_mut()
            .find(|dep| dep.config == *object)
            .context(NotFoundSnafu {
                kind: ObjectKind::ServiceDependency,
                key: service_dep_key(object),
            })?;

        let display = service_dep_key(object);
        let mut dangling = 0;
        dangling += super::bind_checked(
            std::slice::from_mut(&mut dependency.dependent_host),
            &[dependent_exists],
            ObjectKind::ServiceDependency,
            &display,
            ObjectKind::Service,
        );
        dangling += super::bind_checked(
            std::slice::from_mut(&mut dependency.host),
            &[target_exists],
            ObjectKind::ServiceDependency,
            &display,
            ObjectKind::Service,
        );
        dangling += bind_opt_checked(
            &mut dependency.dependency_period,
            period_exists,
            ObjectKind::ServiceDependency,
            &display,
            ObjectKind::TimePeriod,
        );
        Ok(dangling)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use vigil_config::{InheritableList, host::HostState};

    use super::*;
    use crate::event::RecordingSink;

    fn canonical_dependency() -> dependency::HostDependency {
        dependency::HostDependency {
            dependent_hosts: InheritableList::defined(["web".to_string()]),
            hosts: InheritableList::defined(["gw".to_string()]),
            dependency_kind: Some(vigil_config::dependency::DependencyKind::Execution),
            execution_failure_options: BTreeSet::from([HostState::Down]),
            ..Default::default()
        }
    }

    #[test]
    fn modification_is_rejected_and_mutates_nothing() {
        let mut registries = Registries::default();
        let sink = RecordingSink::default();
        let object = canonical_dependency();

        let mut ctx = ApplyContext {
            registries: &mut registries,
            sink: &sink,
        };
        HostDependencyApplier
            .add_object(&mut ctx, &object)
            .expect("add");

        let err = HostDependencyApplier
            .modify_object(&mut ctx, &object)
            .expect_err("modification must be rejected");
        assert!(matches!(err, Error::UnsupportedModification { .. }));
        assert_eq!(registries.host_dependencies.len(), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn removing_an_absent_dependency_is_a_no_op() {
        let mut registries = Registries::default();
        let sink = RecordingSink::default();
        let mut ctx = ApplyContext {
            registries: &mut registries,
            sink: &sink,
        };

        HostDependencyApplier
            .remove_object(&mut ctx, &canonical_dependency())
            .expect("removal is idempotent");
        assert!(sink.events().is_empty());
    }
}
