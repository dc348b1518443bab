//! Host and service escalation appliers.
//!
//! Escalations are content-keyed like dependencies, so in-place modification
//! is rejected. The orchestrator keeps the configuration uid stable across
//! reloads for unchanged escalations, which lets resolution and removal
//! match exactly the live entry the configuration object maps to, and lets
//! the attached host or service unlink exactly the entry that was deleted.

use snafu::OptionExt;
use vigil_config::{ObjectKind, escalation};

use super::{
    AlreadyExistsSnafu, Applier, ApplyContext, Error, NotFoundSnafu,
    UnsupportedModificationSnafu, bind_checked, bind_opt_checked,
};
use crate::{entity, event::EventKind, registry::Registries};

fn host_esc_key(object: &escalation::HostEscalation) -> String {
    format!("{}#{}", object.host_name(), object.uid)
}

fn service_esc_key(object: &escalation::ServiceEscalation) -> String {
    format!(
        "{}/{}#{}",
        object.host_name(),
        object.service_description.as_deref().unwrap_or(""),
        object.uid
    )
}

pub struct HostEscalationApplier;

impl Applier for HostEscalationApplier {
    type Object = escalation::HostEscalation;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = object.host_name().to_string();
        if ctx
            .registries
            .host_escalations
            .get(&key)
            .iter()
            .any(|esc| esc.config == *object)
        {
            return AlreadyExistsSnafu {
                kind: ObjectKind::HostEscalation,
                key: host_esc_key(object),
            }
            .fail();
        }
        ctx.registries
            .host_escalations
            .insert(key, entity::HostEscalation::from_config(object));
        ctx.emit(
            EventKind::Created,
            ObjectKind::HostEscalation,
            host_esc_key(object),
        );
        Ok(())
    }

    fn modify_object(&self, _ctx: &mut ApplyContext, _object: &Self::Object) -> Result<(), Error> {
        UnsupportedModificationSnafu {
            kind: ObjectKind::HostEscalation,
        }
        .fail()
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let removed = ctx
            .registries
            .host_escalations
            .remove_where(&object.host_name().to_string(), |esc| {
                esc.uid() == object.uid
            });
        let Some(removed) = removed else {
            return Ok(());
        };
        // Unlink from the attached host, if it is still live.
        if let Some(host) = ctx.registries.hosts.get_mut(object.host_name()) {
            host.escalations.retain(|uid| *uid != removed.uid());
        }
        ctx.emit(
            EventKind::Removed,
            ObjectKind::HostEscalation,
            host_esc_key(object),
        );
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let host_exists = registries.hosts.contains_key(object.host_name());
        let contact_checks: Vec<bool> = object
            .contacts
            .iter()
            .map(|name| registries.contacts.contains_key(name))
            .collect();
        let contact_group_checks: Vec<bool> = object
            .contact_groups
            .iter()
            .map(|name| registries.contact_groups.contains_key(name))
            .collect();
        let period_exists = object
            .escalation_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));

        let bucket = registries
            .host_escalations
            .get_mut(&object.host_name().to_string())
            .context(NotFoundSnafu {
                kind: ObjectKind::HostEscalation,
                key: host_esc_key(object),
            })?;
        let escalation = bucket
            .iter_mut()
            .find(|esc| esc.uid() == object.uid)
            .context(NotFoundSnafu {
                kind: ObjectKind::HostEscalation,
                key: host_esc_key(object),
            })?;

        let display = host_esc_key(object);
        let mut dangling = 0;
        dangling += bind_checked(
            std::slice::from_mut(&mut escalation.host),
            &[host_exists],
            ObjectKind::HostEscalation,
            &display,
            ObjectKind::Host,
        );
        dangling += bind_checked(
            &mut escalation.contacts,
            &contact_checks,
            ObjectKind::HostEscalation,
            &display,
            ObjectKind::Contact,
        );
        dangling += bind_checked(
            &mut escalation.contact_groups,
            &contact_group_checks,
            ObjectKind::HostEscalation,
            &display,
            ObjectKind::ContactGroup,
        );
        dangling += bind_opt_checked(
            &mut escalation.escalation_period,
            period_exists,
            ObjectKind::HostEscalation,
            &display,
            ObjectKind::TimePeriod,
        );

        // Link the escalation onto its host.
        if let Some(host) = registries.hosts.get_mut(object.host_name())
            && !host.escalations.contains(&object.uid)
        {
            host.escalations.push(object.uid);
        }
        Ok(dangling)
    }
}

pub struct ServiceEscalationApplier;

impl Applier for ServiceEscalationApplier {
    type Object = escalation::ServiceEscalation;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = (
            object.host_name().to_string(),
            object.service_description.clone().unwrap_or_default(),
        );
        if ctx
            .registries
            .service_escalations
            .get(&key)
            .iter()
            .any(|esc| esc.config == *object)
        {
            return AlreadyExistsSnafu {
                kind: ObjectKind::ServiceEscalation,
                key: service_esc_key(object),
            }
            .fail();
        }
        ctx.registries
            .service_escalations
            .insert(key, entity::ServiceEscalation::from_config(object));
        ctx.emit(
            EventKind::Created,
            ObjectKind::ServiceEscalation,
            service_esc_key(object),
        );
        Ok(())
    }

    fn modify_object(&self, _ctx: &mut ApplyContext, _object: &Self::Object) -> Result<(), Error> {
        UnsupportedModificationSnafu {
            kind: ObjectKind::ServiceEscalation,
        }
        .fail()
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = (
            object.host_name().to_string(),
            object.service_description.clone().unwrap_or_default(),
        );
        let removed = ctx
            .registries
            .service_escalations
            .remove_where(&key, |esc| esc.uid() == object.uid);
        let Some(removed) = removed else {
            return Ok(());
        };
        if let Some(service) = ctx.registries.services.get_mut(&key) {
            service.escalations.retain(|uid| *uid != removed.uid());
        }
        ctx.emit(
            EventKind::Removed,
            ObjectKind::ServiceEscalation,
            service_esc_key(object),
        );
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let key = (
            object.host_name().to_string(),
            object.service_description.clone().unwrap_or_default(),
        );
        let service_exists = registries.services.contains_key(&key);
        let contact_checks: Vec<bool> = object
            .contacts
            .iter()
            .map(|name| registries.contacts.contains_key(name))
            .collect();
        let contact_group_checks: Vec<bool> = object
            .contact_groups
            .iter()
            .map(|name| registries.contact_groups.contains_key(name))
            .collect();
        let period_exists = object
            .escalation_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));

        let bucket = registries
            .service_escalations
            .get_mut(&key)
            .context(NotFoundSnafu {
                kind: ObjectKind::ServiceEscalation,
                key: service_esc_key(object),
            })?;
        let escalation = bucket
            .iter_mut()
            .find(|esc| esc.uid() == object.uid)
            .context(NotFoundSnafu {
                kind: ObjectKind::ServiceEscalation,
                key: service_esc_key(object),
            })?;

        let display = service_esc_key(object);
        let mut dangling = 0;
        dangling += bind_checked(
            std::slice::from_mut(&mut escalation.host),
            &[service_exists],
            ObjectKind::ServiceEscalation,
            &display,
            ObjectKind::Service,
        );
        dangling += bind_checked(
            &mut escalation.contacts,
            &contact_checks,
            ObjectKind::ServiceEscalation,
            &display,
            ObjectKind::Contact,
        );
        dangling += bind_checked(
            &mut escalation.contact_groups,
            &contact_group_checks,
            ObjectKind::ServiceEscalation,
            &display,
            ObjectKind::ContactGroup,
        );
        dangling += bind_opt_checked(
            &mut escalation.escalation_period,
            period_exists,
            ObjectKind::ServiceEscalation,
            &display,
            ObjectKind::TimePeriod,
        );

        if let Some(service) = registries.services.get_mut(&key)
            && !service.escalations.contains(&object.uid)
        {
            service.escalations.push(object.uid);
        }
        Ok(dangling)
    }
}

#[cfg(test)]
mod tests {
    use vigil_config::InheritableList;

    use super::*;
    use crate::event::RecordingSink;

    fn canonical_escalation() -> escalation::HostEscalation {
        escalation::HostEscalation {
            hosts: InheritableList::defined(["web".to_string()]),
            contacts: InheritableList::defined(["admin".to_string()]),
            first_notification: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn adding_a_content_equal_escalation_twice_is_rejected() {
        let mut registries = Registries::default();
        let sink = RecordingSink::default();
        let mut ctx = ApplyContext {
            registries: &mut registries,
            sink: &sink,
        };

        let first = canonical_escalation();
        HostEscalationApplier
            .add_object(&mut ctx, &first)
            .expect("first add");

        // A separately constructed, content-identical escalation carries a
        // different uid but the same key.
        let duplicate = canonical_escalation();
        assert_ne!(first.uid, duplicate.uid);
        let err = HostEscalationApplier
            .add_object(&mut ctx, &duplicate)
            .expect_err("duplicate add must fail");
        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert_eq!(registries.host_escalations.len(), 1);
        assert_eq!(sink.events().len(), 1);
    }
}
