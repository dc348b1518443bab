//! Service applier.

use snafu::OptionExt;
use vigil_config::{ConfigObject, ObjectKind, service};

use super::{
    Applier, ApplyContext, Error, NotFoundSnafu, bind_checked, bind_opt_checked, pair_key,
};
use crate::{
    entity,
    event::{Event, EventKind},
    registry::Registries,
};

pub struct ServiceApplier;

impl Applier for ServiceApplier {
    type Object = service::Service;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = object.key();
        ctx.registries
            .services
            .insert(key.clone(), entity::Service::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::Service,
                key: pair_key(&key),
            })?;
        ctx.emit(EventKind::Created, ObjectKind::Service, pair_key(&key));
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = object.key();
        let service = ctx
            .registries
            .services
            .get_mut(&key)
            .context(NotFoundSnafu {
                kind: ObjectKind::Service,
                key: pair_key(&key),
            })?;
        service.update_from(object);
        ctx.emit(EventKind::Updated, ObjectKind::Service, pair_key(&key));
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let key = object.key();
        if ctx.registries.services.remove(&key).is_none() {
            return Ok(());
        }
        for group in ctx.registries.service_groups.values_mut() {
            let before = group.members.len();
            group.members.retain(|member| member.key() != key);
            if group.members.len() != before {
                ctx.sink.emit(Event::member(
                    EventKind::MemberUnlinked,
                    ObjectKind::ServiceGroup,
                    group.name.clone(),
                    pair_key(&key),
                ));
            }
        }
        ctx.emit(EventKind::Removed, ObjectKind::Service, pair_key(&key));
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let key = object.key();
        let host_exists = registries.hosts.contains_key(&key.0);
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
        let check_command_exists = object
            .check_command
            .as_ref()
            .is_some_and(|name| registries.commands.contains_key(name));
        let event_handler_exists = object
            .event_handler
            .as_ref()
            .is_some_and(|name| registries.commands.contains_key(name));
        let check_period_exists = object
            .check_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));
        let notification_period_exists = object
            .notification_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));

        let service = registries
            .services
            .get_mut(&key)
            .context(NotFoundSnafu {
                kind: ObjectKind::Service,
                key: pair_key(&key),
            })?;
        let display = pair_key(&key);
        let mut dangling = 0;
        dangling += bind_checked(
            std::slice::from_mut(&mut service.host),
            &[host_exists],
            ObjectKind::Service,
            &display,
            ObjectKind::Host,
        );
        dangling += bind_checked(
            &mut service.contacts,
            &contact_checks,
            ObjectKind::Service,
            &display,
            ObjectKind::Contact,
        );
        dangling += bind_checked(
            &mut service.contact_groups,
            &contact_group_checks,
            ObjectKind::Service,
            &display,
            ObjectKind::ContactGroup,
        );
        dangling += bind_opt_checked(
            &mut service.check_command,
            check_command_exists,
            ObjectKind::Service,
            &display,
            ObjectKind::Command,
        );
        dangling += bind_opt_checked(
            &mut service.event_handler,
            event_handler_exists,
            ObjectKind::Service,
            &display,
            ObjectKind::Command,
        );
        dangling += bind_opt_checked(
            &mut service.check_period,
            check_period_exists,
            ObjectKind::Service,
            &display,
            ObjectKind::TimePeriod,
        );
        dangling += bind_opt_checked(
            &mut service.notification_period,
            notification_period_exists,
            ObjectKind::Service,
            &display,
            ObjectKind::TimePeriod,
        );
        Ok(dangling)
    }
}
