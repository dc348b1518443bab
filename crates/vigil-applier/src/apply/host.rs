//! Host applier.

use snafu::OptionExt;
use vigil_config::{ConfigObject, ObjectKind, host};

use super::{Applier, ApplyContext, Error, NotFoundSnafu, bind_checked, bind_opt_checked};
use crate::{
    entity,
    event::{Event, EventKind},
    registry::Registries,
};

pub struct HostApplier;

impl Applier for HostApplier {
    type Object = host::Host;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .hosts
            .insert(object.key(), entity::Host::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::Host,
                key: object.host_name.clone(),
            })?;
        ctx.emit(EventKind::Created, ObjectKind::Host, &object.host_name);
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let host = ctx
            .registries
            .hosts
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Host,
                key: object.host_name.clone(),
            })?;
        host.update_from(object);
        ctx.emit(EventKind::Updated, ObjectKind::Host, &object.host_name);
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.hosts.remove(&object.key()).is_none() {
            return Ok(());
        }
        // Detach back-references so no live table keeps pointing at the
        // removed host.
        for group in ctx.registries.host_groups.values_mut() {
            let before = group.members.len();
            group
                .members
                .retain(|member| member.name() != object.host_name);
            if group.members.len() != before {
                ctx.sink.emit(Event::member(
                    EventKind::MemberUnlinked,
                    ObjectKind::HostGroup,
                    group.name.clone(),
                    object.host_name.clone(),
                ));
            }
        }
        for other in ctx.registries.hosts.values_mut() {
            other
                .parents
                .retain(|parent| parent.name() != object.host_name);
        }
        ctx.emit(EventKind::Removed, ObjectKind::Host, &object.host_name);
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let parent_checks: Vec<bool> = object
            .parents
            .iter()
            .map(|name| registries.hosts.contains_key(name))
            .collect();
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

        let host = registries
            .hosts
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Host,
                key: object.host_name.clone(),
            })?;
        let name = host.name.clone();
        let mut dangling = 0;
        dangling += bind_checked(
            &mut host.parents,
            &parent_checks,
            ObjectKind::Host,
            &name,
            ObjectKind::Host,
        );
        dangling += bind_checked(
            &mut host.contacts,
            &contact_checks,
            ObjectKind::Host,
            &name,
            ObjectKind::Contact,
        );
        dangling += bind_checked(
            &mut host.contact_groups,
            &contact_group_checks,
            ObjectKind::Host,
            &name,
            ObjectKind::ContactGroup,
        );
        dangling += bind_opt_checked(
            &mut host.check_command,
            check_command_exists,
            ObjectKind::Host,
            &name,
            ObjectKind::Command,
        );
        dangling += bind_opt_checked(
            &mut host.event_handler,
            event_handler_exists,
            ObjectKind::Host,
            &name,
            ObjectKind::Command,
        );
        dangling += bind_opt_checked(
            &mut host.check_period,
            check_period_exists,
            ObjectKind::Host,
            &name,
            ObjectKind::TimePeriod,
        );
        dangling += bind_opt_checked(
            &mut host.notification_period,
            notification_period_exists,
            ObjectKind::Host,
            &name,
            ObjectKind::TimePeriod,
        );
        Ok(dangling)
    }
}
