//! Contact applier.

use snafu::OptionExt;
use vigil_config::{ConfigObject, ObjectKind, contact};

use super::{Applier, ApplyContext, Error, NotFoundSnafu, bind_checked, bind_opt_checked};
use crate::{entity, event::EventKind, registry::Registries};

pub struct ContactApplier;

impl Applier for ContactApplier {
    type Object = contact::Contact;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .contacts
            .insert(object.key(), entity::Contact::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::Contact,
                key: object.contact_name.clone(),
            })?;
        ctx.emit(EventKind::Created, ObjectKind::Contact, &object.contact_name);
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let contact = ctx
            .registries
            .contacts
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Contact,
                key: object.contact_name.clone(),
            })?;
        contact.update_from(object);
        ctx.emit(EventKind::Updated, ObjectKind::Contact, &object.contact_name);
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.contacts.remove(&object.key()).is_none() {
            return Ok(());
        }
        // Detach from contact group member tables.
        for group in ctx.registries.contact_groups.values_mut() {
            let before = group.members.len();
            group
                .members
                .retain(|member| member.name() != object.contact_name);
            if group.members.len() != before {
                ctx.sink.emit(crate::event::Event::member(
                    EventKind::MemberUnlinked,
                    ObjectKind::ContactGroup,
                    group.name.clone(),
                    object.contact_name.clone(),
                ));
            }
        }
        ctx.emit(EventKind::Removed, ObjectKind::Contact, &object.contact_name);
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let host_period_exists = object
            .host_notification_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));
        let service_period_exists = object
            .service_notification_period
            .as_ref()
            .is_some_and(|name| registries.time_periods.contains_key(name));
        let host_command_checks: Vec<bool> = object
            .host_notification_commands
            .iter()
            .map(|name| registries.commands.contains_key(name))
            .collect();
        let service_command_checks: Vec<bool> = object
            .service_notification_commands
            .iter()
            .map(|name| registries.commands.contains_key(name))
            .collect();

        let contact = registries
            .contacts
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Contact,
                key: object.contact_name.clone(),
            })?;
        let name = contact.name.clone();
        let mut dangling = 0;
        dangling += bind_opt_checked(
            &mut contact.host_notification_period,
            host_period_exists,
            ObjectKind::Contact,
            &name,
            ObjectKind::TimePeriod,
        );
        dangling += bind_opt_checked(
            &mut contact.service_notification_period,
            service_period_exists,
            ObjectKind::Contact,
            &name,
            ObjectKind::TimePeriod,
        );
        dangling += bind_checked(
            &mut contact.host_notification_commands,
            &host_command_checks,
            ObjectKind::Contact,
            &name,
            ObjectKind::Command,
        );
        dangling += bind_checked(
            &mut contact.service_notification_commands,
            &service_command_checks,
            ObjectKind::Contact,
            &name,
            ObjectKind::Command,
        );
        Ok(dangling)
    }
}
