//! Command and connector appliers.

use snafu::OptionExt;
use vigil_config::{ConfigObject, ObjectKind, command};

use super::{Applier, ApplyContext, Error, NotFoundSnafu, bind_opt_checked};
use crate::{entity, event::EventKind, registry::Registries};

pub struct CommandApplier;

impl Applier for CommandApplier {
    type Object = command::Command;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .commands
            .insert(object.key(), entity::Command::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::Command,
                key: object.command_name.clone(),
            })?;
        ctx.emit(EventKind::Created, ObjectKind::Command, &object.command_name);
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let command = ctx
            .registries
            .commands
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Command,
                key: object.command_name.clone(),
            })?;
        command.update_from(object);
        ctx.emit(EventKind::Updated, ObjectKind::Command, &object.command_name);
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.commands.remove(&object.key()).is_some() {
            ctx.emit(EventKind::Removed, ObjectKind::Command, &object.command_name);
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let connector_exists = object
            .connector
            .as_ref()
            .is_some_and(|name| registries.connectors.contains_key(name));
        let command = registries
            .commands
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Command,
                key: object.command_name.clone(),
            })?;
        Ok(bind_opt_checked(
            &mut command.connector,
            connector_exists,
            ObjectKind::Command,
            &command.name,
            ObjectKind::Connector,
        ))
    }
}

pub struct ConnectorApplier;

impl Applier for ConnectorApplier {
    type Object = command::Connector;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .connectors
            .insert(object.key(), entity::Connector::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::Connector,
                key: object.connector_name.clone(),
            })?;
        ctx.emit(
            EventKind::Created,
            ObjectKind::Connector,
            &object.connector_name,
        );
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let connector = ctx
            .registries
            .connectors
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::Connector,
                key: object.connector_name.clone(),
            })?;
        connector.update_from(object);
        ctx.emit(
            EventKind::Updated,
            ObjectKind::Connector,
            &object.connector_name,
        );
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.connectors.remove(&object.key()).is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::Connector,
                &object.connector_name,
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        if !registries.connectors.contains_key(&object.key()) {
            return NotFoundSnafu {
                kind: ObjectKind::Connector,
                key: object.connector_name.clone(),
            }
            .fail();
        }
        Ok(0)
    }
}
