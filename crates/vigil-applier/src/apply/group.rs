//! Host, service and contact group appliers.
//!
//! Group expansion has already flattened nested groups and folded declared
//! memberships into the member lists, so the live tables mirror the
//! configuration exactly. A modified member list is rebuilt wholesale: one
//! unlink event per previous member, one link event per new member.

use snafu::OptionExt;
use vigil_config::{ConfigObject, ObjectKind, group};

use super::{Applier, ApplyContext, Error, NotFoundSnafu, pair_key, rebuild_members};
use crate::{
    entity::{self, ServiceMemberRef},
    event::{Event, EventKind},
    registry::Registries,
};

pub struct HostGroupApplier;

impl Applier for HostGroupApplier {
    type Object = group::HostGroup;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .host_groups
            .insert(object.key(), entity::HostGroup::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::HostGroup,
                key: object.hostgroup_name.clone(),
            })?;
        ctx.emit(
            EventKind::Created,
            ObjectKind::HostGroup,
            &object.hostgroup_name,
        );
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let sink = ctx.sink;
        let group = ctx
            .registries
            .host_groups
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::HostGroup,
                key: object.hostgroup_name.clone(),
            })?;
        group.alias = object
            .alias
            .clone()
            .unwrap_or_else(|| object.hostgroup_name.clone());
        rebuild_members(
            sink,
            ObjectKind::HostGroup,
            &object.hostgroup_name,
            &mut group.members,
            object.members.iter(),
        );
        ctx.emit(
            EventKind::Updated,
            ObjectKind::HostGroup,
            &object.hostgroup_name,
        );
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.host_groups.remove(&object.key()).is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::HostGroup,
                &object.hostgroup_name,
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let member_checks: Vec<bool> = object
            .members
            .iter()
            .map(|name| registries.hosts.contains_key(name))
            .collect();
        let group = registries
            .host_groups
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::HostGroup,
                key: object.hostgroup_name.clone(),
            })?;
        Ok(super::bind_checked(
            &mut group.members,
            &member_checks,
            ObjectKind::HostGroup,
            &group.name,
            ObjectKind::Host,
        ))
    }
}

pub struct ContactGroupApplier;

impl Applier for ContactGroupApplier {
    type Object = group::ContactGroup;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .contact_groups
            .insert(object.key(), entity::ContactGroup::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::ContactGroup,
                key: object.contactgroup_name.clone(),
            })?;
        ctx.emit(
            EventKind::Created,
            ObjectKind::ContactGroup,
            &object.contactgroup_name,
        );
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let sink = ctx.sink;
        let group = ctx
            .registries
            .contact_groups
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::ContactGroup,
                key: object.contactgroup_name.clone(),
            })?;
        group.alias = object
            .alias
            .clone()
            .unwrap_or_else(|| object.contactgroup_name.clone());
        rebuild_members(
            sink,
            ObjectKind::ContactGroup,
            &object.contactgroup_name,
            &mut group.members,
            object.members.iter(),
        );
        ctx.emit(
            EventKind::Updated,
            ObjectKind::ContactGroup,
            &object.contactgroup_name,
        );
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.contact_groups.remove(&object.key()).is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::ContactGroup,
                &object.contactgroup_name,
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let member_checks: Vec<bool> = object
            .members
            .iter()
            .map(|name| registries.contacts.contains_key(name))
            .collect();
        let group = registries
            .contact_groups
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::ContactGroup,
                key: object.contactgroup_name.clone(),
            })?;
        Ok(super::bind_checked(
            &mut group.members,
            &member_checks,
            ObjectKind::ContactGroup,
            &group.name,
            ObjectKind::Contact,
        ))
    }
}

pub struct ServiceGroupApplier;

impl Applier for ServiceGroupApplier {
    type Object = group::ServiceGroup;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .service_groups
            .insert(object.key(), entity::ServiceGroup::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::ServiceGroup,
                key: object.servicegroup_name.clone(),
            })?;
        ctx.emit(
            EventKind::Created,
            ObjectKind::ServiceGroup,
            &object.servicegroup_name,
        );
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let sink = ctx.sink;
        let group = ctx
            .registries
            .service_groups
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::ServiceGroup,
                key: object.servicegroup_name.clone(),
            })?;
        group.alias = object
            .alias
            .clone()
            .unwrap_or_else(|| object.servicegroup_name.clone());

        let unchanged = group.members.len() == object.members.len()
            && group
                .members
                .iter()
                .zip(object.members.iter())
                .all(|(member, (host, desc))| {
                    member.host == *host && member.description == *desc
                });
        if !unchanged {
            for member in &group.members {
                sink.emit(Event::member(
                    EventKind::MemberUnlinked,
                    ObjectKind::ServiceGroup,
                    object.servicegroup_name.clone(),
                    pair_key(&member.key()),
                ));
            }
            group.members = object
                .members
                .iter()
                .map(|(host, desc)| {
                    sink.emit(Event::member(
                        EventKind::MemberLinked,
                        ObjectKind::ServiceGroup,
                        object.servicegroup_name.clone(),
                        format!("{host}/{desc}"),
                    ));
                    ServiceMemberRef::unbound(host, desc)
                })
                .collect();
        }
        ctx.emit(
            EventKind::Updated,
            ObjectKind::ServiceGroup,
            &object.servicegroup_name,
        );
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.service_groups.remove(&object.key()).is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::ServiceGroup,
                &object.servicegroup_name,
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let member_checks: Vec<bool> = object
            .members
            .iter()
            .map(|member| {
                registries
                    .services
                    .contains_key(&(member.0.clone(), member.1.clone()))
            })
            .collect();
        let group = registries
            .service_groups
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::ServiceGroup,
                key: object.servicegroup_name.clone(),
            })?;
        let mut dangling = 0;
        for (member, exists) in group.members.iter_mut().zip(&member_checks) {
            if *exists {
                member.bound = true;
            } else {
                member.bound = false;
                tracing::warn!(
                    object = %ObjectKind::ServiceGroup,
                    key = %group.name,
                    target = %ObjectKind::Service,
                    reference = %pair_key(&member.key()),
                    "dangling reference"
                );
                dangling += 1;
            }
        }
        Ok(dangling)
    }
}
