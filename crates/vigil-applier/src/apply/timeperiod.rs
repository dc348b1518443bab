//! Time period applier.

use snafu::OptionExt;
use vigil_config::{ConfigObject, ObjectKind, timeperiod};

use super::{Applier, ApplyContext, Error, NotFoundSnafu, bind_checked};
use crate::{entity, event::EventKind, registry::Registries};

pub struct TimePeriodApplier;

impl Applier for TimePeriodApplier {
    type Object = timeperiod::TimePeriod;

    fn add_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        ctx.registries
            .time_periods
            .insert(object.key(), entity::TimePeriod::from_config(object))
            .map_err(|_| Error::AlreadyExists {
                kind: ObjectKind::TimePeriod,
                key: object.timeperiod_name.clone(),
            })?;
        ctx.emit(
            EventKind::Created,
            ObjectKind::TimePeriod,
            &object.timeperiod_name,
        );
        Ok(())
    }

    fn modify_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        let period = ctx
            .registries
            .time_periods
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::TimePeriod,
                key: object.timeperiod_name.clone(),
            })?;
        period.update_from(object);
        ctx.emit(
            EventKind::Updated,
            ObjectKind::TimePeriod,
            &object.timeperiod_name,
        );
        Ok(())
    }

    fn remove_object(&self, ctx: &mut ApplyContext, object: &Self::Object) -> Result<(), Error> {
        if ctx.registries.time_periods.remove(&object.key()).is_some() {
            ctx.emit(
                EventKind::Removed,
                ObjectKind::TimePeriod,
                &object.timeperiod_name,
            );
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        registries: &mut Registries,
        object: &Self::Object,
    ) -> Result<u32, Error> {
        let exclusion_checks: Vec<bool> = object
            .exclusions
            .iter()
            .map(|name| registries.time_periods.contains_key(name))
            .collect();
        let period = registries
            .time_periods
            .get_mut(&object.key())
            .context(NotFoundSnafu {
                kind: ObjectKind::TimePeriod,
                key: object.timeperiod_name.clone(),
            })?;
        Ok(bind_checked(
            &mut period.exclusions,
            &exclusion_checks,
            ObjectKind::TimePeriod,
            &period.name,
            ObjectKind::TimePeriod,
        ))
    }
}
