//! Time period configuration objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    template::Inherit,
};

/// A named calendar of time ranges, referenced by hosts, services, contacts
/// and escalations for check and notification windows.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimePeriod {
    pub timeperiod_name: String,
    pub alias: Option<String>,
    /// Day (or calendar date expression) to time-range string, e.g.
    /// `monday` -> `09:00-17:00`.
    pub ranges: BTreeMap<String, String>,
    /// Names of time periods excluded from this one.
    pub exclusions: InheritableList,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl ConfigObject for TimePeriod {
    type Key = String;

    const KIND: ObjectKind = ObjectKind::TimePeriod;

    fn key(&self) -> Self::Key {
        self.timeperiod_name.clone()
    }
}

impl Inherit for TimePeriod {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        inherit_if_unset(&mut self.alias, &parent.alias);
        if self.ranges.is_empty() {
            self.ranges = parent.ranges.clone();
        }
        self.exclusions.inherit(&parent.exclusions);
    }
}
