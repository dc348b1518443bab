//! The live time period entity.

use std::collections::BTreeMap;

use vigil_config::timeperiod;

use super::{NamedRef, sync_refs};

#[derive(Clone, Debug)]
pub struct TimePeriod {
    pub name: String,
    pub alias: String,
    pub ranges: BTreeMap<String, String>,
    pub exclusions: Vec<NamedRef>,
}

impl TimePeriod {
    pub fn from_config(cfg: &timeperiod::TimePeriod) -> Self {
        let mut live = Self {
            name: cfg.timeperiod_name.clone(),
            alias: String::new(),
            ranges: BTreeMap::new(),
            exclusions: Vec::new(),
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &timeperiod::TimePeriod) {
        self.alias = cfg
            .alias
            .clone()
            .unwrap_or_else(|| cfg.timeperiod_name.clone());
        self.ranges = cfg.ranges.clone();
        sync_refs(&mut self.exclusions, cfg.exclusions.iter());
    }
}
