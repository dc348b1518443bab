//! Live command and connector entities.

use vigil_config::command;

use super::{NamedRef, sync_opt_ref};

#[derive(Clone, Debug)]
pub struct Command {
    pub name: String,
    pub command_line: String,
    pub connector: Option<NamedRef>,
}

impl Command {
    pub fn from_config(cfg: &command::Command) -> Self {
        let mut live = Self {
            name: cfg.command_name.clone(),
            command_line: String::new(),
            connector: None,
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &command::Command) {
        self.command_line = cfg.command_line.clone().unwrap_or_default();
        sync_opt_ref(&mut self.connector, cfg.connector.as_ref());
    }
}

#[derive(Clone, Debug)]
pub struct Connector {
    pub name: String,
    pub connector_line: String,
}

impl Connector {
    pub fn from_config(cfg: &command::Connector) -> Self {
        let mut live = Self {
            name: cfg.connector_name.clone(),
            connector_line: String::new(),
        };
        live.update_from(cfg);
        live
    }

    pub fn update_from(&mut self, cfg: &command::Connector) {
        self.connector_line = cfg.connector_line.clone().unwrap_or_default();
    }
}
