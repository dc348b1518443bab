//! Command and connector configuration objects.

use serde::{Deserialize, Serialize};

use crate::{
    object::{ConfigObject, ObjectKind, inherit_if_unset},
    template::Inherit,
};

/// A check or notification command, identified by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Command {
    pub command_name: String,
    pub command_line: Option<String>,
    /// Name of the connector this command is executed through, if any.
    pub connector: Option<String>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl ConfigObject for Command {
    type Key = String;

    const KIND: ObjectKind = ObjectKind::Command;

    fn key(&self) -> Self::Key {
        self.command_name.clone()
    }
}

impl Inherit for Command {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        inherit_if_unset(&mut self.command_line, &parent.command_line);
        inherit_if_unset(&mut self.connector, &parent.connector);
    }
}

/// An external process runner commands can be dispatched through.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connector {
    pub connector_name: String,
    pub connector_line: Option<String>,
    #[serde(default, rename = "use")]
    pub use_templates: Vec<String>,
}

impl ConfigObject for Connector {
    type Key = String;

    const KIND: ObjectKind = ObjectKind::Connector;

    fn key(&self) -> Self::Key {
        self.connector_name.clone()
    }
}

impl Inherit for Connector {
    fn template_names(&self) -> &[String] {
        &self.use_templates
    }

    fn merge(&mut self, parent: &Self) {
        inherit_if_unset(&mut self.connector_line, &parent.connector_line);
    }
}
