//! Host, service and contact group configuration objects.
//!
//! All three group kinds share the same shape: a direct member list plus a
//! nested sub-group list that the expansion pass flattens away.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{
    object::{ConfigObject, InheritableList, ObjectKind, inherit_if_unset},
    template::Inherit,
};

/// Common surface of the three group kinds, used by the generic group
/// flattening in the expansion pass.
pub trait GroupObject: ConfigObject {
    /// The member identity type: a name, or a (host, service) pair.
    type Member: Ord + Clone + Debug;

    fn group_name(&self) -> &str;
    fn members(&self) -> &InheritableList<Self::Member>;
    fn members_mut(&mut self) -> &mut InheritableList<Self::Member>;
    /// Names of nested sub-groups.
    fn group_members(&self) -> &InheritableList;
    fn group_members_mut(&mut self) -> &mut InheritableList;
}

macro_rules! group_kind {
    ($(#[$doc:meta])* $name:ident, $key_field:ident, $members_field:ident, $group_members_field:ident, $member:ty, $kind:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            pub $key_field: String,
            pub alias: Option<String>,
            pub $members_field: InheritableList<$member>,
            pub $group_members_field: InheritableList,
            #[serde(default, rename = "use")]
            pub use_templates: Vec<String>,
        }

        impl ConfigObject for $name {
            type Key = String;

            const KIND: ObjectKind = $kind;

            fn key(&self) -> Self::Key {
                self.$key_field.clone()
            }
        }

        impl Inherit for $name {
            fn template_names(&self) -> &[String] {
                &self.use_templates
            }

            fn merge(&mut self, parent: &Self) {
                inherit_if_unset(&mut self.alias, &parent.alias);
                self.$members_field.inherit(&parent.$members_field);
                self.$group_members_field.inherit(&parent.$group_members_field);
            }
        }

        impl GroupObject for $name {
            type Member = $member;

            fn group_name(&self) -> &str {
                &self.$key_field
            }

            fn members(&self) -> &InheritableList<Self::Member> {
                &self.$members_field
            }

            fn members_mut(&mut self) -> &mut InheritableList<Self::Member> {
                &mut self.$members_field
            }

            fn group_members(&self) -> &InheritableList {
                &self.$group_members_field
            }

            fn group_members_mut(&mut self) -> &mut InheritableList {
                &mut self.$group_members_field
            }
        }
    };
}

group_kind!(
    /// A named group of hosts. Members are host names.
    HostGroup,
    hostgroup_name,
    members,
    hostgroup_members,
    String,
    ObjectKind::HostGroup
);

group_kind!(
    /// A named group of services. Members are (host name, service
    /// description) pairs.
    ServiceGroup,
    servicegroup_name,
    members,
    servicegroup_members,
    (String, String),
    ObjectKind::ServiceGroup
);

group_kind!(
    /// A named group of contacts. Members are contact names.
    ContactGroup,
    contactgroup_name,
    members,
    contactgroup_members,
    String,
    ObjectKind::ContactGroup
);
