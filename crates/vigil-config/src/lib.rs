//! Configuration-side building blocks of the Vigil reconciliation pipeline:
//! per-kind configuration objects, ordered configuration sets, template and
//! group expansion, and the generic difference engine.
//!
//! The line-oriented parser is an external collaborator: it produces the
//! typed objects defined here and feeds them into a [`state::State`]. The
//! applier crate consumes expanded states and reconciles them against the
//! live object graph.

pub mod command;
pub mod contact;
pub mod dependency;
pub mod diff;
pub mod escalation;
pub mod expand;
pub mod group;
pub mod host;
pub mod object;
pub mod service;
pub mod set;
pub mod state;
pub mod template;
pub mod timeperiod;
pub mod validation;

pub use diff::Difference;
pub use object::{ConfigObject, InheritableList, ObjectKind};
pub use set::OrderedSet;
pub use state::State;
