//! Applies expanded configuration states to live monitoring tables.
//!
//! The flow mirrors a daemon reload: parse and expand a [`vigil_config::State`],
//! hand it to a [`StateApplier`], and let the appliers translate the
//! difference against the previously applied state into live entity
//! mutations, followed by a full cross-reference resolution pass and an
//! optional retention merge.

pub mod apply;
pub mod entity;
pub mod event;
pub mod registry;
pub mod retention;

pub use apply::{ApplyReport, Phase, StateApplier};
pub use event::{Event, EventKind, EventSink, NullSink, RecordingSink};
pub use registry::{MultiRegistry, Registries, Registry};
pub use retention::RetentionState;
