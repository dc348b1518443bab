//! Lifecycle event surface.
//!
//! The appliers emit one event per observable change to the live tables:
//! creations, updates, removals, and individual member link changes on
//! groups. Sinks are infallible; a sink that cannot deliver must handle that
//! itself.

use std::{
    sync::{Mutex, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

use vigil_config::ObjectKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Removed,
    MemberLinked,
    MemberUnlinked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub object: ObjectKind,
    /// Display form of the object key.
    pub key: String,
    /// The affected member, for member link events.
    pub member: Option<String>,
    /// Seconds since the Unix epoch at emission.
    pub timestamp: u64,
}

impl Event {
    pub fn new(kind: EventKind, object: ObjectKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            object,
            key: key.into(),
            member: None,
            timestamp: unix_now(),
        }
    }

    pub fn member(
        kind: EventKind,
        object: ObjectKind,
        key: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            object,
            key: key.into(),
            member: Some(member.into()),
            timestamp: unix_now(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Receives lifecycle events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Collects events in memory, mainly for tests and audit captures.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    /// Returns a copy of everything emitted so far.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_preserves_emission_order() {
        let sink = RecordingSink::default();
        sink.emit(Event::new(EventKind::Created, ObjectKind::Host, "web"));
        sink.emit(Event::member(
            EventKind::MemberLinked,
            ObjectKind::HostGroup,
            "frontend",
            "web",
        ));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Created);
        assert_eq!(events[1].member.as_deref(), Some("web"));
    }
}
