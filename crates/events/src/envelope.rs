use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Event;

/// Envelope for a published event.
///
/// The envelope carries publication metadata (a unique id and the publish
/// time) so listeners can correlate log lines without inspecting the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    published_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, published_at: DateTime<Utc>, payload: E) -> Self {
        Self {
            event_id,
            published_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap an event with a fresh id, stamped now.
    pub fn wrap(payload: E) -> Self {
        Self::new(Uuid::now_v7(), Utc::now(), payload)
    }

    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
