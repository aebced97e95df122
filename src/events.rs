//! Tracking events and the sinks they are emitted into.
//!
//! Components that emit analytics take an [`EventSink`] explicitly rather
//! than pushing into a process-wide queue.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackingEvent {
    PageView {
        page_path: String,
        page_title: String,
    },
    #[serde(rename = "custom_event")]
    Custom {
        event_category: String,
        event_action: String,
        #[serde(default)]
        event_label: Option<String>,
        #[serde(default)]
        event_value: Option<f64>,
    },
}

impl TrackingEvent {
    pub fn page_view(path: impl Into<String>, title: impl Into<String>) -> Self {
        TrackingEvent::PageView {
            page_path: path.into(),
            page_title: title.into(),
        }
    }

    pub fn custom(
        category: impl Into<String>,
        action: impl Into<String>,
        label: Option<String>,
        value: Option<f64>,
    ) -> Self {
        TrackingEvent::Custom {
            event_category: category.into(),
            event_action: action.into(),
            event_label: label,
            event_value: value,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: TrackingEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: TrackingEvent) {}
}

/// Logs each event at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: TrackingEvent) {
        tracing::debug!(?event, "tracking event");
    }
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TrackingEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<TrackingEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything emitted so far.
    pub fn drain(&self) -> Vec<TrackingEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: TrackingEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
