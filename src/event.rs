//! User-defined events reported upward from state machines to the host.

use std::sync::Arc;

use crate::audio::AudioSource;
use crate::core::component::{Component, SetOutcome};
use crate::core::registry::{PropertyValue, properties};

/// A named event object living in the artboard's object table. Fired by
/// listeners, transitions, states or callback keyframes.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub component: Component,
}

impl Event {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.component.name
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        self.component.set(key, value)
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        self.component.get(key)
    }
}

/// An event that additionally plays a referenced audio asset when fired.
#[derive(Debug, Clone, Default)]
pub struct AudioEvent {
    pub event: Event,
    pub asset_id: u32,
    /// Decoded source, resolved against the file's asset list after import.
    pub(crate) source: Option<Arc<AudioSource>>,
}

impl AudioEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::AUDIO_EVENT_ASSET_ID, PropertyValue::Uint(v)) => {
                self.asset_id = *v as u32;
                SetOutcome::changed(crate::core::component::Dirt::empty(), false)
            }
            _ => self.event.set(key, value),
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::AUDIO_EVENT_ASSET_ID => {
                Some(PropertyValue::Uint(u64::from(self.asset_id)))
            }
            _ => self.event.get(key),
        }
    }
}

/// An event queued on a state-machine instance for the host to drain.
#[derive(Debug, Clone)]
pub struct ReportedEvent {
    /// Local id of the event object in the artboard.
    pub event_id: u32,
    /// Name of the event object, resolved at report time.
    pub name: String,
    /// How far in the past the event logically occurred, in seconds.
    pub seconds_delay: f32,
}
