//! Nested artboards.
//!
//! A [`NestedArtboard`] component embeds another artboard of the same file:
//! at design time only a reference (`artboard_id`), at runtime an owned
//! instance. Child components of the nest describe what runs inside it:
//! nested animations (simple, remap, state machine) advanced every parent
//! frame, and nested inputs re-exposing inner state-machine inputs to the
//! outer world.

use crate::animation::LinearAnimationInstance;
use crate::artboard::Artboard;
use crate::core::component::{Component, Dirt, SetOutcome};
use crate::core::registry::{PropertyValue, properties};
use crate::machine::instance::StateMachineInstance;
use crate::node::{Drawable, Node};

/// Drawable component hosting an embedded artboard instance.
#[derive(Debug, Clone, Default)]
pub struct NestedArtboard {
    pub node: Node,
    pub drawable: Drawable,
    /// Index of the source artboard in the owning file.
    pub artboard_id: Option<u32>,
    /// The embedded instance; populated on artboard instances only.
    pub(crate) inner: Option<Box<Artboard>>,
    /// Runtime state of the child nested-animation components.
    pub(crate) runtime: Vec<NestedAnimationRuntime>,
}

impl NestedArtboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn inner(&self) -> Option<&Artboard> {
        self.inner.as_deref()
    }

    #[must_use]
    pub fn inner_mut(&mut self) -> Option<&mut Artboard> {
        self.inner.as_deref_mut()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_ARTBOARD_ID, PropertyValue::Uint(v)) => {
                self.artboard_id = Some(*v as u32);
                SetOutcome::changed(Dirt::empty(), false)
            }
            _ => {
                let outcome = self.drawable.set(key, value);
                if outcome == SetOutcome::Unknown {
                    self.node.set(key, value)
                } else {
                    outcome
                }
            }
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_ARTBOARD_ID => {
                self.artboard_id.map(|id| PropertyValue::Uint(u64::from(id)))
            }
            _ => self.drawable.get(key).or_else(|| self.node.get(key)),
        }
    }
}

/// Per-instance playback state for one nested-animation definition.
#[derive(Debug, Clone)]
pub(crate) enum NestedAnimationRuntime {
    Simple {
        def_id: u32,
        instance: LinearAnimationInstance,
    },
    Remap {
        def_id: u32,
        instance: LinearAnimationInstance,
    },
    Machine {
        def_id: u32,
        instance: StateMachineInstance,
    },
}

impl NestedAnimationRuntime {
    pub(crate) fn def_id(&self) -> u32 {
        match self {
            NestedAnimationRuntime::Simple { def_id, .. }
            | NestedAnimationRuntime::Remap { def_id, .. }
            | NestedAnimationRuntime::Machine { def_id, .. } => *def_id,
        }
    }
}

/// A linear animation played inside the nest at its own speed.
#[derive(Debug, Clone)]
pub struct NestedSimpleAnimation {
    pub component: Component,
    pub animation_id: u32,
    pub speed: f32,
    pub is_playing: bool,
    pub mix: f32,
}

impl NestedSimpleAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            component: Component::new(),
            animation_id: 0,
            speed: 1.0,
            is_playing: false,
            mix: 1.0,
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_ANIMATION_ID, PropertyValue::Uint(v)) => {
                self.animation_id = *v as u32;
            }
            (properties::NESTED_ANIMATION_SPEED, PropertyValue::Float(v)) => self.speed = *v,
            (properties::NESTED_ANIMATION_IS_PLAYING, PropertyValue::Bool(v)) => {
                self.is_playing = *v;
            }
            (properties::NESTED_ANIMATION_MIX, PropertyValue::Float(v)) => self.mix = *v,
            _ => return self.component.set(key, value),
        }
        SetOutcome::changed(Dirt::empty(), false)
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_ANIMATION_ID => {
                Some(PropertyValue::Uint(u64::from(self.animation_id)))
            }
            properties::NESTED_ANIMATION_SPEED => Some(PropertyValue::Float(self.speed)),
            properties::NESTED_ANIMATION_IS_PLAYING => Some(PropertyValue::Bool(self.is_playing)),
            properties::NESTED_ANIMATION_MIX => Some(PropertyValue::Float(self.mix)),
            _ => self.component.get(key),
        }
    }
}

impl Default for NestedSimpleAnimation {
    fn default() -> Self {
        Self::new()
    }
}

/// A linear animation whose cursor is driven by a normalized `time` value
/// instead of the clock.
#[derive(Debug, Clone)]
pub struct NestedRemapAnimation {
    pub component: Component,
    pub animation_id: u32,
    pub mix: f32,
    /// Normalized position in [0, 1] over the animation's work area.
    pub time: f32,
}

impl NestedRemapAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            component: Component::new(),
            animation_id: 0,
            mix: 1.0,
            time: 0.0,
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_ANIMATION_ID, PropertyValue::Uint(v)) => {
                self.animation_id = *v as u32;
            }
            (properties::NESTED_ANIMATION_MIX, PropertyValue::Float(v)) => self.mix = *v,
            (properties::NESTED_ANIMATION_TIME, PropertyValue::Float(v)) => self.time = *v,
            _ => return self.component.set(key, value),
        }
        SetOutcome::changed(Dirt::empty(), false)
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_ANIMATION_ID => {
                Some(PropertyValue::Uint(u64::from(self.animation_id)))
            }
            properties::NESTED_ANIMATION_MIX => Some(PropertyValue::Float(self.mix)),
            properties::NESTED_ANIMATION_TIME => Some(PropertyValue::Float(self.time)),
            _ => self.component.get(key),
        }
    }
}

impl Default for NestedRemapAnimation {
    fn default() -> Self {
        Self::new()
    }
}

/// A state machine running inside the nest.
#[derive(Debug, Clone, Default)]
pub struct NestedStateMachine {
    pub component: Component,
    /// Index of the state machine in the inner artboard.
    pub animation_id: u32,
}

impl NestedStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_ANIMATION_ID, PropertyValue::Uint(v)) => {
                self.animation_id = *v as u32;
                SetOutcome::changed(Dirt::empty(), false)
            }
            _ => self.component.set(key, value),
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_ANIMATION_ID => {
                Some(PropertyValue::Uint(u64::from(self.animation_id)))
            }
            _ => self.component.get(key),
        }
    }
}

/// Re-exposes a boolean input of the nested state machine. The parent of a
/// nested input is the [`NestedStateMachine`] it belongs to; `input_id`
/// indexes that machine's input list.
#[derive(Debug, Clone, Default)]
pub struct NestedBool {
    pub component: Component,
    pub input_id: u32,
    pub nested_value: bool,
    /// Set when the value changed and has not yet been pushed into the
    /// inner machine.
    pub(crate) value_dirty: bool,
}

impl NestedBool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_INPUT_ID, PropertyValue::Uint(v)) => {
                self.input_id = *v as u32;
                SetOutcome::changed(Dirt::empty(), false)
            }
            (properties::NESTED_VALUE_BOOL, PropertyValue::Bool(v)) => {
                if self.nested_value == *v {
                    return SetOutcome::Unchanged;
                }
                self.nested_value = *v;
                self.value_dirty = true;
                SetOutcome::changed(Dirt::empty(), false)
            }
            _ => self.component.set(key, value),
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_INPUT_ID => Some(PropertyValue::Uint(u64::from(self.input_id))),
            properties::NESTED_VALUE_BOOL => Some(PropertyValue::Bool(self.nested_value)),
            _ => self.component.get(key),
        }
    }
}

/// Re-exposes a number input of the nested state machine.
#[derive(Debug, Clone, Default)]
pub struct NestedNumber {
    pub component: Component,
    pub input_id: u32,
    pub nested_value: f32,
    pub(crate) value_dirty: bool,
}

impl NestedNumber {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_INPUT_ID, PropertyValue::Uint(v)) => {
                self.input_id = *v as u32;
                SetOutcome::changed(Dirt::empty(), false)
            }
            (properties::NESTED_VALUE_NUMBER, PropertyValue::Float(v)) => {
                if self.nested_value == *v {
                    return SetOutcome::Unchanged;
                }
                self.nested_value = *v;
                self.value_dirty = true;
                SetOutcome::changed(Dirt::empty(), false)
            }
            _ => self.component.set(key, value),
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_INPUT_ID => Some(PropertyValue::Uint(u64::from(self.input_id))),
            properties::NESTED_VALUE_NUMBER => Some(PropertyValue::Float(self.nested_value)),
            _ => self.component.get(key),
        }
    }
}

/// Re-exposes a trigger input of the nested state machine. The `fire`
/// property is a callback: keyframes crossing it queue a pending fire.
#[derive(Debug, Clone, Default)]
pub struct NestedTrigger {
    pub component: Component,
    pub input_id: u32,
    pub(crate) pending_fire: bool,
}

impl NestedTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NESTED_INPUT_ID, PropertyValue::Uint(v)) => {
                self.input_id = *v as u32;
                SetOutcome::changed(Dirt::empty(), false)
            }
            _ => self.component.set(key, value),
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NESTED_INPUT_ID => Some(PropertyValue::Uint(u64::from(self.input_id))),
            _ => self.component.get(key),
        }
    }
}
