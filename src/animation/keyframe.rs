//! Keyframes.
//!
//! A keyframe holds an integer frame index, an interpolation mode, an
//! optional interpolator reference and a typed value. Seconds are derived
//! from the owning animation's fps when the keyframe is attached during
//! import.

use crate::core::registry::{PropertyValue, properties, types};

/// How the interval starting at a keyframe reaches the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Value holds until the next keyframe.
    Hold,
    #[default]
    Linear,
    /// Eased through a referenced cubic interpolator.
    Cubic,
}

impl Interpolation {
    #[must_use]
    pub fn from_u32(value: u32) -> Interpolation {
        match value {
            0 => Interpolation::Hold,
            2 => Interpolation::Cubic,
            _ => Interpolation::Linear,
        }
    }
}

/// The typed payload of a keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyFrameValue {
    Float(f32),
    Color(u32),
    /// Object-id valued keyframes (e.g. enum ids) never interpolate.
    Id(u32),
    Bool(bool),
    /// Callback keyframes carry no value; they fire when crossed.
    Callback,
}

#[derive(Debug, Clone)]
pub struct KeyFrame {
    pub frame: u32,
    /// `frame / animation.fps`, filled in at import.
    pub seconds: f32,
    pub interpolation: Interpolation,
    pub interpolator_id: Option<u32>,
    pub value: KeyFrameValue,
}

impl KeyFrame {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        let value = match type_key {
            types::KEYFRAME_COLOR => KeyFrameValue::Color(0),
            types::KEYFRAME_ID => KeyFrameValue::Id(0),
            types::KEYFRAME_BOOL => KeyFrameValue::Bool(false),
            types::KEYFRAME_CALLBACK => KeyFrameValue::Callback,
            _ => KeyFrameValue::Float(0.0),
        };
        Self {
            frame: 0,
            seconds: 0.0,
            interpolation: Interpolation::default(),
            interpolator_id: None,
            value,
        }
    }

    pub(crate) fn compute_seconds(&mut self, fps: f32) {
        self.seconds = self.frame as f32 / fps.max(1.0);
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::KEYFRAME_FRAME, PropertyValue::Uint(v)) => {
                self.frame = *v as u32;
            }
            (properties::KEYFRAME_INTERPOLATION, PropertyValue::Uint(v)) => {
                self.interpolation = Interpolation::from_u32(*v as u32);
            }
            (properties::KEYFRAME_INTERPOLATOR_ID, PropertyValue::Uint(v)) => {
                self.interpolator_id = Some(*v as u32);
            }
            (properties::KEYFRAME_VALUE_DOUBLE, PropertyValue::Float(v)) => {
                self.value = KeyFrameValue::Float(*v);
            }
            (properties::KEYFRAME_VALUE_COLOR, PropertyValue::Color(v)) => {
                self.value = KeyFrameValue::Color(*v);
            }
            (properties::KEYFRAME_VALUE_ID, PropertyValue::Uint(v)) => {
                self.value = KeyFrameValue::Id(*v as u32);
            }
            (properties::KEYFRAME_VALUE_BOOL, PropertyValue::Bool(v)) => {
                self.value = KeyFrameValue::Bool(*v);
            }
            _ => return false,
        }
        true
    }
}
