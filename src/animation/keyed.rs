//! Keyed animation data: one keyframe list per (object, property).

use crate::animation::KeyedCallbackReporter;
use crate::animation::keyframe::{Interpolation, KeyFrame, KeyFrameValue};
use crate::artboard::Artboard;
use crate::core::registry;
use crate::math::{lerp, lerp_color};

/// The sorted keyframe list for one property of one object. Non-empty;
/// strictly ordered by seconds. Both invariants are established by the
/// loader.
#[derive(Debug, Clone)]
pub struct KeyedProperty {
    pub property_key: u16,
    pub keyframes: Vec<KeyFrame>,
}

impl KeyedProperty {
    #[must_use]
    pub fn new() -> Self {
        Self {
            property_key: 0,
            keyframes: Vec::new(),
        }
    }

    /// Index of the first keyframe at or after `seconds`.
    fn closest_frame_index(&self, seconds: f32) -> usize {
        self.keyframes.partition_point(|kf| kf.seconds < seconds)
    }

    /// Applies this property's value at `seconds` to `object_id`, blended
    /// with weight `mix`.
    pub(crate) fn apply(&self, artboard: &mut Artboard, object_id: u32, seconds: f32, mix: f32) {
        debug_assert!(!self.keyframes.is_empty());
        let frames = &self.keyframes;
        let count = frames.len();
        let idx = self.closest_frame_index(seconds);

        if idx == 0 {
            self.write(artboard, object_id, frames[0].value, mix);
        } else if idx < count {
            let from = &frames[idx - 1];
            let to = &frames[idx];
            if seconds == to.seconds {
                self.write(artboard, object_id, to.value, mix);
            } else if from.interpolation == Interpolation::Hold {
                self.write(artboard, object_id, from.value, mix);
            } else {
                self.interpolate(artboard, object_id, from, to, seconds, mix);
            }
        } else {
            self.write(artboard, object_id, frames[count - 1].value, mix);
        }
    }

    fn interpolate(
        &self,
        artboard: &mut Artboard,
        object_id: u32,
        from: &KeyFrame,
        to: &KeyFrame,
        seconds: f32,
        mix: f32,
    ) {
        let range = to.seconds - from.seconds;
        let factor = if range > 0.0 {
            ((seconds - from.seconds) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let value = match (from.value, to.value) {
            (KeyFrameValue::Float(a), KeyFrameValue::Float(b)) => {
                let v = match self.resolve_interpolator(artboard, from) {
                    Some(interpolator) if from.interpolation == Interpolation::Cubic => {
                        interpolator.transform_value(a, b, factor)
                    }
                    _ => lerp(a, b, factor),
                };
                KeyFrameValue::Float(v)
            }
            (KeyFrameValue::Color(a), KeyFrameValue::Color(b)) => {
                let eased = match self.resolve_interpolator(artboard, from) {
                    Some(interpolator) if from.interpolation == Interpolation::Cubic => {
                        interpolator.transform(factor)
                    }
                    _ => factor,
                };
                KeyFrameValue::Color(lerp_color(a, b, eased))
            }
            // Id and bool keyframes hold their value.
            _ => from.value,
        };
        self.write(artboard, object_id, value, mix);
    }

    fn resolve_interpolator<'a>(
        &self,
        artboard: &'a Artboard,
        frame: &KeyFrame,
    ) -> Option<&'a crate::animation::interpolator::CubicInterpolator> {
        artboard.interpolator(frame.interpolator_id?)
    }

    fn write(&self, artboard: &mut Artboard, object_id: u32, value: KeyFrameValue, mix: f32) {
        match value {
            KeyFrameValue::Float(v) => artboard.write_keyed_f32(object_id, self.property_key, v, mix),
            KeyFrameValue::Color(v) => {
                artboard.write_keyed_color(object_id, self.property_key, v, mix);
            }
            KeyFrameValue::Id(v) => artboard.write_keyed_uint(object_id, self.property_key, u64::from(v)),
            KeyFrameValue::Bool(v) => artboard.write_keyed_bool(object_id, self.property_key, v),
            KeyFrameValue::Callback => {}
        }
    }

    /// Reports callback keyframes crossed by the cursor moving from
    /// `seconds_from` to `seconds_to`. The reported delay is the distance
    /// between the destination cursor and the keyframe.
    pub(crate) fn report_keyed_callbacks(
        &self,
        reporter: &mut dyn KeyedCallbackReporter,
        object_id: u32,
        seconds_from: f32,
        seconds_to: f32,
        is_at_start_frame: bool,
    ) {
        if seconds_from == seconds_to {
            return;
        }
        let forward = seconds_from < seconds_to;
        for frame in &self.keyframes {
            let crossed = if forward {
                let after_start = if is_at_start_frame {
                    frame.seconds >= seconds_from
                } else {
                    frame.seconds > seconds_from
                };
                after_start && frame.seconds <= seconds_to
            } else {
                let before_start = if is_at_start_frame {
                    frame.seconds <= seconds_from
                } else {
                    frame.seconds < seconds_from
                };
                before_start && frame.seconds >= seconds_to
            };
            if crossed {
                let elapsed = (seconds_to - frame.seconds).abs();
                reporter.report_keyed_callback(object_id, self.property_key, elapsed);
            }
        }
    }
}

impl Default for KeyedProperty {
    fn default() -> Self {
        Self::new()
    }
}

/// The keyframe lists for all keyed properties of one object.
#[derive(Debug, Clone, Default)]
pub struct KeyedObject {
    pub object_id: u32,
    pub keyed_properties: Vec<KeyedProperty>,
}

impl KeyedObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn apply(&self, artboard: &mut Artboard, seconds: f32, mix: f32) {
        for property in &self.keyed_properties {
            if registry::is_callback(property.property_key) {
                continue;
            }
            property.apply(artboard, self.object_id, seconds, mix);
        }
    }

    pub(crate) fn report_keyed_callbacks(
        &self,
        reporter: &mut dyn KeyedCallbackReporter,
        seconds_from: f32,
        seconds_to: f32,
        is_at_start_frame: bool,
    ) {
        for property in &self.keyed_properties {
            if !registry::is_callback(property.property_key) {
                continue;
            }
            property.report_keyed_callbacks(
                reporter,
                self.object_id,
                seconds_from,
                seconds_to,
                is_at_start_frame,
            );
        }
    }
}
