//! Linear animation definitions.
//!
//! A `LinearAnimation` is a timeline of keyframes over multiple object
//! properties. Definitions are immutable after import and shared between a
//! source artboard and its instances through `Arc`; playback state lives in
//! [`LinearAnimationInstance`](crate::animation::LinearAnimationInstance).

use crate::animation::KeyedCallbackReporter;
use crate::animation::keyed::KeyedObject;
use crate::artboard::Artboard;
use crate::core::registry::{PropertyValue, properties};

/// What happens when the time cursor reaches the end of the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Clamp at the boundary and stop.
    #[default]
    OneShot,
    /// Wrap back to the start.
    Loop,
    /// Reflect and reverse direction.
    PingPong,
}

impl LoopMode {
    #[must_use]
    pub fn from_u32(value: u32) -> LoopMode {
        match value {
            1 => LoopMode::Loop,
            2 => LoopMode::PingPong,
            _ => LoopMode::OneShot,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearAnimation {
    pub name: String,
    pub fps: u32,
    /// Duration in frames.
    pub duration: u32,
    pub speed: f32,
    pub loop_mode: LoopMode,
    pub work_start: u32,
    pub work_end: u32,
    pub enable_work_area: bool,
    pub keyed_objects: Vec<KeyedObject>,
}

impl LinearAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            fps: 60,
            duration: 60,
            speed: 1.0,
            loop_mode: LoopMode::default(),
            work_start: 0,
            work_end: 0,
            enable_work_area: false,
            keyed_objects: Vec::new(),
        }
    }

    /// First playable second of the work area.
    #[must_use]
    pub fn start_seconds(&self) -> f32 {
        let frame = if self.enable_work_area { self.work_start } else { 0 };
        frame as f32 / self.fps.max(1) as f32
    }

    /// Last playable second of the work area.
    #[must_use]
    pub fn end_seconds(&self) -> f32 {
        let frame = if self.enable_work_area { self.work_end } else { self.duration };
        frame as f32 / self.fps.max(1) as f32
    }

    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.end_seconds() - self.start_seconds()
    }

    /// Maps a global offset (seconds from the start of the work area) into a
    /// local cursor position, honoring the loop mode.
    #[must_use]
    pub fn global_to_local_seconds(&self, seconds: f32) -> f32 {
        let start = self.start_seconds();
        let end = self.end_seconds();
        let range = end - start;
        if range <= 0.0 {
            return start;
        }
        match self.loop_mode {
            LoopMode::OneShot => (start + seconds).clamp(start, end),
            LoopMode::Loop => start + seconds.rem_euclid(range),
            LoopMode::PingPong => {
                let phase = seconds.rem_euclid(range * 2.0);
                if phase > range {
                    start + (range * 2.0 - phase)
                } else {
                    start + phase
                }
            }
        }
    }

    /// Writes every keyed property at `time` with blend weight `mix`.
    pub fn apply(&self, artboard: &mut Artboard, time: f32, mix: f32) {
        for keyed_object in &self.keyed_objects {
            keyed_object.apply(artboard, time, mix);
        }
    }

    pub(crate) fn report_keyed_callbacks(
        &self,
        reporter: &mut dyn KeyedCallbackReporter,
        seconds_from: f32,
        seconds_to: f32,
        is_at_start_frame: bool,
    ) {
        for keyed_object in &self.keyed_objects {
            keyed_object.report_keyed_callbacks(
                reporter,
                seconds_from,
                seconds_to,
                is_at_start_frame,
            );
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::ANIMATION_NAME, PropertyValue::Str(v)) => self.name = v.clone(),
            (properties::ANIMATION_FPS, PropertyValue::Uint(v)) => self.fps = *v as u32,
            (properties::ANIMATION_DURATION, PropertyValue::Uint(v)) => self.duration = *v as u32,
            (properties::ANIMATION_SPEED, PropertyValue::Float(v)) => self.speed = *v,
            (properties::ANIMATION_LOOP, PropertyValue::Uint(v)) => {
                self.loop_mode = LoopMode::from_u32(*v as u32);
            }
            (properties::ANIMATION_WORK_START, PropertyValue::Uint(v)) => {
                self.work_start = *v as u32;
            }
            (properties::ANIMATION_WORK_END, PropertyValue::Uint(v)) => self.work_end = *v as u32,
            (properties::ANIMATION_ENABLE_WORK_AREA, PropertyValue::Bool(v)) => {
                self.enable_work_area = *v;
            }
            _ => return false,
        }
        true
    }
}

impl Default for LinearAnimation {
    fn default() -> Self {
        Self::new()
    }
}
