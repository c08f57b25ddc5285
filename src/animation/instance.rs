//! Linear animation playback state.

use std::sync::Arc;

use crate::animation::KeyedCallbackReporter;
use crate::animation::linear::{LinearAnimation, LoopMode};
use crate::artboard::Artboard;

/// A time cursor over a shared [`LinearAnimation`] definition.
///
/// Owns everything that changes during playback: the cursor, the play
/// direction, loop bookkeeping and the monotonic total-time counters used
/// by state-machine exit times.
#[derive(Debug, Clone)]
pub struct LinearAnimationInstance {
    animation: Arc<LinearAnimation>,
    time: f32,
    total_time: f32,
    last_total_time: f32,
    direction: f32,
    did_loop: bool,
}

impl LinearAnimationInstance {
    #[must_use]
    pub fn new(animation: Arc<LinearAnimation>) -> Self {
        let time = if animation.speed >= 0.0 {
            animation.start_seconds()
        } else {
            animation.end_seconds()
        };
        Self {
            animation,
            time,
            total_time: 0.0,
            last_total_time: 0.0,
            direction: 1.0,
            did_loop: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn animation(&self) -> &Arc<LinearAnimation> {
        &self.animation
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Moves the cursor, resetting loop and total-time bookkeeping.
    pub fn set_time(&mut self, value: f32) {
        if self.time == value {
            return;
        }
        self.time = value;
        self.total_time = value - self.animation.start_seconds();
        self.last_total_time = self.total_time;
        self.direction = 1.0;
        self.did_loop = false;
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> f32 {
        self.direction
    }

    #[inline]
    #[must_use]
    pub fn did_loop(&self) -> bool {
        self.did_loop
    }

    #[inline]
    #[must_use]
    pub(crate) fn total_time(&self) -> f32 {
        self.total_time
    }

    #[inline]
    #[must_use]
    pub(crate) fn last_total_time(&self) -> f32 {
        self.last_total_time
    }

    /// Advances the cursor by `elapsed_seconds` scaled by the animation
    /// speed and the instance direction. Returns whether the animation can
    /// still make progress (a clamped one-shot cannot).
    pub fn advance(&mut self, elapsed_seconds: f32) -> bool {
        self.advance_internal(elapsed_seconds, None)
    }

    /// Like [`advance`](Self::advance), additionally reporting callback
    /// keyframes crossed by the cursor.
    pub fn advance_reporting(
        &mut self,
        elapsed_seconds: f32,
        reporter: &mut dyn KeyedCallbackReporter,
    ) -> bool {
        self.advance_internal(elapsed_seconds, Some(reporter))
    }

    fn advance_internal(
        &mut self,
        elapsed_seconds: f32,
        mut reporter: Option<&mut dyn KeyedCallbackReporter>,
    ) -> bool {
        let animation = Arc::clone(&self.animation);
        let delta = elapsed_seconds * animation.speed * self.direction;

        self.last_total_time = self.total_time;
        self.total_time += delta.abs();
        self.did_loop = false;

        let start = animation.start_seconds();
        let end = animation.end_seconds();
        let range = end - start;
        if range <= 0.0 {
            self.time = start;
            return false;
        }

        // Walk the cursor in segments so boundary handling and callback
        // reporting share one code path. Whole extra laps are folded away
        // up front to bound the walk.
        let mut remaining = match animation.loop_mode {
            LoopMode::OneShot => delta,
            LoopMode::Loop => {
                if delta.abs() > range * 2.0 {
                    self.did_loop = true;
                    delta.signum() * (delta.abs() % range + range)
                } else {
                    delta
                }
            }
            LoopMode::PingPong => {
                if delta.abs() > range * 4.0 {
                    self.did_loop = true;
                    delta.signum() * (delta.abs() % (range * 2.0) + range * 2.0)
                } else {
                    delta
                }
            }
        };

        let mut cursor = self.time.clamp(start, end);
        let mut at_start_frame = false;
        let mut keep_going = true;

        while remaining != 0.0 {
            if remaining > 0.0 {
                let segment_end = (cursor + remaining).min(end);
                if let Some(reporter) = reporter.as_deref_mut() {
                    animation.report_keyed_callbacks(
                        reporter,
                        cursor,
                        segment_end,
                        at_start_frame,
                    );
                }
                remaining -= segment_end - cursor;
                cursor = segment_end;
                if cursor < end {
                    break;
                }
                match animation.loop_mode {
                    LoopMode::OneShot => {
                        // Clamp on overshoot; landing exactly on the end is
                        // still a live cursor.
                        if remaining > 0.0 {
                            self.did_loop = true;
                            keep_going = false;
                        }
                        break;
                    }
                    LoopMode::Loop => {
                        // Forward wraps at the boundary itself: the end
                        // instant reads as the start.
                        self.did_loop = true;
                        cursor = start;
                        at_start_frame = true;
                        if remaining <= 0.0 {
                            break;
                        }
                    }
                    LoopMode::PingPong => {
                        if remaining <= 0.0 {
                            break;
                        }
                        self.did_loop = true;
                        self.direction = -self.direction;
                        remaining = -remaining;
                        at_start_frame = false;
                    }
                }
            } else {
                let segment_end = (cursor + remaining).max(start);
                if let Some(reporter) = reporter.as_deref_mut() {
                    animation.report_keyed_callbacks(
                        reporter,
                        cursor,
                        segment_end,
                        at_start_frame,
                    );
                }
                remaining -= segment_end - cursor;
                cursor = segment_end;
                if cursor > start {
                    break;
                }
                match animation.loop_mode {
                    LoopMode::OneShot => {
                        if remaining < 0.0 {
                            self.did_loop = true;
                            keep_going = false;
                        }
                        break;
                    }
                    LoopMode::Loop => {
                        if remaining >= 0.0 {
                            break;
                        }
                        self.did_loop = true;
                        cursor = end;
                        at_start_frame = true;
                    }
                    LoopMode::PingPong => {
                        if remaining >= 0.0 {
                            break;
                        }
                        self.did_loop = true;
                        self.direction = -self.direction;
                        remaining = -remaining;
                        at_start_frame = false;
                    }
                }
            }
        }

        self.time = cursor;
        keep_going
    }

    /// Writes the animation's keyed values at the current cursor with blend
    /// weight `mix`.
    pub fn apply(&self, artboard: &mut Artboard, mix: f32) {
        self.animation.apply(artboard, self.time, mix);
    }
}
