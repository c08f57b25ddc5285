//! Cubic Bezier interpolators.
//!
//! An interpolator stores two control points defining a 2-D Bezier from
//! (0,0) to (1,1). On load it precomputes a coarse sample table of `x(t)`;
//! at query time it inverts `x(t) = input` with Newton-Raphson, falling
//! back to bisection when the local slope is too shallow, then evaluates
//! the output curve at the found parameter.
//!
//! Two flavours share the solver:
//! - *ease* interpolators map a normalized time factor to a progress value
//!   through `y(t)`, which then drives an ordinary lerp;
//! - *value* interpolators shape the value curve itself: the keyframe's
//!   from/to values become the curve endpoints and y1/y2 the inner
//!   control values.

use crate::core::component::{Component, SetOutcome};
use crate::core::registry::{PropertyValue, properties};

const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP: f32 = 1.0 / (SPLINE_TABLE_SIZE as f32 - 1.0);
const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f32 = 0.001;
const SUBDIVISION_PRECISION: f32 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

#[inline]
fn coefficient_a(a1: f32, a2: f32) -> f32 {
    1.0 - 3.0 * a2 + 3.0 * a1
}

#[inline]
fn coefficient_b(a1: f32, a2: f32) -> f32 {
    3.0 * a2 - 6.0 * a1
}

#[inline]
fn coefficient_c(a1: f32) -> f32 {
    3.0 * a1
}

/// Evaluates the 1-D Bezier with inner control values `a1`, `a2` at `t`.
#[inline]
fn calc_bezier(t: f32, a1: f32, a2: f32) -> f32 {
    ((coefficient_a(a1, a2) * t + coefficient_b(a1, a2)) * t + coefficient_c(a1)) * t
}

/// d/dt of [`calc_bezier`].
#[inline]
fn calc_slope(t: f32, a1: f32, a2: f32) -> f32 {
    3.0 * coefficient_a(a1, a2) * t * t + 2.0 * coefficient_b(a1, a2) * t + coefficient_c(a1)
}

/// Parameter inversion for the x component of the curve.
#[derive(Debug, Clone, Default)]
pub(crate) struct CubicSolver {
    x1: f32,
    x2: f32,
    samples: [f32; SPLINE_TABLE_SIZE],
}

impl CubicSolver {
    pub(crate) fn build(&mut self, x1: f32, x2: f32) {
        self.x1 = x1;
        self.x2 = x2;
        for (i, sample) in self.samples.iter_mut().enumerate() {
            *sample = calc_bezier(i as f32 * SAMPLE_STEP, x1, x2);
        }
    }

    /// Finds `t` such that `x(t) == x`.
    pub(crate) fn get_t(&self, x: f32) -> f32 {
        if self.x1 == self.x2 {
            // Linear x curve; t is x.
            return x;
        }

        // Coarse bracket from the sample table.
        let mut interval_start = 0.0f32;
        let mut sample = 1;
        let last_sample = SPLINE_TABLE_SIZE - 1;
        while sample != last_sample && self.samples[sample] <= x {
            interval_start += SAMPLE_STEP;
            sample += 1;
        }
        sample -= 1;

        let dist =
            (x - self.samples[sample]) / (self.samples[sample + 1] - self.samples[sample]);
        let guess = interval_start + dist * SAMPLE_STEP;

        let initial_slope = calc_slope(guess, self.x1, self.x2);
        if initial_slope >= NEWTON_MIN_SLOPE {
            self.newton_raphson(x, guess)
        } else if initial_slope == 0.0 {
            guess
        } else {
            self.binary_subdivide(x, interval_start, interval_start + SAMPLE_STEP)
        }
    }

    fn newton_raphson(&self, x: f32, mut t: f32) -> f32 {
        for _ in 0..NEWTON_ITERATIONS {
            let slope = calc_slope(t, self.x1, self.x2);
            if slope == 0.0 {
                return t;
            }
            let dx = calc_bezier(t, self.x1, self.x2) - x;
            t -= dx / slope;
        }
        t
    }

    fn binary_subdivide(&self, x: f32, mut lower: f32, mut upper: f32) -> f32 {
        let mut t = lower + (upper - lower) / 2.0;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            let dx = calc_bezier(t, self.x1, self.x2) - x;
            if dx.abs() <= SUBDIVISION_PRECISION {
                break;
            }
            if dx > 0.0 {
                upper = t;
            } else {
                lower = t;
            }
            t = lower + (upper - lower) / 2.0;
        }
        t
    }
}

/// Whether the interpolator eases time or shapes the value curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolatorKind {
    Ease,
    Value,
}

/// A cubic interpolator component, resolvable by id from keyframes and
/// transitions.
#[derive(Debug, Clone)]
pub struct CubicInterpolator {
    pub component: Component,
    pub kind: InterpolatorKind,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    solver: CubicSolver,
}

impl CubicInterpolator {
    #[must_use]
    pub fn new(kind: InterpolatorKind) -> Self {
        Self {
            component: Component::new(),
            kind,
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
            solver: CubicSolver::default(),
        }
    }

    /// Builds the sample table. Called once after load and again after
    /// control-point writes.
    pub fn initialize(&mut self) {
        self.solver.build(self.x1, self.x2);
    }

    /// Eased progress for a normalized time factor in [0, 1].
    #[must_use]
    pub fn transform(&self, factor: f32) -> f32 {
        calc_bezier(self.solver.get_t(factor), self.y1, self.y2)
    }

    /// Interpolated value between `from` and `to` at `factor`.
    #[must_use]
    pub fn transform_value(&self, from: f32, to: f32, factor: f32) -> f32 {
        match self.kind {
            InterpolatorKind::Ease => from + (to - from) * self.transform(factor),
            InterpolatorKind::Value => {
                // Cubic polynomial through (from, y1, y2, to), evaluated at
                // the inverted x parameter.
                let a = to + 3.0 * (self.y1 - self.y2) - from;
                let b = 3.0 * (self.y2 - 2.0 * self.y1 + from);
                let c = 3.0 * (self.y1 - from);
                let t = self.solver.get_t(factor);
                ((a * t + b) * t + c) * t + from
            }
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        let slot = match key {
            properties::INTERPOLATOR_X1 => &mut self.x1,
            properties::INTERPOLATOR_Y1 => &mut self.y1,
            properties::INTERPOLATOR_X2 => &mut self.x2,
            properties::INTERPOLATOR_Y2 => &mut self.y2,
            _ => return self.component.set(key, value),
        };
        if let PropertyValue::Float(v) = value {
            if *slot == *v {
                return SetOutcome::Unchanged;
            }
            *slot = *v;
            self.solver.build(self.x1, self.x2);
            return SetOutcome::changed(crate::core::component::Dirt::empty(), false);
        }
        SetOutcome::Unknown
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::INTERPOLATOR_X1 => Some(PropertyValue::Float(self.x1)),
            properties::INTERPOLATOR_Y1 => Some(PropertyValue::Float(self.y1)),
            properties::INTERPOLATOR_X2 => Some(PropertyValue::Float(self.x2)),
            properties::INTERPOLATOR_Y2 => Some(PropertyValue::Float(self.y2)),
            _ => self.component.get(key),
        }
    }
}
