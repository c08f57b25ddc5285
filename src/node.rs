//! Transform components and the minimal built-in drawable.
//!
//! [`Node`] carries the 2-D transform every hierarchy component shares:
//! translation, rotation, scale and opacity, plus the cached world
//! transform and render opacity maintained by the artboard update loop.
//! [`Shape`] is the one concrete drawable the core resolves by identifier:
//! an axis-aligned `width x height` bound centred on its transform with a
//! solid fill, enough for hit testing and draw-command emission.

use glam::{Affine2, Vec2};

use crate::core::component::{Component, Dirt, SetOutcome};
use crate::core::registry::{PropertyValue, properties};
use crate::math::Aabb;
use crate::render::BlendMode;

/// A positionable, rotatable container component.
#[derive(Debug, Clone)]
pub struct Node {
    pub component: Component,
    pub x: f32,
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,

    // Caches maintained by the update loop.
    pub(crate) world_transform: Affine2,
    pub(crate) render_opacity: f32,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            component: Component::new(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            world_transform: Affine2::IDENTITY,
            render_opacity: 1.0,
        }
    }

    /// Transform relative to the parent.
    #[must_use]
    pub fn local_transform(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::new(self.scale_x, self.scale_y),
            self.rotation,
            Vec2::new(self.x, self.y),
        )
    }

    #[inline]
    #[must_use]
    pub fn world_transform(&self) -> &Affine2 {
        &self.world_transform
    }

    #[inline]
    #[must_use]
    pub fn render_opacity(&self) -> f32 {
        self.render_opacity
    }

    fn set_transform_field(slot: &mut f32, value: f32) -> SetOutcome {
        if *slot == value {
            return SetOutcome::Unchanged;
        }
        *slot = value;
        SetOutcome::changed(Dirt::TRANSFORM | Dirt::WORLD_TRANSFORM, true)
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::NODE_X, PropertyValue::Float(v)) => Self::set_transform_field(&mut self.x, *v),
            (properties::NODE_Y, PropertyValue::Float(v)) => Self::set_transform_field(&mut self.y, *v),
            (properties::NODE_ROTATION, PropertyValue::Float(v)) => {
                Self::set_transform_field(&mut self.rotation, *v)
            }
            (properties::NODE_SCALE_X, PropertyValue::Float(v)) => {
                Self::set_transform_field(&mut self.scale_x, *v)
            }
            (properties::NODE_SCALE_Y, PropertyValue::Float(v)) => {
                Self::set_transform_field(&mut self.scale_y, *v)
            }
            (properties::NODE_OPACITY, PropertyValue::Float(v)) => {
                if self.opacity == *v {
                    return SetOutcome::Unchanged;
                }
                self.opacity = *v;
                SetOutcome::changed(Dirt::RENDER_OPACITY, true)
            }
            _ => self.component.set(key, value),
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NODE_X => Some(PropertyValue::Float(self.x)),
            properties::NODE_Y => Some(PropertyValue::Float(self.y)),
            properties::NODE_ROTATION => Some(PropertyValue::Float(self.rotation)),
            properties::NODE_SCALE_X => Some(PropertyValue::Float(self.scale_x)),
            properties::NODE_SCALE_Y => Some(PropertyValue::Float(self.scale_y)),
            properties::NODE_OPACITY => Some(PropertyValue::Float(self.opacity)),
            _ => self.component.get(key),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Flags shared by every drawable.
#[derive(Debug, Clone, Default)]
pub struct Drawable {
    pub blend_mode: BlendMode,
    pub flags: u32,
}

impl Drawable {
    const HIDDEN: u32 = 1;

    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::DRAWABLE_BLEND_MODE, PropertyValue::Uint(v)) => {
                let mode = BlendMode::from_u32(*v as u32);
                if self.blend_mode == mode {
                    return SetOutcome::Unchanged;
                }
                self.blend_mode = mode;
                SetOutcome::changed(Dirt::empty(), false)
            }
            (properties::DRAWABLE_FLAGS, PropertyValue::Uint(v)) => {
                let flags = *v as u32;
                if self.flags == flags {
                    return SetOutcome::Unchanged;
                }
                self.flags = flags;
                SetOutcome::changed(Dirt::DRAW_ORDER, false)
            }
            _ => SetOutcome::Unknown,
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::DRAWABLE_BLEND_MODE => {
                Some(PropertyValue::Uint(u64::from(self.blend_mode.to_u32())))
            }
            properties::DRAWABLE_FLAGS => Some(PropertyValue::Uint(u64::from(self.flags))),
            _ => None,
        }
    }
}

/// Minimal bounded drawable with a solid fill.
#[derive(Debug, Clone)]
pub struct Shape {
    pub node: Node,
    pub drawable: Drawable,
    pub width: f32,
    pub height: f32,
    pub fill_color: u32,
}

impl Shape {
    #[must_use]
    pub fn new() -> Self {
        Self {
            node: Node::new(),
            drawable: Drawable::default(),
            width: 0.0,
            height: 0.0,
            fill_color: 0xff00_0000,
        }
    }

    /// Bounds in the shape's own coordinate space.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_ltwh(-self.width * 0.5, -self.height * 0.5, self.width, self.height)
    }

    /// Bounds in artboard space.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds().transform(&self.node.world_transform)
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::SHAPE_WIDTH, PropertyValue::Float(v)) => {
                if self.width == *v {
                    return SetOutcome::Unchanged;
                }
                self.width = *v;
                SetOutcome::changed(Dirt::PATH, false)
            }
            (properties::SHAPE_HEIGHT, PropertyValue::Float(v)) => {
                if self.height == *v {
                    return SetOutcome::Unchanged;
                }
                self.height = *v;
                SetOutcome::changed(Dirt::PATH, false)
            }
            (properties::SHAPE_FILL_COLOR, PropertyValue::Color(v)) => {
                if self.fill_color == *v {
                    return SetOutcome::Unchanged;
                }
                self.fill_color = *v;
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
            properties::SHAPE_WIDTH => Some(PropertyValue::Float(self.width)),
            properties::SHAPE_HEIGHT => Some(PropertyValue::Float(self.height)),
            properties::SHAPE_FILL_COLOR => Some(PropertyValue::Color(self.fill_color)),
            _ => self.drawable.get(key).or_else(|| self.node.get(key)),
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}
