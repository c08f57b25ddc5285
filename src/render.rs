//! Renderer and factory boundary.
//!
//! The core does not rasterize. Each frame it walks the ordered drawable
//! list and issues commands to a host-supplied [`Renderer`]; paths, paints
//! and images are constructed through the host's [`Factory`]. Both traits
//! are object-safe so hosts can hand the runtime trait objects.

use std::sync::Arc;

use glam::Affine2;

use crate::math::Aabb;

/// Compositing mode for drawables, matching the editor's blend modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    SrcOver,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Wire value of the blend mode.
    #[must_use]
    pub fn to_u32(self) -> u32 {
        match self {
            BlendMode::SrcOver => 3,
            BlendMode::Screen => 14,
            BlendMode::Overlay => 15,
            BlendMode::Darken => 16,
            BlendMode::Lighten => 17,
            BlendMode::ColorDodge => 18,
            BlendMode::ColorBurn => 19,
            BlendMode::HardLight => 20,
            BlendMode::SoftLight => 21,
            BlendMode::Difference => 22,
            BlendMode::Exclusion => 23,
            BlendMode::Multiply => 24,
            BlendMode::Hue => 25,
            BlendMode::Saturation => 26,
            BlendMode::Color => 27,
            BlendMode::Luminosity => 28,
        }
    }

    #[must_use]
    pub fn from_u32(value: u32) -> BlendMode {
        match value {
            14 => BlendMode::Screen,
            15 => BlendMode::Overlay,
            16 => BlendMode::Darken,
            17 => BlendMode::Lighten,
            18 => BlendMode::ColorDodge,
            19 => BlendMode::ColorBurn,
            20 => BlendMode::HardLight,
            21 => BlendMode::SoftLight,
            22 => BlendMode::Difference,
            23 => BlendMode::Exclusion,
            24 => BlendMode::Multiply,
            25 => BlendMode::Hue,
            26 => BlendMode::Saturation,
            27 => BlendMode::Color,
            28 => BlendMode::Luminosity,
            _ => BlendMode::SrcOver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// One color stop of a gradient shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: u32,
    pub position: f32,
}

/// Gradient shader description handed to paints.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear {
        start: glam::Vec2,
        end: glam::Vec2,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: glam::Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

/// An opaque path owned by the host renderer.
pub trait RenderPath: Send + Sync {}

/// An opaque decoded image owned by the host renderer.
pub trait RenderImage: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// An opaque vertex/index buffer owned by the host renderer.
pub trait RenderBuffer {}

/// Paint state for a draw call.
pub trait RenderPaint {
    fn style(&mut self, style: PaintStyle);
    fn color(&mut self, argb: u32);
    fn thickness(&mut self, thickness: f32);
    fn cap(&mut self, cap: StrokeCap);
    fn join(&mut self, join: StrokeJoin);
    fn miter_limit(&mut self, limit: f32);
    fn blend_mode(&mut self, mode: BlendMode);
    /// Blur radius applied to the painted geometry.
    fn feather(&mut self, radius: f32);
    fn gradient(&mut self, gradient: &Gradient);
}

/// Sequential 2-D drawing commands issued by the core each frame.
#[allow(clippy::too_many_arguments)]
pub trait Renderer {
    fn save(&mut self);
    fn restore(&mut self);
    fn transform(&mut self, transform: &Affine2);
    fn clip_path(&mut self, path: &dyn RenderPath);
    fn draw_path(&mut self, path: &dyn RenderPath, paint: &dyn RenderPaint);
    fn draw_image(&mut self, image: &dyn RenderImage, blend_mode: BlendMode, opacity: f32);
    fn draw_image_mesh(
        &mut self,
        image: &dyn RenderImage,
        vertices: &dyn RenderBuffer,
        uvs: &dyn RenderBuffer,
        indices: &dyn RenderBuffer,
        vertex_count: u32,
        index_count: u32,
        blend_mode: BlendMode,
        opacity: f32,
    );
}

/// Constructs renderer-owned resources on behalf of the core.
pub trait Factory: Send + Sync {
    fn make_empty_path(&self) -> Box<dyn RenderPath>;
    fn make_rect_path(&self, bounds: Aabb) -> Box<dyn RenderPath>;
    fn make_paint(&self) -> Box<dyn RenderPaint>;
    fn make_render_buffer(&self, bytes: &[u8]) -> Box<dyn RenderBuffer>;
    /// Decodes an encoded image, or `None` when the codec is unsupported.
    fn decode_image(&self, bytes: &[u8]) -> Option<Arc<dyn RenderImage>>;
}
