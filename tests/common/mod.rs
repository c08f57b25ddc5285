//! Shared test helpers: a low-level binary file writer matching the wire
//! format, and no-op render factory/renderer doubles.
#![allow(dead_code)]

use std::sync::Arc;

use vexel::math::Aabb;
use vexel::render::{
    BlendMode, Factory, Gradient, PaintStyle, RenderBuffer, RenderImage, RenderPaint, RenderPath,
    Renderer, StrokeCap, StrokeJoin,
};

pub const EPSILON: f32 = 1e-5;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Binary file writer
// ============================================================================

/// Builds file bytes the importer understands. Mirrors the reader: VarUint
/// keys and lengths, little-endian floats and colors, one-byte bools.
pub struct FileWriter {
    bytes: Vec<u8>,
}

impl FileWriter {
    /// Starts a file with a valid header and an empty property table.
    pub fn new() -> Self {
        Self::with_header(7, 0, &[])
    }

    /// Starts a file with the given versions and property type table.
    pub fn with_header(major: u64, minor: u64, toc: &[(u16, u64)]) -> Self {
        let mut writer = Self { bytes: Vec::new() };
        writer.bytes.extend_from_slice(b"VEXL");
        writer.var_uint(major);
        writer.var_uint(minor);
        writer.var_uint(1); // file id
        writer.var_uint(toc.len() as u64);
        for (key, type_id) in toc {
            writer.var_uint(u64::from(*key));
            writer.var_uint(*type_id);
        }
        writer
    }

    pub fn var_uint(&mut self, mut value: u64) -> &mut Self {
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.bytes.push(byte);
            if value == 0 {
                break;
            }
        }
        self
    }

    /// Begins an object with the given type key.
    pub fn object(&mut self, type_key: u16) -> &mut Self {
        self.var_uint(u64::from(type_key))
    }

    /// Ends the open object's property list.
    pub fn end(&mut self) -> &mut Self {
        self.var_uint(0)
    }

    pub fn p_uint(&mut self, key: u16, value: u64) -> &mut Self {
        self.var_uint(u64::from(key));
        self.var_uint(value)
    }

    pub fn p_float(&mut self, key: u16, value: f32) -> &mut Self {
        self.var_uint(u64::from(key));
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn p_bool(&mut self, key: u16, value: bool) -> &mut Self {
        self.var_uint(u64::from(key));
        self.bytes.push(u8::from(value));
        self
    }

    pub fn p_color(&mut self, key: u16, value: u32) -> &mut Self {
        self.var_uint(u64::from(key));
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn p_str(&mut self, key: u16, value: &str) -> &mut Self {
        self.var_uint(u64::from(key));
        self.var_uint(value.len() as u64);
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    pub fn p_bytes(&mut self, key: u16, value: &[u8]) -> &mut Self {
        self.var_uint(u64::from(key));
        self.var_uint(value.len() as u64);
        self.bytes.extend_from_slice(value);
        self
    }

    /// Writes a raw property key with no payload (callback-typed keys).
    pub fn p_key_only(&mut self, key: u16) -> &mut Self {
        self.var_uint(u64::from(key))
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

// ============================================================================
// Render doubles
// ============================================================================

pub struct NullPath;
impl RenderPath for NullPath {}

pub struct NullImage;
impl RenderImage for NullImage {
    fn width(&self) -> u32 {
        1
    }
    fn height(&self) -> u32 {
        1
    }
}

pub struct NullBuffer;
impl RenderBuffer for NullBuffer {}

pub struct NullPaint;
impl RenderPaint for NullPaint {
    fn style(&mut self, _style: PaintStyle) {}
    fn color(&mut self, _argb: u32) {}
    fn thickness(&mut self, _thickness: f32) {}
    fn cap(&mut self, _cap: StrokeCap) {}
    fn join(&mut self, _join: StrokeJoin) {}
    fn miter_limit(&mut self, _limit: f32) {}
    fn blend_mode(&mut self, _mode: BlendMode) {}
    fn feather(&mut self, _radius: f32) {}
    fn gradient(&mut self, _gradient: &Gradient) {}
}

/// Factory whose resources are inert.
pub struct NullFactory;

impl Factory for NullFactory {
    fn make_empty_path(&self) -> Box<dyn RenderPath> {
        Box::new(NullPath)
    }
    fn make_rect_path(&self, _bounds: Aabb) -> Box<dyn RenderPath> {
        Box::new(NullPath)
    }
    fn make_paint(&self) -> Box<dyn RenderPaint> {
        Box::new(NullPaint)
    }
    fn make_render_buffer(&self, _bytes: &[u8]) -> Box<dyn RenderBuffer> {
        Box::new(NullBuffer)
    }
    fn decode_image(&self, _bytes: &[u8]) -> Option<Arc<dyn RenderImage>> {
        Some(Arc::new(NullImage))
    }
}

pub fn factory() -> Arc<dyn Factory> {
    Arc::new(NullFactory)
}

/// Renderer recording the command stream for assertions.
#[derive(Default)]
pub struct RecordingRenderer {
    pub commands: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn save(&mut self) {
        self.commands.push("save".to_string());
    }
    fn restore(&mut self) {
        self.commands.push("restore".to_string());
    }
    fn transform(&mut self, transform: &glam::Affine2) {
        let t = transform.translation;
        self.commands.push(format!("transform({:.1},{:.1})", t.x, t.y));
    }
    fn clip_path(&mut self, _path: &dyn RenderPath) {
        self.commands.push("clip".to_string());
    }
    fn draw_path(&mut self, _path: &dyn RenderPath, _paint: &dyn RenderPaint) {
        self.commands.push("draw_path".to_string());
    }
    fn draw_image(&mut self, _image: &dyn RenderImage, _blend_mode: BlendMode, _opacity: f32) {
        self.commands.push("draw_image".to_string());
    }
    #[allow(clippy::too_many_arguments)]
    fn draw_image_mesh(
        &mut self,
        _image: &dyn RenderImage,
        _vertices: &dyn RenderBuffer,
        _uvs: &dyn RenderBuffer,
        _indices: &dyn RenderBuffer,
        _vertex_count: u32,
        _index_count: u32,
        _blend_mode: BlendMode,
        _opacity: f32,
    ) {
        self.commands.push("draw_image_mesh".to_string());
    }
}
