
//! Truetype font rendering, using a gpu glyph cache

use std::fs;
use std::io;
use std::path::Path;
use std::str::Chars;

use glam::{Mat4, Vec2};
use log::warn;
use rusttype::gpu_cache::Cache;
use rusttype::{point, GlyphId, PositionedGlyph, Scale};
use thiserror::Error;

use crate::buffer::{BufferUsage, PrimitiveMode, Vertex, VertexArray, VertexBuffer, VertexLayout};
use crate::color::Color;
use crate::shader::{Shader, ShaderError};
use crate::texture::{Texture, TextureFormat};

const CACHE_SIZE: u32 = 512;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] io::Error),

    #[error("file is not a valid truetype font")]
    InvalidFontData,

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// A truetype font, plus everything needed to draw text with it. Rasterized
/// glyphs are kept in a single-channel cache texture which is filled lazily
/// as new glyphs are used.
///
/// Text is not drawn immediately. [`queue`] records what to draw, and
/// [`draw`] renders everything queued since the last flush in one draw call.
///
/// [`queue`]: struct.Font.html#method.queue
/// [`draw`]: struct.Font.html#method.draw
pub struct Font {
    font: rusttype::Font<'static>,

    cache: Cache<'static>,
    cache_texture: Texture,

    shader: Shader,
    buffer: VertexBuffer<FontVert>,
    vertex_array: VertexArray,
    buffer_data: Vec<FontVert>,

    queued: Vec<(PositionedGlyph<'static>, Color)>,
}

impl Font {
    /// Loads the truetype font at the given location.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Font, FontError> {
        let data = fs::read(path.as_ref())?;
        let font = rusttype::Font::try_from_vec(data).ok_or(FontError::InvalidFontData)?;

        let cache = Cache::builder()
            .dimensions(CACHE_SIZE, CACHE_SIZE)
            .build();

        let mut cache_texture = Texture::new();
        cache_texture.initialize(CACHE_SIZE, CACHE_SIZE, TextureFormat::R_8);

        let shader = Shader::from_source(VERT_SRC, FRAG_SRC)?;

        let buffer = VertexBuffer::with_capacity(BufferUsage::DynamicDraw, 600);
        let mut vertex_array = VertexArray::new();
        vertex_array.add_typed_buffer(&buffer);

        Ok(Font {
            font,
            cache,
            cache_texture,
            shader,
            buffer,
            vertex_array,
            buffer_data: Vec::with_capacity(600),
            queued: Vec::new(),
        })
    }

    /// Calculates the width, in pixels, of the given string if it where to be
    /// drawn at the given size. For a multiline string this returns the width
    /// of the widest line.
    pub fn width(&self, text: &str, text_size: f32) -> f32 {
        let iter = PosGlyphIter::new(text, &self.font, Scale::uniform(text_size), Vec2::ZERO);

        let mut width = 0.0f32;
        for glyph in iter {
            let end = glyph.position().x + glyph.unpositioned().h_metrics().advance_width;
            width = width.max(end);
        }
        width
    }

    /// The distance, in pixels, between the baselines of two lines of text at
    /// the given size.
    pub fn line_height(&self, text_size: f32) -> f32 {
        let metrics = self.font.v_metrics(Scale::uniform(text_size));
        metrics.ascent - metrics.descent + metrics.line_gap
    }

    /// The distance, in pixels, from the baseline to the top of the tallest
    /// glyphs at the given size.
    pub fn ascent(&self, text_size: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(text_size)).ascent
    }

    /// The distance, in pixels, from the baseline to the bottom of the
    /// lowest-reaching glyphs at the given size. This is typically negative.
    pub fn descent(&self, text_size: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(text_size)).descent
    }

    /// Queues the given string for drawing. `pos` is the position, in pixels,
    /// of the baseline of the first line of text. Nothing shows up on screen
    /// until [`draw`](struct.Font.html#method.draw) is called.
    pub fn queue(&mut self, text: &str, text_size: f32, pos: Vec2, color: Color) {
        let Font { font, queued, .. } = self;

        let iter = PosGlyphIter::new(text, font, Scale::uniform(text_size), pos);
        for glyph in iter {
            queued.push((glyph, color));
        }
    }

    /// Draws all queued text in a single draw call, using the given
    /// model-view-projection transform. The queue is emptied.
    ///
    /// This binds its own shader and binds the glyph cache to texture unit 0.
    pub fn draw(&mut self, mvp: Mat4) {
        if self.queued.is_empty() {
            return;
        }

        // Rasterize any new glyphs into the cache texture
        {
            let Font { cache, cache_texture, queued, .. } = self;

            for (glyph, _) in queued.iter() {
                cache.queue_glyph(0, glyph.clone());
            }
            let result = cache.cache_queued(|rect, data| {
                cache_texture.load_data_to_region(
                    data,
                    rect.min.x, rect.min.y,
                    rect.width(), rect.height(),
                );
            });
            if let Err(err) = result {
                // The cache texture is to small to fit all queued glyphs at
                // once. Drawing this frame would sample stale cache entries.
                warn!("Could not cache all queued glyphs: {}", err);
                self.queued.clear();
                return;
            }
        }

        self.buffer_data.clear();
        for (glyph, color) in self.queued.iter() {
            if let Ok(Some((uv, pos))) = self.cache.rect_for(0, glyph) {
                let x1 = pos.min.x as f32;
                let x2 = pos.max.x as f32;
                let y1 = pos.min.y as f32;
                let y2 = pos.max.y as f32;

                let verts = [
                    FontVert { pos: Vec2::new(x1, y1), uv: Vec2::new(uv.min.x, uv.min.y), color: *color },
                    FontVert { pos: Vec2::new(x2, y1), uv: Vec2::new(uv.max.x, uv.min.y), color: *color },
                    FontVert { pos: Vec2::new(x2, y2), uv: Vec2::new(uv.max.x, uv.max.y), color: *color },
                    FontVert { pos: Vec2::new(x1, y1), uv: Vec2::new(uv.min.x, uv.min.y), color: *color },
                    FontVert { pos: Vec2::new(x2, y2), uv: Vec2::new(uv.max.x, uv.max.y), color: *color },
                    FontVert { pos: Vec2::new(x1, y2), uv: Vec2::new(uv.min.x, uv.max.y), color: *color },
                ];
                self.buffer_data.extend_from_slice(&verts);
            }
        }
        self.queued.clear();

        self.buffer.clear();
        self.buffer.put_at_start(&self.buffer_data);

        self.shader.set_uniform("u_mvp", mvp);
        self.shader.set_uniform("u_texture", 0i32);
        self.cache_texture.bind(0);
        self.vertex_array.draw(PrimitiveMode::Triangles, 0..self.buffer.len());
    }
}

#[derive(Debug, Copy, Clone)]
#[repr(C)]
struct FontVert {
    pos: Vec2,
    uv: Vec2,
    color: Color,
}

impl Vertex for FontVert {
    fn layout() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(2).push::<f32>(4);
        layout
    }
}

const VERT_SRC: &str = "
    #version 330 core

    layout(location = 0) in vec2 a_pos;
    layout(location = 1) in vec2 a_uv;
    layout(location = 2) in vec4 a_color;

    out vec2 v_uv;
    out vec4 v_color;

    uniform mat4 u_mvp;

    void main() {
        gl_Position = u_mvp * vec4(a_pos, 0.0, 1.0);
        v_uv = a_uv;
        v_color = a_color;
    }
";

const FRAG_SRC: &str = "
    #version 330 core

    in vec2 v_uv;
    in vec4 v_color;
    out vec4 color;

    uniform sampler2D u_texture;

    void main() {
        color = vec4(v_color.rgb, v_color.a * texture(u_texture, v_uv).r);
    }
";

/// Iterates over the positioned glyphs of a piece of text, advancing a caret
/// glyph by glyph and applying kerning. Newlines move the caret to the start
/// of the next line.
#[derive(Clone)]
struct PosGlyphIter<'f, 't> {
    text: Chars<'t>,

    font: &'f rusttype::Font<'static>,
    scale: Scale,

    caret: Vec2,
    line_start: f32,
    last_glyph: Option<GlyphId>,
    vertical_advance: f32,
}

impl<'f, 't> PosGlyphIter<'f, 't> {
    fn new(
        text: &'t str,
        font: &'f rusttype::Font<'static>,
        scale: Scale,
        start: Vec2,
    ) -> PosGlyphIter<'f, 't> {
        let v_metrics = font.v_metrics(scale);
        let vertical_advance = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

        PosGlyphIter {
            text: text.chars(),

            font,
            scale,

            caret: start,
            line_start: start.x,
            last_glyph: None,
            vertical_advance,
        }
    }
}

impl<'f, 't> Iterator for PosGlyphIter<'f, 't> {
    type Item = PositionedGlyph<'static>;

    fn next(&mut self) -> Option<PositionedGlyph<'static>> {
        while let Some(c) = self.text.next() {
            if c.is_control() {
                if c == '\n' {
                    self.caret.x = self.line_start;
                    self.caret.y += self.vertical_advance;
                    self.last_glyph = None; // No kerning across newlines
                }
                continue;
            }

            let glyph = self.font.glyph(c);
            if glyph.id().0 == 0 {
                // The font has no glyph for this character
                continue;
            }

            if let Some(prev) = self.last_glyph.take() {
                self.caret.x += self.font.pair_kerning(self.scale, prev, glyph.id());
            }
            self.last_glyph = Some(glyph.id());

            let glyph = glyph
                .scaled(self.scale)
                .positioned(point(self.caret.x, self.caret.y));
            self.caret.x += glyph.unpositioned().h_metrics().advance_width;
            return Some(glyph);
        }
        None
    }
}
