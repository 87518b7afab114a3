
use std::ptr;

use gl::types::*;

use crate::buffer::{GlIndex, GlPrimitive, IndexBuffer, PrimitiveMode, VertexArray};
use crate::color::Color;
use crate::graphics;
use crate::shader::Shader;

/// Issues indexed draw calls from a vertex array, an index buffer and a
/// shader. The renderer holds no state of its own; all state lives in the
/// objects passed to [`draw`](struct.Renderer.html#method.draw).
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Renderer {
        Renderer
    }

    /// Clears the color buffer of the currently bound framebuffer.
    pub fn clear(&self, color: Color) {
        graphics::clear(Some(color), false, false);
    }

    /// Binds the given shader, vertex array and index buffer, then draws all
    /// indices of the index buffer with the given primitive mode.
    pub fn draw<E: GlIndex>(
        &self,
        mode: PrimitiveMode,
        vertex_array: &VertexArray,
        indices: &IndexBuffer<E>,
        shader: &Shader,
    ) {
        if indices.is_empty() {
            return;
        }

        shader.bind();
        vertex_array.bind();
        indices.bind();

        unsafe {
            gl::DrawElements(
                mode as GLenum,
                indices.len() as GLsizei,
                E::gl_enum(),
                ptr::null(),
            );
        }
    }
}
