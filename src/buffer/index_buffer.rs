
use std::marker::PhantomData;
use std::mem;

use gl::types::*;

use super::{BufferUsage, GlIndex};

/// A GPU buffer holding vertex indices, defining the topology of a draw call.
/// Together with a [`VertexArray`] and a [`Shader`] this is one of the three
/// objects a [`Renderer`] binds for an indexed draw.
///
/// `E` is the index type, one of `u8`, `u16` or `u32`.
///
/// [`VertexArray`]: struct.VertexArray.html
/// [`Shader`]: ../shader/struct.Shader.html
/// [`Renderer`]: ../struct.Renderer.html
pub struct IndexBuffer<E: GlIndex> {
    phantom: PhantomData<E>,

    index_count: usize,
    ebo: GLuint,
}

impl<E: GlIndex> IndexBuffer<E> {
    /// Creates a new index buffer, storing the given indices on the GPU.
    pub fn with_data(usage: BufferUsage, indices: &[E]) -> IndexBuffer<E> {
        let mut ebo = 0;

        let bytes = indices.len() * mem::size_of::<E>();
        unsafe {
            gl::GenBuffers(1, &mut ebo);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                bytes as GLsizeiptr,
                indices.as_ptr() as *const GLvoid,
                usage as GLenum,
            );
        }

        IndexBuffer {
            phantom: PhantomData,
            index_count: indices.len(),
            ebo,
        }
    }

    /// The number of indices stored in GPU memory.
    pub fn len(&self) -> usize {
        self.index_count
    }

    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }

    /// Binds this buffer to `GL_ELEMENT_ARRAY_BUFFER`. Note that this binding
    /// is part of the currently bound vertex array's state.
    pub fn bind(&self) {
        unsafe {
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, self.ebo);
        }
    }

    /// Unbinds whatever buffer is bound to `GL_ELEMENT_ARRAY_BUFFER`.
    pub fn unbind(&self) {
        unsafe {
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        }
    }
}

impl<E: GlIndex> Drop for IndexBuffer<E> {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}
