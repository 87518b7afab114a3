
use std::marker::PhantomData;
use std::mem;
use std::ptr;

use gl::types::*;
use log::warn;

use super::BufferUsage;

/// A GPU buffer which holds a list of a custom vertex type. The buffer does
/// not keep a copy of the vertices in host memory.
///
/// The GL buffer object is created in the constructors and deleted when this
/// struct is dropped. The type is deliberately not `Clone`; there is exactly
/// one owner per GL object.
///
/// `T` should be `repr(C)`, otherwise the data layout on the GPU is not what
/// a [`VertexLayout`](struct.VertexLayout.html) describes.
pub struct VertexBuffer<T: Copy> {
    // We are generic over the vertex type, but dont actually store any vertices
    phantom: PhantomData<T>,

    vertex_count: usize, // Used space, in number of vertices
    allocated: usize,    // Allocated space, in number of vertices

    usage: BufferUsage,
    vbo: GLuint,
}

impl<T: Copy> VertexBuffer<T> {
    /// Creates a new vertex buffer without allocating any GPU memory.
    pub fn new(usage: BufferUsage) -> VertexBuffer<T> {
        let mut vbo = 0;
        unsafe { gl::GenBuffers(1, &mut vbo) };

        VertexBuffer {
            phantom: PhantomData,
            vertex_count: 0,
            allocated: 0,
            usage,
            vbo,
        }
    }

    /// Creates a new vertex buffer, storing the given vertices on the GPU.
    pub fn with_data(usage: BufferUsage, vertices: &[T]) -> VertexBuffer<T> {
        let mut buffer = VertexBuffer::new(usage);

        let bytes = vertices.len() * mem::size_of::<T>();
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes as GLsizeiptr,
                vertices.as_ptr() as *const GLvoid,
                usage as GLenum,
            );
        }

        buffer.vertex_count = vertices.len();
        buffer.allocated = vertices.len();
        buffer
    }

    /// Creates a new vertex buffer, preallocating space for the given number
    /// of vertices.
    pub fn with_capacity(usage: BufferUsage, capacity: usize) -> VertexBuffer<T> {
        let mut buffer = VertexBuffer::new(usage);
        buffer.ensure_allocated(capacity);
        buffer
    }

    /// Puts the given vertices at the given index in this buffer, overwriting
    /// any vertices which where previously in that location. If more space is
    /// needed the underlying allocation grows; see [`ensure_allocated`] for
    /// the caveats of growing.
    ///
    /// [`ensure_allocated`]: struct.VertexBuffer.html#method.ensure_allocated
    pub fn put(&mut self, index: usize, data: &[T]) {
        if data.is_empty() {
            return;
        }

        let start = index;
        let end = index + data.len();

        if end > self.allocated {
            if start > 0 {
                // Growing discards old contents, a partial write into a grown
                // buffer leaves the rest of it undefined
                warn!("VertexBuffer grew during a partial write, previous contents are lost");
            }
            let new_capacity = usize::max(end, self.allocated * 2);
            self.ensure_allocated(new_capacity);
        }

        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferSubData(
                gl::ARRAY_BUFFER,
                (start * mem::size_of::<T>()) as GLintptr,
                (data.len() * mem::size_of::<T>()) as GLsizeiptr,
                data.as_ptr() as *const GLvoid,
            );
        }

        if end > self.vertex_count {
            self.vertex_count = end;
        }
    }

    /// Puts the given vertices at the start of this buffer, replacing any
    /// vertices which where previously in that location.
    pub fn put_at_start(&mut self, data: &[T]) {
        self.put(0, data);
    }

    /// Ensures this buffer has space for at least `new_capacity` vertices.
    /// If the buffer is already big enough this does nothing.
    ///
    /// Growing reallocates the storage of the *same* GL buffer object, so
    /// vertex arrays which have this buffer attached remain valid. The old
    /// contents are discarded; callers are expected to re-upload afterwards.
    pub fn ensure_allocated(&mut self, new_capacity: usize) {
        if new_capacity > self.allocated {
            let bytes = new_capacity * mem::size_of::<T>();
            unsafe {
                gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
                gl::BufferData(gl::ARRAY_BUFFER, bytes as GLsizeiptr, ptr::null(), self.usage as GLenum);
            }
            self.allocated = new_capacity;
        }
    }

    /// Empties this buffer, setting its length to 0. This does nothing to the
    /// data stored in the buffer, it simply marks all current data as invalid.
    pub fn clear(&mut self) {
        self.vertex_count = 0;
    }

    /// The number of vertices that are stored in GPU memory.
    pub fn len(&self) -> usize {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// The number of vertices that can be stored in this buffer without
    /// reallocating memory.
    pub fn capacity(&self) -> usize {
        self.allocated
    }

    /// Binds this buffer to `GL_ARRAY_BUFFER`.
    pub fn bind(&self) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
        }
    }

    /// Unbinds whatever buffer is bound to `GL_ARRAY_BUFFER`.
    pub fn unbind(&self) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
    }
}

impl<T: Copy> Drop for VertexBuffer<T> {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}
