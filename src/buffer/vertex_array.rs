
use std::mem;
use std::ops::Range;

use gl::types::*;

use super::{GlPrimitive, PrimitiveMode, Vertex, VertexBuffer};

/// A GPU-side descriptor binding buffer layouts to shader attribute slots.
///
/// Buffers are attached with [`add_buffer`], which enables consecutive
/// attribute slots for the elements of the given layout. The GL vertex array
/// object is deleted when this struct is dropped.
///
/// [`add_buffer`]: struct.VertexArray.html#method.add_buffer
pub struct VertexArray {
    vao: GLuint,
    attrib_count: usize,
}

impl VertexArray {
    pub fn new() -> VertexArray {
        let mut vao = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
        }
        VertexArray {
            vao,
            attrib_count: 0,
        }
    }

    /// Attaches a vertex buffer to this vertex array, with the given layout.
    /// The layout's elements are bound to attribute slots starting at the
    /// first slot not claimed by a previous `add_buffer` call.
    pub fn add_buffer<T: Copy>(&mut self, buffer: &VertexBuffer<T>, layout: &VertexLayout) {
        unsafe {
            gl::BindVertexArray(self.vao);
            buffer.bind();

            for element in layout.elements() {
                let index = self.attrib_count as GLuint;
                gl::EnableVertexAttribArray(index);

                if element.integer {
                    gl::VertexAttribIPointer(
                        index, element.primitives as GLint,
                        element.gl_type,
                        layout.stride() as GLsizei, element.offset as *const GLvoid,
                    );
                } else {
                    gl::VertexAttribPointer(
                        index, element.primitives as GLint,
                        element.gl_type, false as GLboolean,
                        layout.stride() as GLsizei, element.offset as *const GLvoid,
                    );
                }

                self.attrib_count += 1;
            }
        }
    }

    /// Attaches a vertex buffer using the layout described by its vertex type.
    pub fn add_typed_buffer<T: Vertex>(&mut self, buffer: &VertexBuffer<T>) {
        self.add_buffer(buffer, &T::layout());
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::BindVertexArray(0);
        }
    }

    /// Draws the given range of vertices from the attached buffers, with the
    /// given primitive mode. Indexed drawing goes through
    /// [`Renderer::draw`](../struct.Renderer.html#method.draw) instead.
    ///
    /// Panics if the start of the range lies after its end.
    pub fn draw(&self, mode: PrimitiveMode, range: Range<usize>) {
        assert!(
            range.start <= range.end,
            "Call to draw with invalid range {}..{}, start must lie before end!",
            range.start, range.end,
        );
        if range.start == range.end {
            return;
        }

        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(mode as GLenum, range.start as GLint, (range.end - range.start) as GLsizei);
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

/// A host-side description of how the fields of a vertex type map onto shader
/// attributes. Attributes are appended with [`push`] and bound to slots by
/// [`VertexArray::add_buffer`].
///
/// # Example
/// ```rust
/// use kvarts::buffer::VertexLayout;
///
/// // Two floats of position followed by two floats of texture coordinates
/// let mut layout = VertexLayout::new();
/// layout.push::<f32>(2);
/// layout.push::<f32>(2);
/// assert_eq!(16, layout.stride());
/// ```
///
/// [`push`]: struct.VertexLayout.html#method.push
/// [`VertexArray::add_buffer`]: struct.VertexArray.html#method.add_buffer
#[derive(Debug, Clone, Default)]
pub struct VertexLayout {
    elements: Vec<LayoutElement>,
    stride: usize,
}

/// One attribute of a [`VertexLayout`](struct.VertexLayout.html).
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// The number of primitives this attribute serves to shaders.
    pub primitives: usize,
    /// The GL primitive type, e.g. `gl::FLOAT`.
    pub gl_type: GLenum,
    /// If set, `glVertexAttribIPointer` is used instead of
    /// `glVertexAttribPointer`, so the shader sees an integer type.
    pub integer: bool,
    /// The offset of the first byte of this attribute within a vertex.
    pub offset: usize,
}

impl VertexLayout {
    pub fn new() -> VertexLayout {
        VertexLayout::default()
    }

    /// Appends an attribute of `count` primitives of type `T` to this layout.
    /// Returns `self` so pushes can be chained.
    pub fn push<T: GlPrimitive>(&mut self, count: usize) -> &mut VertexLayout {
        self.elements.push(LayoutElement {
            primitives: count,
            gl_type: T::gl_enum(),
            integer: T::is_integer(),
            offset: self.stride,
        });
        self.stride += count * mem::size_of::<T>();
        self
    }

    /// The distance, in bytes, between two consecutive vertices.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn elements(&self) -> &[LayoutElement] {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_offsets_and_stride() {
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(2).push::<f32>(4);

        assert_eq!(32, layout.stride());

        let offsets: Vec<usize> = layout.elements().iter().map(|e| e.offset).collect();
        assert_eq!(vec![0, 8, 16], offsets);
    }

    #[test]
    fn layout_mixed_types() {
        let mut layout = VertexLayout::new();
        layout.push::<f32>(3).push::<u8>(4).push::<i16>(2);

        assert_eq!(3 * 4 + 4 + 2 * 2, layout.stride());

        let elements = layout.elements();
        assert_eq!(gl::FLOAT, elements[0].gl_type);
        assert!(!elements[0].integer);
        assert_eq!(12, elements[1].offset);
        assert!(elements[1].integer);
        assert_eq!(gl::UNSIGNED_BYTE, elements[1].gl_type);
        assert_eq!(16, elements[2].offset);
        assert_eq!(gl::SHORT, elements[2].gl_type);
    }

    #[test]
    fn empty_layout() {
        let layout = VertexLayout::new();
        assert_eq!(0, layout.stride());
        assert!(layout.elements().is_empty());
    }
}
