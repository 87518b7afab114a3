
//! Basic types used in all buffers

use gl::types::*;

use super::vertex_array::VertexLayout;

/// Represents different types of primitives which can be drawn on the GPU.
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points          = gl::POINTS,
    LineStrip       = gl::LINE_STRIP,
    LineLoop        = gl::LINE_LOOP,
    Lines           = gl::LINES,
    TriangleStrip   = gl::TRIANGLE_STRIP,
    TriangleFan     = gl::TRIANGLE_FAN,
    Triangles       = gl::TRIANGLES,
}

/// Represents different gl buffer usage hints. Note that these are hints,
/// and drivers will not necessarily respect these.
///
/// The first part of the name indicates how frequently the data will be used:
///
/// * Static - Data is set once and used often
/// * Dynamic - Data is set frequently and used frequently
/// * Stream - Data is set once and used at most a few times
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    StaticDraw  = gl::STATIC_DRAW,
    DynamicDraw = gl::DYNAMIC_DRAW,
    StreamDraw  = gl::STREAM_DRAW,
}

/// This trait is used to mark types which are OpenGL primitives. You should
/// not implement this trait yourself; it is implemented for `f32`, `i32`,
/// `i16`, `i8`, `u32`, `u16` and `u8`.
pub trait GlPrimitive: Sized {
    fn gl_enum() -> GLenum;
    fn is_integer() -> bool;
}

impl GlPrimitive for f32 {
    fn gl_enum() -> GLenum { gl::FLOAT }
    fn is_integer() -> bool { false }
}
impl GlPrimitive for i32 {
    fn gl_enum() -> GLenum { gl::INT }
    fn is_integer() -> bool { true }
}
impl GlPrimitive for i16 {
    fn gl_enum() -> GLenum { gl::SHORT }
    fn is_integer() -> bool { true }
}
impl GlPrimitive for i8 {
    fn gl_enum() -> GLenum { gl::BYTE }
    fn is_integer() -> bool { true }
}
impl GlPrimitive for u32 {
    fn gl_enum() -> GLenum { gl::UNSIGNED_INT }
    fn is_integer() -> bool { true }
}
impl GlPrimitive for u16 {
    fn gl_enum() -> GLenum { gl::UNSIGNED_SHORT }
    fn is_integer() -> bool { true }
}
impl GlPrimitive for u8 {
    fn gl_enum() -> GLenum { gl::UNSIGNED_BYTE }
    fn is_integer() -> bool { true }
}

/// This trait is used to mark types which can be used as indices in a
/// element/index buffer. You should not implement this trait yourself.
///
/// This trait is implemented for `u32`, `u16` and `u8`.
pub trait GlIndex: Sized + GlPrimitive {}

impl GlIndex for u32 {}
impl GlIndex for u16 {}
impl GlIndex for u8 {}

/// Implemented by vertex types which can describe their own attribute layout.
/// [`VertexArray::add_typed_buffer`] uses this to bind a buffer without the
/// caller spelling the layout out.
///
/// The type must be `repr(C)` for the generated layout to match what is
/// actually stored in the buffer.
///
/// # Example
/// ```rust
/// use kvarts::buffer::{Vertex, VertexLayout};
///
/// #[repr(C)]
/// #[derive(Copy, Clone)]
/// struct Vert {
///     pos: [f32; 2],
///     uv: [f32; 2],
/// }
///
/// impl Vertex for Vert {
///     fn layout() -> VertexLayout {
///         let mut layout = VertexLayout::new();
///         layout.push::<f32>(2).push::<f32>(2);
///         layout
///     }
/// }
/// ```
///
/// [`VertexArray::add_typed_buffer`]: struct.VertexArray.html#method.add_typed_buffer
pub trait Vertex: Copy {
    fn layout() -> VertexLayout;
}
