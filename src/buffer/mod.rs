
//! Utilities for storing and drawing data in GPU buffers.

mod primitives;
mod vertex_buffer;
mod index_buffer;
mod vertex_array;

pub use self::primitives::*;
pub use self::vertex_buffer::*;
pub use self::index_buffer::*;
pub use self::vertex_array::*;
