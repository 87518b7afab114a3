
use gl::types::*;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Types which can be passed to a shader uniform through
/// [`Shader::set_uniform`](struct.Shader.html#method.set_uniform).
pub trait UniformValue: Sized {
    /// Passes the given value to the uniform at the given location. The
    /// shader which owns the location must be bound when this is called.
    unsafe fn set_uniform(value: &Self, location: GLint);
}

impl UniformValue for f32 {
    unsafe fn set_uniform(value: &f32, location: GLint) {
        gl::Uniform1f(location, *value);
    }
}
impl UniformValue for i32 {
    unsafe fn set_uniform(value: &i32, location: GLint) {
        gl::Uniform1i(location, *value);
    }
}
impl UniformValue for u32 {
    unsafe fn set_uniform(value: &u32, location: GLint) {
        gl::Uniform1ui(location, *value);
    }
}

impl UniformValue for (f32, f32) {
    unsafe fn set_uniform(value: &(f32, f32), location: GLint) {
        gl::Uniform2f(location, value.0, value.1);
    }
}
impl UniformValue for (f32, f32, f32) {
    unsafe fn set_uniform(value: &(f32, f32, f32), location: GLint) {
        gl::Uniform3f(location, value.0, value.1, value.2);
    }
}
impl UniformValue for (f32, f32, f32, f32) {
    unsafe fn set_uniform(value: &(f32, f32, f32, f32), location: GLint) {
        gl::Uniform4f(location, value.0, value.1, value.2, value.3);
    }
}

impl UniformValue for Vec2 {
    unsafe fn set_uniform(value: &Vec2, location: GLint) {
        gl::Uniform2f(location, value.x, value.y);
    }
}
impl UniformValue for Vec3 {
    unsafe fn set_uniform(value: &Vec3, location: GLint) {
        gl::Uniform3f(location, value.x, value.y, value.z);
    }
}
impl UniformValue for Vec4 {
    unsafe fn set_uniform(value: &Vec4, location: GLint) {
        gl::Uniform4f(location, value.x, value.y, value.z, value.w);
    }
}
impl UniformValue for Mat4 {
    unsafe fn set_uniform(value: &Mat4, location: GLint) {
        let data = value.to_cols_array();
        gl::UniformMatrix4fv(location, 1, false as GLboolean, data.as_ptr());
    }
}
