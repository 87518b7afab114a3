
//! Safe wrappers for global OpenGL state changes.

use std::ffi::CStr;

use gl::types::*;
use log::error;

use crate::color::Color;

/// Sets the OpenGL viewport.
pub fn viewport(x: u32, y: u32, width: u32, height: u32) {
    unsafe {
        gl::Viewport(x as GLint, y as GLint, width as GLsizei, height as GLsizei);
    }
}

/// Clears the currently bound framebuffer. If no color is given the color
/// buffer is left alone.
pub fn clear(color: Option<Color>, depth: bool, stencil: bool) {
    unsafe {
        if let Some(color) = color {
            gl::ClearColor(color.r, color.g, color.b, color.a);
        }
        let mut mask = 0;
        if color.is_some() { mask |= gl::COLOR_BUFFER_BIT }
        if depth           { mask |= gl::DEPTH_BUFFER_BIT }
        if stencil         { mask |= gl::STENCIL_BUFFER_BIT }
        gl::Clear(mask);
    }
}

/// If passed `Some` enables the given blend settings. If passed `None`
/// disables blending.
pub fn set_blending(blending: Option<BlendSettings>) {
    unsafe {
        if let Some(settings) = blending {
            gl::Enable(gl::BLEND);

            gl::BlendFuncSeparate(
                settings.src_color as GLenum,
                settings.dst_color as GLenum,
                settings.src_alpha as GLenum,
                settings.dst_alpha as GLenum,
            );
            gl::BlendEquation(settings.function as GLenum);
        } else {
            gl::Disable(gl::BLEND);
        }
    }
}

/// Logs all pending OpenGL errors. Call this once per frame; the driver
/// accumulates errors until someone polls them.
pub fn print_errors() {
    unsafe {
        while let Some(error) = get_error_message(gl::GetError()) {
            error!("OpenGL error: {}", error);
        }
    }
}

fn get_error_message(error: GLenum) -> Option<String> {
    let value = match error {
        gl::INVALID_VALUE                   => "Invalid value",
        gl::INVALID_ENUM                    => "Invalid enum",
        gl::INVALID_OPERATION               => "Invalid operation",
        gl::INVALID_FRAMEBUFFER_OPERATION   => "Invalid framebuffer operation",
        gl::OUT_OF_MEMORY                   => "Out of memory",

        gl::NO_ERROR                        => return None,
        _                                   => return Some(format!("Invalid error code: {:x}", error)),
    };
    Some(String::from(value))
}

/// The version string of the current OpenGL context.
pub fn version() -> String {
    unsafe {
        let ptr = gl::GetString(gl::VERSION);
        if ptr.is_null() {
            return String::from("unknown (no current context?)");
        }
        CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
    }
}

/// Settings used to define OpenGL blend state. You should create a pair of
/// settings for every operation which uses blending, and apply those settings
/// before rendering with [`set_blending`].
///
/// This struct implements `Default`, which gives standard alpha blending.
#[derive(Debug, Clone, Copy)]
pub struct BlendSettings {
    pub src_color: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_color: BlendFactor,
    pub dst_alpha: BlendFactor,
    pub function:  BlendFunction,
}

impl Default for BlendSettings {
    fn default() -> BlendSettings {
        BlendSettings {
            src_color: BlendFactor::SrcAlpha,
            dst_color: BlendFactor::OneMinusSrcAlpha,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
            function:  BlendFunction::Add,
        }
    }
}

#[repr(u32)] // GLenum is u32
#[derive(Copy, Clone, Debug)]
pub enum BlendFactor {
    Zero                    = gl::ZERO,
    One                     = gl::ONE,
    SrcColor                = gl::SRC_COLOR,
    OneMinusSrcColor        = gl::ONE_MINUS_SRC_COLOR,
    DstColor                = gl::DST_COLOR,
    OneMinusDstColor        = gl::ONE_MINUS_DST_COLOR,
    SrcAlpha                = gl::SRC_ALPHA,
    OneMinusSrcAlpha        = gl::ONE_MINUS_SRC_ALPHA,
    DstAlpha                = gl::DST_ALPHA,
    OneMinusDstAlpha        = gl::ONE_MINUS_DST_ALPHA,
}

#[repr(u32)] // GLenum is u32
#[derive(Copy, Clone, Debug)]
pub enum BlendFunction {
    /// `Src + Dst`
    Add             = gl::FUNC_ADD,
    /// `Src - Dst`
    Subtract        = gl::FUNC_SUBTRACT,
    /// `Dst - Src`
    ReverseSubtract = gl::FUNC_REVERSE_SUBTRACT,
    /// `min(Dst, Src)`
    Min             = gl::MIN,
    /// `max(Dst, Src)`
    Max             = gl::MAX,
}
