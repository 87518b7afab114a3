
//! 2d texture loading and management

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::ptr;
use std::time::SystemTime;

use gl::types::*;
use log::info;
use thiserror::Error;

use crate::util::loading;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode texture: {0}")]
    Image(#[from] image::ImageError),
}

/// A 2d texture in GPU memory. The GL texture object is deleted when this
/// struct is dropped.
pub struct Texture {
    texture: GLuint,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,

    // Set if this texture was loaded from a file, used by `reload`
    source_file: Option<PathBuf>,
    load_time: Option<SystemTime>,
}

impl Texture {
    /// Creates a texture from the image file at the given location. The image
    /// is flipped vertically while loading, so that texture coordinate (0, 0)
    /// refers to its bottom left corner, the way GL samples it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Texture, TextureError> {
        let mut texture = Texture::new();
        texture.load_file(path.as_ref())?;

        texture.source_file = Some(PathBuf::from(path.as_ref()));
        texture.load_time = Some(SystemTime::now());
        Ok(texture)
    }

    /// Creates a new texture without any ascociated data. Use
    /// [`initialize`](struct.Texture.html#method.initialize) or one of the
    /// `load_*` methods to fill the texture before drawing with it.
    pub fn new() -> Texture {
        let mut texture = 0;
        unsafe {
            gl::GenTextures(1, &mut texture);
            gl::BindTexture(gl::TEXTURE_2D, texture);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, TextureFilter::Nearest as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, TextureFilter::Nearest as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
        }

        Texture {
            texture,
            format: TextureFormat::RGBA_8,
            width: 0,
            height: 0,
            source_file: None,
            load_time: None,
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<(), TextureError> {
        // GL expects the first row of data to be the bottom of the image
        let image = image::open(path)?.flipv().to_rgba8();
        self.load_data(&image, image.width(), image.height(), TextureFormat::RGBA_8);
        Ok(())
    }

    /// Sets the size and format of this texture without writing any data. The
    /// contents are undefined until they are loaded.
    pub fn initialize(&mut self, width: u32, height: u32, format: TextureFormat) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.texture);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D, 0,
                format as GLint,
                width as GLsizei, height as GLsizei, 0,
                format.unsized_format(), gl::UNSIGNED_BYTE,
                ptr::null(),
            );
        }
        self.format = format;
        self.width = width;
        self.height = height;
    }

    /// Replaces the entire contents of this texture, resizing it to fit the
    /// given data. `data` holds one byte per channel, tightly packed rows.
    pub fn load_data(&mut self, data: &[u8], width: u32, height: u32, format: TextureFormat) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.texture);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D, 0,
                format as GLint,
                width as GLsizei, height as GLsizei, 0,
                format.unsized_format(), gl::UNSIGNED_BYTE,
                data.as_ptr() as *const GLvoid,
            );
        }
        self.format = format;
        self.width = width;
        self.height = height;
    }

    /// Writes the given data into a subregion of this texture. The texture
    /// must already be initialized, and the region must lie fully inside it.
    /// The data is interpreted with this texture's current format.
    pub fn load_data_to_region(&mut self, data: &[u8], x: u32, y: u32, width: u32, height: u32) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.texture);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexSubImage2D(
                gl::TEXTURE_2D, 0,
                x as GLint, y as GLint,
                width as GLsizei, height as GLsizei,
                self.format.unsized_format(), gl::UNSIGNED_BYTE,
                data.as_ptr() as *const GLvoid,
            );
        }
    }

    /// Binds this texture to the given texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, self.texture);
        }
    }

    /// Unbinds whatever texture is bound to the given texture unit.
    pub fn unbind(unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
    }

    /// Sets the filters that are applied when this texture is rendered at a
    /// size other than its native size.
    pub fn set_filter(&mut self, mag: TextureFilter, min: TextureFilter) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.texture);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min as GLint);
        }
    }

    /// If this texture was loaded from a file, checks whether the file has
    /// changed on disk and in that case loads it again. When reloading fails
    /// the old contents stay in place and the error is returned.
    ///
    /// Returns `true` if the texture was reloaded.
    pub fn reload(&mut self) -> Result<bool, TextureError> {
        let path = match &self.source_file {
            Some(path) => path.clone(),
            None => return Ok(false),
        };
        let load_time = match self.load_time {
            Some(time) => time,
            None => SystemTime::now(),
        };

        if !loading::modified_since(&path, load_time)? {
            return Ok(false);
        }
        self.load_time = Some(SystemTime::now());

        self.load_file(&path)?;
        info!("Reloaded texture \"{}\"", path.to_string_lossy());
        Ok(true)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.texture);
        }
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source_file", &self.source_file)
            .finish()
    }
}

/// Internal storage formats for textures.
#[repr(u32)] // GLenum is u32
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormat {
    RGBA_8 = gl::RGBA8,
    RGB_8  = gl::RGB8,
    R_8    = gl::R8,
}

impl TextureFormat {
    /// The matching unsized format, used when passing pixel data to GL.
    pub fn unsized_format(self) -> GLenum {
        match self {
            TextureFormat::RGBA_8 => gl::RGBA,
            TextureFormat::RGB_8  => gl::RGB,
            TextureFormat::R_8    => gl::RED,
        }
    }

    /// The number of bytes per pixel of data in this format.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::RGBA_8 => 4,
            TextureFormat::RGB_8  => 3,
            TextureFormat::R_8    => 1,
        }
    }
}

/// Filters that can be applied when a texture is drawn at a size other than
/// its native size.
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest = gl::NEAREST,
    Linear  = gl::LINEAR,
}
