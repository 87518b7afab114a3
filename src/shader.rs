
//! Shader program wrapper, including the combined-source file format.
//!
//! Shaders are stored in a single file with `#shader` marker lines splitting
//! it into sections:
//!
//! ```text
//! #shader vertex
//! #version 330 core
//! ...
//!
//! #shader fragment
//! #version 330 core
//! ...
//! ```

mod uniform;

pub use self::uniform::UniformValue;

use std::collections::HashMap;
use std::ffi::CString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::ptr;
use std::time::SystemTime;

use gl::types::*;
use log::{info, warn};
use thiserror::Error;

use crate::util::loading;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader file: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: unknown shader section \"{name}\"")]
    UnknownSection { line: usize, name: String },

    #[error("line {line}: shader source before the first #shader marker")]
    OrphanSource { line: usize },

    #[error("shader file has no {0} section")]
    MissingSection(&'static str),

    #[error("failed to compile {kind} shader:\n{log}")]
    Compile { kind: &'static str, log: String },

    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
}

/// The vertex and fragment sources of a shader, as split out of a combined
/// shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Splits combined shader source text into its sections. Each section
    /// starts at a line of the form `#shader vertex` or `#shader fragment`
    /// and runs until the next marker or the end of the text.
    ///
    /// Non-empty source before the first marker, unknown section names, and
    /// missing sections are errors.
    pub fn parse(text: &str) -> Result<ShaderSource, ShaderError> {
        enum Section { None, Vertex, Fragment }

        let mut vertex = String::new();
        let mut fragment = String::new();
        let mut section = Section::None;

        for (index, line) in text.lines().enumerate() {
            if let Some(rest) = line.trim().strip_prefix("#shader") {
                section = match rest.trim() {
                    "vertex"   => Section::Vertex,
                    "fragment" => Section::Fragment,
                    name => return Err(ShaderError::UnknownSection {
                        line: index + 1,
                        name: name.to_string(),
                    }),
                };
            } else {
                let target = match section {
                    Section::Vertex   => &mut vertex,
                    Section::Fragment => &mut fragment,
                    Section::None => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        return Err(ShaderError::OrphanSource { line: index + 1 });
                    },
                };
                target.push_str(line);
                target.push('\n');
            }
        }

        if vertex.trim().is_empty() {
            return Err(ShaderError::MissingSection("vertex"));
        }
        if fragment.trim().is_empty() {
            return Err(ShaderError::MissingSection("fragment"));
        }

        Ok(ShaderSource { vertex, fragment })
    }
}

/// A compiled and linked pair of vertex/fragment stages, plus a cache of
/// uniform locations.
///
/// The GL program object is deleted when this struct is dropped. The
/// individual stage objects only live for the duration of linking.
pub struct Shader {
    program: GLuint,
    uniform_cache: HashMap<String, GLint>,

    // Set if this shader was loaded from a file, used by `reload`
    source_file: Option<PathBuf>,
    load_time: Option<SystemTime>,
}

impl Shader {
    /// Reads a combined shader file and builds a program from it. Shaders
    /// created this way can later be [`reload`]ed.
    ///
    /// [`reload`]: struct.Shader.html#method.reload
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Shader, ShaderError> {
        let text = fs::read_to_string(path.as_ref())?;
        let source = ShaderSource::parse(&text)?;

        let mut shader = Shader::from_source(&source.vertex, &source.fragment)?;
        shader.source_file = Some(PathBuf::from(path.as_ref()));
        shader.load_time = Some(SystemTime::now());
        Ok(shader)
    }

    /// Compiles and links the given vertex and fragment sources into a
    /// program.
    pub fn from_source(vertex: &str, fragment: &str) -> Result<Shader, ShaderError> {
        let program = link(vertex, fragment)?;

        Ok(Shader {
            program,
            uniform_cache: HashMap::new(),
            source_file: None,
            load_time: None,
        })
    }

    /// Binds this shader, replacing the previously bound shader. Subsequent
    /// draw calls will use this shader. Note that there is no method provided
    /// to unbind a shader, as it should never be necessary.
    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.program);
        }
    }

    /// Passes the given value to the named uniform of this shader. Uniform
    /// locations are looked up once and then cached by name.
    ///
    /// Setting a uniform which does not exist in the program logs a warning
    /// the first time and is otherwise ignored, so a shader can be edited
    /// without taking the program down.
    pub fn set_uniform<T: UniformValue>(&mut self, name: &str, value: T) {
        self.bind();
        let location = self.uniform_location(name);
        if location != -1 {
            unsafe {
                T::set_uniform(&value, location);
            }
        }
    }

    fn uniform_location(&mut self, name: &str) -> GLint {
        if let Some(&location) = self.uniform_cache.get(name) {
            return location;
        }

        let c_name = CString::new(name).unwrap();
        let location = unsafe { gl::GetUniformLocation(self.program, c_name.as_ptr()) };
        if location == -1 {
            warn!("Uniform \"{}\" does not exist (it might have been optimized out)", name);
        }

        self.uniform_cache.insert(name.to_string(), location);
        location
    }

    /// If this shader was built from a file, checks whether the file has
    /// changed on disk and in that case rebuilds the program. When the new
    /// source fails to parse or compile the old program stays active and the
    /// error is returned.
    ///
    /// Returns `true` if the program was rebuilt.
    pub fn reload(&mut self) -> Result<bool, ShaderError> {
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
        // Even if the new source is broken we dont want to retry every frame
        self.load_time = Some(SystemTime::now());

        let text = fs::read_to_string(&path)?;
        let source = ShaderSource::parse(&text)?;
        let program = link(&source.vertex, &source.fragment)?;

        unsafe {
            gl::DeleteProgram(self.program);
        }
        self.program = program;
        self.uniform_cache.clear();

        info!("Reloaded shader \"{}\"", path.to_string_lossy());
        Ok(true)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.program);
        }
    }
}

fn compile(source: &str, shader_type: GLenum, kind: &'static str) -> Result<GLuint, ShaderError> {
    unsafe {
        let shader = gl::CreateShader(shader_type);

        let c_str = CString::new(source.as_bytes()).unwrap();
        gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
        gl::CompileShader(shader);

        let mut status = gl::FALSE as GLint;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

        if status != (gl::TRUE as GLint) {
            let mut log_len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_len);

            let mut buffer = vec![0u8; log_len as usize];
            gl::GetShaderInfoLog(shader, log_len, ptr::null_mut(), buffer.as_mut_ptr() as *mut GLchar);
            gl::DeleteShader(shader);

            Err(ShaderError::Compile { kind, log: log_to_string(buffer) })
        } else {
            Ok(shader)
        }
    }
}

fn link(vertex: &str, fragment: &str) -> Result<GLuint, ShaderError> {
    unsafe {
        let program = gl::CreateProgram();

        let vertex_shader = compile(vertex, gl::VERTEX_SHADER, "vertex")?;
        gl::AttachShader(program, vertex_shader);

        let fragment_shader = match compile(fragment, gl::FRAGMENT_SHADER, "fragment") {
            Ok(shader) => shader,
            Err(err) => {
                gl::DeleteShader(vertex_shader);
                gl::DeleteProgram(program);
                return Err(err);
            },
        };
        gl::AttachShader(program, fragment_shader);

        gl::LinkProgram(program);

        // The program keeps the stages alive for as long as it needs them
        gl::DeleteShader(vertex_shader);
        gl::DeleteShader(fragment_shader);

        let mut status = gl::FALSE as GLint;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        if status != (gl::TRUE as GLint) {
            let mut log_len = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_len);

            let mut buffer = vec![0u8; log_len as usize];
            gl::GetProgramInfoLog(program, log_len, ptr::null_mut(), buffer.as_mut_ptr() as *mut GLchar);
            gl::DeleteProgram(program);

            return Err(ShaderError::Link { log: log_to_string(buffer) });
        }

        Ok(program)
    }
}

fn log_to_string(mut buffer: Vec<u8>) -> String {
    buffer.retain(|&byte| byte != 0); // The log is null terminated
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_file() {
        let text = "\
#shader vertex
#version 330 core
void main() { gl_Position = vec4(0.0); }
#shader fragment
#version 330 core
out vec4 color;
void main() { color = vec4(1.0); }
";
        let source = ShaderSource::parse(text).unwrap();

        assert!(source.vertex.starts_with("#version 330 core\n"));
        assert!(source.vertex.contains("gl_Position"));
        assert!(!source.vertex.contains("out vec4 color"));

        assert!(source.fragment.starts_with("#version 330 core\n"));
        assert!(source.fragment.contains("out vec4 color"));
        assert!(!source.fragment.contains("gl_Position"));
    }

    #[test]
    fn parse_accepts_leading_blank_lines_and_indented_markers() {
        let text = "

  #shader vertex
a
   #shader fragment
b
";
        let source = ShaderSource::parse(text).unwrap();
        assert_eq!("a\n", source.vertex);
        assert_eq!("b\n", source.fragment);
    }

    #[test]
    fn parse_section_order_does_not_matter() {
        let text = "#shader fragment\nfrag\n#shader vertex\nvert\n";
        let source = ShaderSource::parse(text).unwrap();
        assert_eq!("vert\n", source.vertex);
        assert_eq!("frag\n", source.fragment);
    }

    #[test]
    fn parse_rejects_unknown_section() {
        let text = "#shader vertex\na\n#shader geometry\nb\n";
        match ShaderSource::parse(text) {
            Err(ShaderError::UnknownSection { line, name }) => {
                assert_eq!(3, line);
                assert_eq!("geometry", name);
            },
            other => panic!("expected UnknownSection, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn parse_rejects_source_before_marker() {
        let text = "#version 330 core\n#shader vertex\na\n";
        match ShaderSource::parse(text) {
            Err(ShaderError::OrphanSource { line }) => assert_eq!(1, line),
            other => panic!("expected OrphanSource, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn parse_rejects_missing_sections() {
        match ShaderSource::parse("#shader vertex\na\n") {
            Err(ShaderError::MissingSection("fragment")) => {},
            other => panic!("expected MissingSection, got {:?}", other.map(|_| ())),
        }
        match ShaderSource::parse("#shader fragment\na\n") {
            Err(ShaderError::MissingSection("vertex")) => {},
            other => panic!("expected MissingSection, got {:?}", other.map(|_| ())),
        }
        match ShaderSource::parse("") {
            Err(ShaderError::MissingSection("vertex")) => {},
            other => panic!("expected MissingSection, got {:?}", other.map(|_| ())),
        }
    }
}
