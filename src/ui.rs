
//! Immediate mode gui. See [`ui::Ui`](struct.Ui.html) for more info.

use std::collections::HashMap;
use std::fmt::Write;
use std::ops::Range;

use glam::{Mat4, UVec2, Vec2};

use crate::buffer::{BufferUsage, PrimitiveMode, Vertex, VertexArray, VertexBuffer, VertexLayout};
use crate::color::Color;
use crate::font::Font;
use crate::graphics::{self, BlendSettings};
use crate::input::{Input, KeyState};
use crate::shader::{Shader, ShaderError};

const FONT_SIZE: f32 = 14.0;

/// A immediate mode gui overlay. Widgets are declared every frame, between
/// [`update`] and [`draw`], and report interactions through their return
/// values:
///
/// ```rust,ignore
/// ui.update(&input, state.win_size);
/// if ui.button("Restart") {
///     restart();
/// }
/// speed = ui.slider("Speed", 0.0..2.0);
/// ui.draw();
/// ```
///
/// Positions are in pixels, with the origin in the top left corner of the
/// window.
///
/// [`update`]: struct.Ui.html#method.update
/// [`draw`]: struct.Ui.html#method.draw
pub struct Ui {
    pub style: Style,

    font: Font,
    shader: Shader,
    draw_data: Vec<Vert>,
    draw_vbo: VertexBuffer<Vert>,
    vertex_array: VertexArray,
    projection: Mat4,

    caret: Vec2,
    caret_start: Vec2,
    line_size: f32,
    line_dir: LineDir,
    held: Option<Id>,

    internal_fmt_string: String,
    slider_map: HashMap<Id, f32>,
    toggle_map: HashMap<Id, bool>,

    // Input state, copied out of `Input` each frame
    mouse_pos: Vec2,
    mouse_state: KeyState,
}

impl Ui {
    /// Creates a new imediate mode gui system which draws its text with the
    /// given font. The ui takes ownership of the font.
    pub fn new(font: Font) -> Result<Ui, ShaderError> {
        let shader = Shader::from_source(VERT_SRC, FRAG_SRC)?;

        let draw_vbo = VertexBuffer::with_capacity(BufferUsage::DynamicDraw, 500);
        let mut vertex_array = VertexArray::new();
        vertex_array.add_typed_buffer(&draw_vbo);

        Ok(Ui {
            style: Default::default(),

            font,
            shader,
            draw_data: Vec::with_capacity(500),
            draw_vbo,
            vertex_array,
            projection: Mat4::IDENTITY,

            caret: Vec2::ZERO,
            caret_start: Vec2::ZERO,
            line_size: 0.0,
            line_dir: LineDir::Vertical,
            held: None,

            internal_fmt_string: String::new(),
            slider_map: HashMap::new(),
            toggle_map: HashMap::new(),

            mouse_pos: Vec2::ZERO,
            mouse_state: KeyState::Up,
        })
    }

    /// Updates this imgui system. This should be called once per frame,
    /// before any of the widget functions.
    pub fn update(&mut self, input: &Input, window_size: UVec2) {
        let (width, height) = (window_size.x as f32, window_size.y as f32);
        // Top left corner of the window is (0, 0), y grows downwards
        self.projection = Mat4::orthographic_rh_gl(0.0, width, height, 0.0, -1.0, 1.0);

        self.mouse_pos = input.mouse_pos();
        self.mouse_state = input.mouse_key(0);

        if self.mouse_state.up() && !self.mouse_state.released() {
            self.held = None;
        }

        self.caret = Vec2::ZERO;
        self.caret_start = Vec2::ZERO;
        self.line_size = 0.0;
    }

    /// Shows all widgets declared since the last call to `draw`. This binds
    /// its own shaders and enables blending; it does not reset the state it
    /// changes.
    pub fn draw(&mut self) {
        graphics::set_blending(Some(BlendSettings::default()));

        self.draw_vbo.clear();
        self.draw_vbo.put_at_start(&self.draw_data);
        self.draw_data.clear();

        self.shader.set_uniform("u_mvp", self.projection);
        self.vertex_array.draw(PrimitiveMode::Triangles, 0..self.draw_vbo.len());

        self.font.draw(self.projection);
    }

    /// Moves the internal caret to the given position. Consecutive widgets
    /// are inserted at the caret.
    pub fn set_caret(&mut self, pos: Vec2, line_dir: LineDir) {
        self.caret = pos;
        self.caret_start = pos;
        self.line_dir = line_dir;
        self.line_size = 0.0;
    }

    /// Advances the caret to the next line. The direction of a line depends
    /// on the line direction set by [`set_caret`].
    ///
    /// [`set_caret`]: struct.Ui.html#method.set_caret
    pub fn next_line(&mut self) {
        match self.line_dir {
            LineDir::Vertical => {
                self.caret.x += self.line_size + self.style.line_spacing;
                self.caret.y = self.caret_start.y;
                self.line_size = 0.0;
            },
            LineDir::Horizontal => {
                self.caret.y += self.line_size + self.style.line_spacing;
                self.caret.x = self.caret_start.x;
                self.line_size = 0.0;
            },
        }
    }

    /// Shows a piece of text without any backing widget.
    pub fn label(&mut self, text: &str) {
        let width = self.font.width(text, FONT_SIZE);
        let height = self.default_height();
        let pos = self.caret;
        self.advance_caret(width, height);

        let baseline = pos + Vec2::new(0.0, height - self.text_v_offset());
        self.font.queue(text, FONT_SIZE, baseline, self.style.text_color);
    }

    /// Shows a new button with the given text. Returns true if the button was
    /// clicked this frame. Note that this function needs to be called every
    /// frame you want to see the button.
    pub fn button(&mut self, text: &str) -> bool {
        let id = Id::from_str(text, CompType::Button);

        let width = self.font.width(text, FONT_SIZE) + self.style.internal_padding.x;
        let height = self.default_height();
        let pos = self.caret;
        self.advance_caret(width, height);

        let hovered = self.hovered(pos, width, height);
        if hovered && self.mouse_state.pressed() {
            self.held = Some(id);
        }

        let color = if self.held == Some(id) {
            self.style.hold_color
        } else if hovered {
            self.style.hover_color
        } else {
            self.style.base_color
        };
        self.draw_comp(pos, width, height, color, text, Alignment::Left);

        self.held == Some(id) && hovered && self.mouse_state.released()
    }

    /// Creates a new slider that allows selecting values from the given
    /// range. Returns the currently selected value.
    pub fn slider(&mut self, text: &str, range: Range<f32>) -> f32 {
        let id = Id::from_str(text, CompType::Slider);
        let mut value = *self.slider_map.entry(id).or_insert((range.start + range.end) / 2.0);

        let width = self.style.default_comp_width;
        let height = self.default_height();
        let pos = self.caret;
        self.advance_caret(width, height);

        let hovered = self.hovered(pos, width, height);
        if hovered && self.mouse_state.pressed() {
            self.held = Some(id);
        }

        let knob_size = {
            let size = height - self.style.internal_padding.y;
            Vec2::new(size, size)
        };
        let slide_distance = width - self.style.internal_padding.x - knob_size.x;

        if self.held == Some(id) {
            let mut norm = (self.mouse_pos.x - pos.x - self.style.internal_padding.x/2.0 - knob_size.x/2.0) / slide_distance;
            if norm > 1.0 { norm = 1.0 }
            if norm < 0.0 { norm = 0.0 }
            value = range.start + norm*(range.end - range.start);

            self.slider_map.insert(id, value);
        }

        let knob_pos = {
            let norm_value = (value - range.start) / (range.end - range.start);
            pos + Vec2::new(
                self.style.internal_padding.x/2.0 + norm_value*slide_distance,
                self.style.internal_padding.y/2.0,
            )
        };

        self.internal_fmt_string.clear();
        let _ = write!(self.internal_fmt_string, "{}: {:.2}", text, value);

        // Main bar
        let color = if hovered { self.style.hover_color } else { self.style.base_color };
        let label = self.internal_fmt_string.clone();
        self.draw_comp(pos, width, height, color, &label, Alignment::Center);
        // Slidy thing
        let color = if self.held == Some(id) { self.style.top_hold_color } else { self.style.top_color };
        quad(&mut self.draw_data, knob_pos, knob_size, color);

        value
    }

    /// Creates a new on/off switch with the given text. Returns true while
    /// the switch is on. Clicking the switch flips it.
    pub fn toggle(&mut self, text: &str) -> bool {
        let id = Id::from_str(text, CompType::Toggle);
        let mut value = *self.toggle_map.entry(id).or_insert(false);

        let height = self.default_height();
        let box_size = height;
        let width = box_size + self.style.internal_padding.x/2.0 + self.font.width(text, FONT_SIZE);
        let pos = self.caret;
        self.advance_caret(width, height);

        let hovered = self.hovered(pos, width, height);
        if hovered && self.mouse_state.pressed() {
            self.held = Some(id);
        }
        if self.held == Some(id) && hovered && self.mouse_state.released() {
            value = !value;
            self.toggle_map.insert(id, value);
        }

        let color = if hovered { self.style.hover_color } else { self.style.base_color };
        quad(&mut self.draw_data, pos, Vec2::new(box_size, box_size), color);

        if value {
            let inset = self.style.internal_padding.y/2.0;
            let mark_pos = pos + Vec2::new(inset, inset);
            let mark_size = Vec2::new(box_size - 2.0*inset, box_size - 2.0*inset);
            quad(&mut self.draw_data, mark_pos, mark_size, self.style.top_color);
        }

        let baseline = pos + Vec2::new(
            box_size + self.style.internal_padding.x/2.0,
            height - self.text_v_offset(),
        );
        self.font.queue(text, FONT_SIZE, baseline, self.style.text_color);

        value
    }

    fn draw_comp(&mut self, pos: Vec2, width: f32, height: f32, color: Color, text: &str, alignment: Alignment) {
        quad(&mut self.draw_data, pos, Vec2::new(width, height), color);

        let text_v_offset = self.text_v_offset();
        let text_pos = match alignment {
            Alignment::Left => {
                pos + Vec2::new(self.style.internal_padding.x/2.0, height - text_v_offset)
            },
            Alignment::Center => {
                let text_width = self.font.width(text, FONT_SIZE);
                pos + Vec2::new(width/2.0 - text_width/2.0, height - text_v_offset)
            },
            Alignment::Right => {
                let text_width = self.font.width(text, FONT_SIZE);
                pos + Vec2::new(width - self.style.internal_padding.x/2.0 - text_width, height - text_v_offset)
            },
        };
        self.font.queue(text, FONT_SIZE, text_pos, self.style.text_color);
    }

    fn hovered(&self, pos: Vec2, width: f32, height: f32) -> bool {
        self.mouse_pos.x > pos.x && self.mouse_pos.y > pos.y &&
        self.mouse_pos.x < pos.x + width && self.mouse_pos.y < pos.y + height
    }

    // Distance from the bottom of a widget to the text baseline
    fn text_v_offset(&self) -> f32 {
        self.style.internal_padding.y/2.0 - self.font.descent(FONT_SIZE)
    }

    fn advance_caret(&mut self, comp_width: f32, comp_height: f32) {
        match self.line_dir {
            LineDir::Vertical => {
                self.caret.y += comp_height + self.style.line_spacing;
                self.line_size = f32::max(comp_width, self.line_size);
            },
            LineDir::Horizontal => {
                self.caret.x += comp_width + self.style.line_spacing;
                self.line_size = f32::max(comp_height, self.line_size);
            },
        }
    }

    fn default_height(&self) -> f32 {
        self.font.line_height(FONT_SIZE) + self.style.internal_padding.y
    }
}

/// The colors and spacing used when drawing widgets.
#[derive(Clone, Debug)]
pub struct Style {
    pub base_color: Color,
    pub hover_color: Color,
    pub hold_color: Color,
    pub top_color: Color,
    pub top_hold_color: Color,
    pub text_color: Color,

    pub internal_padding: Vec2,
    pub line_spacing: f32,
    pub default_comp_width: f32,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            base_color:      Color::hex_int(0x4c4665),
            hover_color:     Color::hex_int(0x575074),
            hold_color:      Color::hex_int(0x413c56),
            top_color:       Color::hex_int(0x403147),
            top_hold_color:  Color::hex_int(0x2a2738),
            text_color:      Color::hex_int(0xffffff),

            internal_padding: Vec2::new(10.0, 6.0),
            line_spacing: 5.0,
            default_comp_width: 150.0,
        }
    }
}

pub enum LineDir {
    /// Widgets are layed out below each other
    Vertical,
    /// Widgets are layed out side by side
    Horizontal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Alignment {
    Left, Center, Right,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Id(u64, CompType);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
enum CompType {
    Button,
    Slider,
    Toggle,
}

impl Id {
    fn from_str(text: &str, ty: CompType) -> Id {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let id = hasher.finish();

        Id(id, ty)
    }
}

#[derive(Debug, Copy, Clone)]
#[repr(C)]
struct Vert {
    pos: Vec2,
    color: Color,
}

impl Vertex for Vert {
    fn layout() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(4);
        layout
    }
}

fn quad(buf: &mut Vec<Vert>, pos: Vec2, size: Vec2, color: Color) {
    let min = pos;
    let max = pos + size;

    buf.push(Vert { pos: Vec2::new(min.x, min.y), color });
    buf.push(Vert { pos: Vec2::new(max.x, min.y), color });
    buf.push(Vert { pos: Vec2::new(max.x, max.y), color });

    buf.push(Vert { pos: Vec2::new(min.x, min.y), color });
    buf.push(Vert { pos: Vec2::new(max.x, max.y), color });
    buf.push(Vert { pos: Vec2::new(min.x, max.y), color });
}

const VERT_SRC: &str = "
    #version 330 core

    layout(location = 0) in vec2 a_pos;
    layout(location = 1) in vec4 a_color;

    out vec4 v_color;

    uniform mat4 u_mvp;

    void main() {
        gl_Position = u_mvp * vec4(a_pos, 0.0, 1.0);
        v_color = a_color;
    }
";

const FRAG_SRC: &str = "
    #version 330 core

    in vec4 v_color;
    out vec4 color;

    void main() {
        color = v_color;
    }
";
