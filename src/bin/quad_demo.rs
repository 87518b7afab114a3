
//! Draws a textured quad, with a debug ui overlay for poking at it. The
//! fragment shader can be edited while the demo is running, it is reloaded
//! automatically.

use std::fmt::Write;

use anyhow::Context;
use glam::Vec2;
use log::error;

use kvarts::buffer::{BufferUsage, IndexBuffer, PrimitiveMode, VertexArray, VertexBuffer, VertexLayout};
use kvarts::font::Font;
use kvarts::graphics::{self, BlendSettings};
use kvarts::shader::Shader;
use kvarts::texture::Texture;
use kvarts::ui::{LineDir, Ui};
use kvarts::{Color, Game, GameState, Input, Key, Renderer};

fn main() {
    env_logger::init();
    kvarts::run::<QuadDemo>();
}

#[derive(Debug, Copy, Clone)]
#[repr(C)]
struct QuadVert {
    pos: [f32; 2],
    uv: [f32; 2],
}

struct QuadDemo {
    renderer: Renderer,

    vertex_array: VertexArray,
    #[allow(dead_code)] // Kept alive so the vertex array stays valid
    vertex_buffer: VertexBuffer<QuadVert>,
    indices: IndexBuffer<u32>,
    shader: Shader,
    #[allow(dead_code)] // Kept alive so the shader keeps sampling it
    texture: Texture,

    ui: Ui,

    red: f32,
    red_step: f32,
    paused: bool,
    show_quad: bool,
    clicks: u32,
}

impl Game for QuadDemo {
    fn setup(_state: &mut GameState) -> anyhow::Result<QuadDemo> {
        graphics::set_blending(Some(BlendSettings::default()));

        let vertices = [
            QuadVert { pos: [-0.5, -0.5], uv: [0.0, 0.0] },
            QuadVert { pos: [ 0.5, -0.5], uv: [1.0, 0.0] },
            QuadVert { pos: [ 0.5,  0.5], uv: [1.0, 1.0] },
            QuadVert { pos: [-0.5,  0.5], uv: [0.0, 1.0] },
        ];
        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

        let vertex_buffer = VertexBuffer::with_data(BufferUsage::StaticDraw, &vertices);
        let index_buffer = IndexBuffer::with_data(BufferUsage::StaticDraw, &indices);

        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(2);
        let mut vertex_array = VertexArray::new();
        vertex_array.add_buffer(&vertex_buffer, &layout);

        let texture = Texture::from_file("res/textures/logo.png")
            .context("Could not load quad texture")?;
        texture.bind(0);

        let mut shader = Shader::from_file("res/shaders/basic.shader")
            .context("Could not load quad shader")?;
        shader.set_uniform("u_texture", 0i32);

        let font = Font::from_file("res/fonts/DejaVuSans.ttf")
            .context("Could not load ui font")?;
        let ui = Ui::new(font)?;

        Ok(QuadDemo {
            renderer: Renderer::new(),

            vertex_array,
            vertex_buffer,
            indices: index_buffer,
            shader,
            texture,

            ui,

            red: 0.0,
            red_step: 0.05,
            paused: false,
            show_quad: true,
            clicks: 0,
        })
    }

    fn update(&mut self, delta: u32, state: &mut GameState, input: &Input) {
        if input.key(Key::Escape).pressed() {
            state.exit = true;
        }

        // Pick up edits to the shader file
        match self.shader.reload() {
            Ok(_) => {},
            Err(err) => error!("Could not reload shader: {}", err),
        }

        self.ui.update(input, state.win_size);
        self.ui.set_caret(Vec2::new(10.0, 10.0), LineDir::Vertical);

        let mut fmt = String::new();
        let _ = write!(fmt, "Frame time: {} ms", delta);
        self.ui.label(&fmt);

        let speed = self.ui.slider("Pulse speed", 0.0..0.2);
        self.paused = self.ui.toggle("Pause pulse");
        self.show_quad = !self.ui.toggle("Hide quad");

        if self.ui.button("Count me") {
            self.clicks += 1;
        }
        if self.clicks > 0 {
            let mut fmt = String::new();
            let _ = write!(fmt, "Clicked {} times", self.clicks);
            self.ui.label(&fmt);
        }

        if !self.paused {
            self.red_step = speed.copysign(self.red_step);
            self.red += self.red_step;
            if self.red > 1.0 {
                self.red = 1.0;
                self.red_step = -self.red_step;
            } else if self.red < 0.0 {
                self.red = 0.0;
                self.red_step = -self.red_step;
            }
        }
    }

    fn draw(&mut self, _state: &GameState) {
        self.renderer.clear(Color::hex_int(0x102030));

        if self.show_quad {
            self.shader.set_uniform("u_color", (self.red, 0.3, 0.8, 1.0));
            self.renderer.draw(PrimitiveMode::Triangles, &self.vertex_array, &self.indices, &self.shader);
        }

        self.ui.draw();
    }

    fn name() -> &'static str { "Textured quad" }
}
