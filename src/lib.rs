
//! A small OpenGL rendering framework. The building blocks are thin RAII
//! wrappers around GL objects ([`buffer`], [`shader`], [`texture`]), a
//! [`Renderer`] which ties them together into draw calls, and an immediate
//! mode debug ui ([`ui`]). [`run`] opens a window and drives a [`Game`].

pub mod color;
pub mod graphics;
pub mod buffer;
pub mod shader;
pub mod texture;
pub mod renderer;
pub mod input;
pub mod font;
pub mod ui;
pub mod util;

pub use crate::color::Color;
pub use crate::input::{Input, Key, KeyState};
pub use crate::renderer::Renderer;

use std::time::Instant;

use glam::UVec2;
use glutin::dpi::LogicalSize;
use glutin::event::{Event, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest};
use log::{error, info};

const DEFAULT_WIN_SIZE: (f64, f64) = (640.0, 480.0);

/// Creates a new window with a OpenGL 3.3 core context and runs the given
/// game in it. This function never returns; when the window is closed the
/// process exits.
///
/// # Example
/// ```rust,no_run
/// use kvarts::{Game, GameState, Input};
///
/// struct Pong {
///     // All data needed for the game is defined here
/// }
///
/// impl Game for Pong {
///     fn setup(_state: &mut GameState) -> anyhow::Result<Pong> {
///         Ok(Pong {})
///     }
///
///     fn update(&mut self, _delta: u32, _state: &mut GameState, _input: &Input) {
///         // All logic goes here
///     }
///
///     fn draw(&mut self, _state: &GameState) {
///         // All rendering goes here
///     }
/// }
///
/// fn main() {
///     kvarts::run::<Pong>();
/// }
/// ```
pub fn run<T: Game + 'static>() -> ! {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(T::name())
        .with_inner_size(LogicalSize::new(DEFAULT_WIN_SIZE.0, DEFAULT_WIN_SIZE.1));

    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(true)
        .build_windowed(window, &event_loop)
        .unwrap();
    let context = unsafe { context.make_current().unwrap() };

    gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);
    info!("OpenGL version: {}", graphics::version());

    // Set up game state
    let mut state = GameState::new();
    state.win_size = {
        let size = context.window().inner_size();
        UVec2::new(size.width, size.height)
    };
    graphics::viewport(0, 0, state.win_size.x, state.win_size.y);

    let mut input = Input::new();

    // Set up game
    let mut game = match T::setup(&mut state) {
        Ok(game) => game,
        Err(err) => {
            error!("Failed to launch game: {:#}", err);
            std::process::exit(1);
        },
    };

    let mut last_frame = Instant::now();
    let mut delta: u32 = 16;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                },
                WindowEvent::Resized(size) => {
                    // Minimizing produces a 0x0 resize, which we ignore
                    if size.width != 0 && size.height != 0 {
                        state.win_size = UVec2::new(size.width, size.height);
                        graphics::viewport(0, 0, size.width, size.height);
                        game.on_resize(&state);
                    }
                },
                other => input.handle_event(&other),
            },

            Event::MainEventsCleared => {
                game.update(delta, &mut state, &input);
                input.refresh();

                if state.exit {
                    *control_flow = ControlFlow::Exit;
                } else {
                    context.window().request_redraw();
                }
            },

            Event::RedrawRequested(..) => {
                game.draw(&state);
                if let Err(err) = context.swap_buffers() {
                    error!("Failed to swap buffers: {}", err);
                }
                graphics::print_errors();

                // Frame pacing is left to vsync, we just measure
                let elapsed = last_frame.elapsed();
                last_frame = Instant::now();
                delta = elapsed.as_secs() as u32 * 1000 + elapsed.subsec_millis();
            },

            Event::LoopDestroyed => game.close(),

            _ => {},
        }
    })
}

/// General info about the currently running game. Passed as a parameter to
/// most [`Game`] methods.
pub struct GameState {
    /// The size of the window in which this game is running, in pixels.
    pub win_size: UVec2,
    /// If set to true the game will exit after the current frame.
    pub exit: bool,
}

impl GameState {
    fn new() -> GameState {
        GameState {
            win_size: UVec2::ZERO,
            exit: false,
        }
    }
}

/// Used with [`run`].
pub trait Game: Sized {
    /// Called before the main loop. Resources and initial state should be set
    /// up here. A GL context is current when this is called.
    fn setup(state: &mut GameState) -> anyhow::Result<Self>;
    /// Called once every frame, before drawing. `delta` is the duration of
    /// the previous frame, in milliseconds.
    fn update(&mut self, delta: u32, state: &mut GameState, input: &Input);
    /// Called once every frame, after updating.
    fn draw(&mut self, state: &GameState);

    /// Called whenever the game window is resized.
    fn on_resize(&mut self, _state: &GameState) {}
    /// Called when the main loop exits. This method is not called if the main
    /// loop panics.
    fn close(&mut self) {} // Most simple games dont need any special logic here

    fn name() -> &'static str { "Unnamed game (override Game::name to change the title)" }
}
