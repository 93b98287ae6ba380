/*!
Desktop frontend: winit window + pixels surface.

Responsibilities:
- Create one window at an integer upscale of the 240x160 playfield and a
  `pixels` surface matching the playfield resolution.
- Translate keyboard state into the game's button masks (arrows or W/S;
  Escape quits).
- On each redraw: wait for the vblank pacer, run one game tick, expand the
  frame buffer into the surface, present.

The game itself never sees any of this; it only sees button state and its
own frame buffer.
*/

use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::clock::{FixedRateVBlank, VBlank};
use crate::frame_buffer::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::game::Game;
use crate::input::Button;

// Integer upscale of the playfield.
const WINDOW_SCALE: u32 = 3;

struct App {
    game: Game,
    vblank: FixedRateVBlank,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
}

impl App {
    fn new(game: Game) -> Self {
        Self {
            game,
            vblank: FixedRateVBlank::new(),
            window: None,
            pixels: None,
        }
    }
}

fn map_key(key: KeyCode) -> Option<Button> {
    match key {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Button::Up),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Button::Down),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let size = LogicalSize::new(
            (SCREEN_WIDTH as u32 * WINDOW_SCALE) as f64,
            (SCREEN_HEIGHT as u32 * WINDOW_SCALE) as f64,
        );
        let attributes = Window::default_attributes()
            .with_title("advance-rally")
            .with_inner_size(size)
            .with_min_inner_size(LogicalSize::new(SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface_size = window.inner_size();
        let surface = SurfaceTexture::new(surface_size.width, surface_size.height, window.clone());
        match Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface) {
            Ok(pixels) => self.pixels = Some(pixels),
            Err(e) => {
                log::error!("failed to create pixel surface: {e}");
                event_loop.exit();
                return;
            }
        }

        log::info!(
            "window created: {}x{} at {WINDOW_SCALE}x scale",
            SCREEN_WIDTH,
            SCREEN_HEIGHT
        );
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(pixels) = self.pixels.as_mut() {
                        if let Err(e) = pixels.resize_surface(size.width, size.height) {
                            log::error!("surface resize failed: {e}");
                            event_loop.exit();
                        }
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if code == KeyCode::Escape && event.state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                // Key repeats re-assert the held level, which the input
                // port's edge derivation already ignores.
                if let Some(button) = map_key(code) {
                    self.game
                        .set_button(button, event.state == ElementState::Pressed);
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(pixels) = self.pixels.as_mut() else {
                    return;
                };
                self.vblank.wait();
                self.game.tick();
                self.game.frame_buffer().write_rgba(pixels.frame_mut());
                if let Err(e) = pixels.render() {
                    log::error!("render failed: {e}");
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

/// Run the windowed frontend until the window closes or Escape is pressed.
pub fn run(game: Game) -> Result<(), String> {
    let event_loop = EventLoop::new().map_err(|e| format!("failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(game);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("event loop error: {e}"))
}
