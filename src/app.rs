use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::{error, info};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::clock::FrameClock;
use crate::config::SceneLayout;
use crate::input::{InputState, KeyCode, NamedKey};
use crate::render::{Lighting, Renderer};
use crate::scene::Scene;

pub const WINDOW_TITLE: &str = "Orrery";
pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;

/// Failure to bring up the windowing or GPU stack.
///
/// Callers downcast to this to decide whether a headless run is an
/// acceptable substitute.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

/// Runs the interactive viewer until the window closes.
///
/// Returns `WindowInitError` (wrapped in `anyhow`) when the display or
/// GPU cannot be brought up, so the caller can fall back to a headless
/// run instead of treating it as fatal.
pub fn run_interactive(layout: SceneLayout) -> Result<()> {
    // Some platforms panic instead of returning an error here
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        layout,
        input: InputState::new(),
        state: None,
        init_error: None,
        last_error: None,
    };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(err) = app.init_error {
        return Err(err.into());
    }
    if let Some(err) = app.last_error {
        return Err(err);
    }
    Ok(())
}

struct App {
    layout: SceneLayout,
    input: InputState,
    state: Option<RunningState>,
    init_error: Option<WindowInitError>,
    last_error: Option<anyhow::Error>,
}

struct RunningState {
    renderer: Renderer,
    scene: Scene,
    clock: FrameClock,
    lighting: Lighting,
}

impl App {
    fn redraw(&mut self) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };

        let t = state.clock.tick();
        state.scene.update(t, &self.input);
        state
            .renderer
            .update_globals(state.scene.active_camera(), &state.lighting);

        let draw_list = state.scene.draw_list();
        if let Err(err) = state.renderer.render(&draw_list, state.scene.fill) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = state.renderer.size();
                    state.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("surface timeout; retrying next frame");
                }
                other => {
                    error!("surface error: {other:?}");
                }
            }
        }
        state.renderer.window().request_redraw();
        Ok(())
    }

    fn handle_key(&self, event_loop: &ActiveEventLoop, event: &winit::event::KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(key) = map_keycode(code) else {
            return;
        };
        if key == KeyCode::Named(NamedKey::Escape) && event.state == ElementState::Pressed {
            event_loop.exit();
            return;
        }
        match event.state {
            ElementState::Pressed => self.input.set_key_down(key),
            ElementState::Released => self.input.set_key_up(key),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.init_error = Some(WindowInitError::from_error("window", err));
                event_loop.exit();
                return;
            }
        };

        let renderer = match block_on(Renderer::new(Arc::clone(&window))) {
            Ok(renderer) => renderer,
            Err(err) => {
                self.init_error = Some(WindowInitError::from_error("renderer", err));
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let scene = Scene::new(&self.layout, size.width as f32, size.height as f32);

        window.request_redraw();
        self.state = Some(RunningState {
            renderer,
            scene,
            clock: FrameClock::wall(),
            lighting: Lighting::default(),
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self
            .state
            .as_ref()
            .is_some_and(|state| state.renderer.window_id() != window_id)
        {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.renderer.resize(size);
                    state.scene.reshape(size.width as f32, size.height as f32);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(state) = self.state.as_mut() {
                    let size = state.renderer.window().inner_size();
                    state.renderer.resize(size);
                    state.scene.reshape(size.width as f32, size.height as f32);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .set_cursor_position(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.last_error = Some(err);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn map_keycode(code: WinitKey) -> Option<KeyCode> {
    Some(match code {
        WinitKey::Escape => KeyCode::Named(NamedKey::Escape),
        WinitKey::ShiftLeft => KeyCode::Named(NamedKey::LeftShift),
        WinitKey::ShiftRight => KeyCode::Named(NamedKey::RightShift),
        WinitKey::KeyA => KeyCode::Character('A'),
        WinitKey::KeyB => KeyCode::Character('B'),
        WinitKey::KeyC => KeyCode::Character('C'),
        WinitKey::KeyD => KeyCode::Character('D'),
        WinitKey::KeyE => KeyCode::Character('E'),
        WinitKey::KeyF => KeyCode::Character('F'),
        WinitKey::KeyG => KeyCode::Character('G'),
        WinitKey::KeyH => KeyCode::Character('H'),
        WinitKey::KeyI => KeyCode::Character('I'),
        WinitKey::KeyJ => KeyCode::Character('J'),
        WinitKey::KeyK => KeyCode::Character('K'),
        WinitKey::KeyL => KeyCode::Character('L'),
        WinitKey::KeyM => KeyCode::Character('M'),
        WinitKey::KeyN => KeyCode::Character('N'),
        WinitKey::KeyO => KeyCode::Character('O'),
        WinitKey::KeyP => KeyCode::Character('P'),
        WinitKey::KeyQ => KeyCode::Character('Q'),
        WinitKey::KeyR => KeyCode::Character('R'),
        WinitKey::KeyS => KeyCode::Character('S'),
        WinitKey::KeyT => KeyCode::Character('T'),
        WinitKey::KeyU => KeyCode::Character('U'),
        WinitKey::KeyV => KeyCode::Character('V'),
        WinitKey::KeyW => KeyCode::Character('W'),
        WinitKey::KeyX => KeyCode::Character('X'),
        WinitKey::KeyY => KeyCode::Character('Y'),
        WinitKey::KeyZ => KeyCode::Character('Z'),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_uppercase_characters() {
        assert_eq!(map_keycode(WinitKey::KeyW), Some(KeyCode::Character('W')));
        assert_eq!(map_keycode(WinitKey::KeyB), Some(KeyCode::Character('B')));
        assert_eq!(
            map_keycode(WinitKey::ShiftLeft),
            Some(KeyCode::Named(NamedKey::LeftShift))
        );
        assert_eq!(map_keycode(WinitKey::F1), None);
    }
}
