//! Window lifecycle and event dispatch.
//!
//! The event loop owns the [`Scene`] and feeds it commands resolved by
//! the input tables; rendering happens on `RedrawRequested` with a
//! redraw requested every pass, so the viewer runs continuously.

pub mod input;
pub mod timing;

use std::path::Path;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::render::{RenderContext, RenderError};
use crate::scene::config::ViewerConfig;
use crate::scene::Scene;

use timing::FrameTiming;

const WINDOW_SIZE: u32 = 640;
const WINDOW_TITLE: &str = "meshview";
const CONFIG_PATH: &str = "meshview.json";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub fn run() -> Result<(), AppError> {
    let config = ViewerConfig::load_or_default(Path::new(CONFIG_PATH));
    let asset_root = std::env::current_dir().unwrap_or_default();
    let scene = Scene::new(config, asset_root);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;

    // Failures inside the loop (adapter/device/surface) surface here
    // so main can exit nonzero.
    match app.fatal.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

struct App {
    scene: Scene,
    window: Option<Arc<Window>>,
    render: Option<RenderContext>,
    timing: FrameTiming,
    cursor: PhysicalPosition<f64>,
    pending_pick: Option<(u32, u32)>,
    fatal: Option<AppError>,
}

impl App {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            window: None,
            render: None,
            timing: FrameTiming::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            pending_pick: None,
            fatal: None,
        }
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render) = self.render.as_mut() else {
            return;
        };
        let pick = self.pending_pick.take();
        match render.render(&self.scene, pick) {
            Ok(Some(hit)) => self.scene.apply_pick(hit),
            Ok(None) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::Timeout)) => {
                log::warn!("surface timeout, skipping frame");
            }
            Err(e) => {
                self.abort(event_loop, e.into());
                return;
            }
        }
        if let (Some(fps), Some(window)) = (self.timing.tick(), self.window.as_ref()) {
            window.set_title(&format!("{WINDOW_TITLE} - {fps:.1} fps"));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.abort(event_loop, e.into()),
        };
        match RenderContext::new(window.clone()) {
            Ok(render) => {
                self.render = Some(render);
                self.window = Some(window);
            }
            Err(e) => self.abort(event_loop, e.into()),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render) = self.render.as_mut() {
                    render.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.pending_pick = Some((self.cursor.x as u32, self.cursor.y as u32));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(command) = input::command_for_key(code, self.scene.operation_mode)
                else {
                    return;
                };
                if let Err(e) = self.scene.apply(command) {
                    log::warn!("{e}");
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
