use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::cli::Cli;
use crate::core::clock::Clock;
use crate::error::Error;
use crate::renderer::CubeRenderer;

/// Winit application driving the continuous render loop: every
/// `about_to_wait` requests a redraw, every redraw draws one frame.
pub struct App {
    options: Cli,
    window: Option<Arc<Window>>,
    renderer: Option<CubeRenderer>,
    clock: Clock,
    failure: Option<Error>,
}

impl App {
    pub fn new(options: Cli) -> Self {
        Self {
            options,
            window: None,
            renderer: None,
            clock: Clock::new(),
            failure: None,
        }
    }

    /// The error that stopped the loop, if any; the process exits non-zero
    /// when this is set.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        log::error!("{err}");
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("cube-spin")
            .set_description(err.to_string())
            .show();
        self.failure = Some(err);
        event_loop.exit();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = &self.renderer {
            // Drain so no frame is in flight when resources drop.
            if let Err(e) = renderer.drain() {
                log::error!("drain on shutdown failed: {e}");
            }
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Spinning Cube")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.options.width,
                    self.options.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(
                    event_loop,
                    Error::Initialization(format!("failed to create window: {e}")),
                );
                return;
            }
        };

        match pollster::block_on(CubeRenderer::new(window.clone(), self.options.spin_speed)) {
            Ok(renderer) => {
                self.window = Some(window);
                self.renderer = Some(renderer);
                self.clock.reset();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = renderer.resize(size.width, size.height) {
                        self.fail(event_loop, e);
                        return;
                    }
                    // The drain stalled the clock; don't count it as
                    // animation time.
                    self.clock.reset();
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick();
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = renderer.draw_frame(dt) {
                        self.fail(event_loop, e);
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
