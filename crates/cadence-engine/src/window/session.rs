use std::time::Duration;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::flags::SessionFlags;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cadence".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// A single window whose events are drained on demand.
///
/// The main loop owns pacing, so the event loop is never allowed to block:
/// `pump` drains whatever is pending and returns immediately.
pub struct WindowSession {
    event_loop: EventLoop<()>,
    handler: SessionHandler,
}

impl WindowSession {
    pub fn new(config: WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            handler: SessionHandler {
                config,
                window: None,
                flags: SessionFlags::default(),
                error: None,
            },
        })
    }

    /// Drains pending platform events without blocking.
    ///
    /// Window creation happens on the first pump. Creation failure is
    /// returned as an error.
    pub fn pump(&mut self) -> Result<()> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.handler.flags.close_requested = true;
        }

        match self.handler.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn flags(&self) -> SessionFlags {
        self.handler.flags
    }

    pub fn has_input_focus_or_unpaused(&self) -> bool {
        self.handler.flags.has_input_focus_or_unpaused()
    }

    pub fn is_minimized(&self) -> bool {
        let platform = self
            .handler
            .window
            .as_ref()
            .and_then(|w| w.is_minimized())
            .unwrap_or(false);
        platform || self.handler.flags.is_minimized()
    }

    pub fn close_requested(&self) -> bool {
        self.handler.flags.close_requested
    }

    /// Updates the window title, e.g. with frame statistics.
    pub fn set_title(&self, title: &str) {
        if let Some(w) = &self.handler.window {
            w.set_title(title);
        }
    }
}

struct SessionHandler {
    config: WindowConfig,
    window: Option<Window>,
    flags: SessionFlags,
    error: Option<anyhow::Error>,
}

impl ApplicationHandler for SessionHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        match event_loop
            .create_window(attrs)
            .context("failed to create window")
        {
            Ok(window) => {
                log::debug!("window created: {:?}", window.id());
                self.window = Some(window);
            }
            Err(e) => {
                self.flags.close_requested = true;
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        self.flags.apply_event(&event);

        if self.flags.close_requested {
            self.window = None;
            event_loop.exit();
        }
    }
}
