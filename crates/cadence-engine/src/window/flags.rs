use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Window/session state derived from platform events.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SessionFlags {
    pub focused: bool,
    pub paused: bool,
    pub occluded: bool,
    pub zero_sized: bool,
    pub close_requested: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        // Platforms do not reliably send an initial `Focused(true)`.
        Self {
            focused: true,
            paused: false,
            occluded: false,
            zero_sized: false,
            close_requested: false,
        }
    }
}

impl SessionFlags {
    pub fn apply_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Focused(f) => self.focused = *f,
            WindowEvent::Occluded(o) => self.occluded = *o,
            WindowEvent::Resized(size) => self.zero_sized = size.width == 0 || size.height == 0,
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.close_requested = true,
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.apply_key(code, event.state, event.repeat);
                }
            }
            _ => {}
        }
    }

    /// `P` toggles pause, `Escape` closes. Key repeats are ignored.
    pub fn apply_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        if state != ElementState::Pressed || repeat {
            return;
        }
        match code {
            KeyCode::KeyP => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "unpaused" });
            }
            KeyCode::Escape => self.close_requested = true,
            _ => {}
        }
    }

    pub fn has_input_focus_or_unpaused(&self) -> bool {
        self.focused && !self.paused
    }

    pub fn is_minimized(&self) -> bool {
        self.occluded || self.zero_sized
    }
}
