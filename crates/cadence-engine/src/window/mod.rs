//! Interactive window session.
//!
//! Owns a `winit` event loop and window, pumped without blocking from inside
//! the frame callback, and answers the focus/pause/minimized queries the
//! main loop's idle policy polls.

mod flags;
mod session;

pub use flags::SessionFlags;
pub use session::{WindowConfig, WindowSession};
