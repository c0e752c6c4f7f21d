// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! A thin window session controller over the native Windows windowing API.
//!
//! [`Session`] creates a top-level window bound to a [`MessageHandler`],
//! toggles borderless fullscreen, drives the message loop (blocking or with
//! an idle callback for real-time code), sets the executable's icon on a
//! window, and hides a console the process was started with.
//!
//! Every operation goes through a [`WindowSystem`] backend:
//! `platform::win32::Win32System` on Windows, and
//! [`HeadlessSystem`](platform::headless::HeadlessSystem), an in-memory
//! simulation, everywhere.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> casement::Result<()> {
//! use casement::{platform::win32::Win32System, Message, Session, WindowHandle};
//!
//! let session = Session::new(Win32System::new());
//! let quit = Win32System::new();
//! let window = session.create_window(
//!     0, 0, 800, 600, "MyGame",
//!     move |_: WindowHandle, m: &Message| -> Option<isize> {
//!         if m.code == casement::codes::WM_DESTROY {
//!             casement::WindowSystem::post_quit_message(&quit, 0);
//!             return Some(0);
//!         }
//!         None
//!     },
//! )?;
//! let windowed = session.enable_fullscreen(window);
//! session.run_game_loop(|| std::thread::sleep(std::time::Duration::from_millis(1)));
//! # let _ = windowed;
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

pub mod config;
pub mod error;
pub mod platform;
pub mod session;
pub mod window;

pub use config::{config_path, LoopMode, WindowConfig};
pub use error::{Result, SessionError};
pub use platform::{headless::HeadlessSystem, PeekMode, WindowSystem};
pub use session::{OpenedWindow, Session};
pub use window::{
    message::codes, IconHandle, Message, MessageHandler, MonitorHandle, MonitorInfo, Point,
    PositionFlags, Rect, ShowCommand, WindowHandle, WindowPlacement, WindowStyle, USE_DEFAULT,
};
