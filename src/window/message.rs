// ── Messages & handlers ───────────────────────────────────────────────────────

use super::{Point, WindowHandle};

/// Message codes (`WM_*`) and `WM_SETICON` icon kinds this crate names.
///
/// Values are the Win32 ones; the Win32 backend asserts that at compile time.
pub mod codes {
    pub const WM_NULL: u32 = 0x0000;
    pub const WM_CREATE: u32 = 0x0001;
    pub const WM_DESTROY: u32 = 0x0002;
    pub const WM_CLOSE: u32 = 0x0010;
    pub const WM_QUIT: u32 = 0x0012;
    pub const WM_SETICON: u32 = 0x0080;
    pub const WM_KEYDOWN: u32 = 0x0100;
    pub const WM_KEYUP: u32 = 0x0101;
    pub const WM_CHAR: u32 = 0x0102;

    pub const ICON_SMALL: usize = 0;
    pub const ICON_BIG: usize = 1;
    pub const ICON_SMALL2: usize = 2;

    pub const VK_ESCAPE: usize = 0x1B;
    pub const VK_F11: usize = 0x7A;
}

/// One OS-delivered event (`MSG`).
///
/// `Default` is the empty `WM_NULL` message the polling loop starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Message {
    /// Target window; `None` for thread messages such as `WM_QUIT`.
    pub window: Option<WindowHandle>,
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
    /// Milliseconds since system start when the message was posted.
    pub time: u32,
    /// Cursor position when the message was posted.
    pub point: Point,
}

impl Message {
    /// A message addressed to `window` with zero timestamp and position.
    pub fn new(window: Option<WindowHandle>, code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            window,
            code,
            wparam,
            lparam,
            ..Self::default()
        }
    }

    pub fn is_quit(&self) -> bool {
        self.code == codes::WM_QUIT
    }

    /// Exit code carried by a `WM_QUIT` message.
    pub fn exit_code(&self) -> i32 {
        self.wparam as i32
    }
}

/// The capability a window class is registered with: "can handle a message".
///
/// Invoked for every message dispatched or sent to a window of the class, on
/// the thread that owns the window.  Return `Some(result)` when the message
/// was handled, or `None` to let the system's default processing run
/// (`DefWindowProcW` on Win32).
///
/// Handlers may call back into the backend, including recursively
/// triggering more messages (destroying the window from `WM_CLOSE`, say).
pub trait MessageHandler {
    fn handle(&self, window: WindowHandle, message: &Message) -> Option<isize>;
}

impl<F> MessageHandler for F
where
    F: Fn(WindowHandle, &Message) -> Option<isize>,
{
    fn handle(&self, window: WindowHandle, message: &Message) -> Option<isize> {
        self(window, message)
    }
}
