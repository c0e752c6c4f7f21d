// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the session controller uses to talk to
// the OS window manager.  No `unsafe` lives here; all Win32 FFI is confined to
// the `win32` sub-module and never leaks outward.
//
// A backend is the explicit home of process-wide state (the window-class
// registry, the cursor display counter, the thread's message queue).  The
// session never reaches for ambient globals; it only calls these methods.

use std::rc::Rc;

use crate::{
    error::Result,
    window::{
        IconHandle, Message, MessageHandler, MonitorHandle, MonitorInfo, PositionFlags, Rect,
        ShowCommand, WindowHandle, WindowPlacement, WindowStyle,
    },
};

pub mod headless;

#[cfg(windows)]
pub mod win32;

/// Whether a peek takes the message off the queue (`PM_REMOVE`) or only
/// looks at it (`PM_NOREMOVE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekMode {
    NoRemove,
    Remove,
}

/// One method per window-manager primitive the session needs.
///
/// Methods mirror their Win32 counterparts one-to-one; see each backend for
/// the exact forwarding.  All calls happen on the thread that owns the
/// windows involved.
pub trait WindowSystem {
    // ── Classes & windows ─────────────────────────────────────────────────────

    /// Register `class_name` with the own-DC class style and the arrow cursor,
    /// dispatching to `handler`.  Fails with `SessionError::ClassRegistration`.
    fn register_class(&self, class_name: &str, handler: Rc<dyn MessageHandler>) -> Result<()>;

    /// Create a top-level window of a registered class.  The geometry is
    /// passed through as given, `USE_DEFAULT` included.  Fails with
    /// `SessionError::WindowCreation`.
    fn create_window(
        &self,
        class_name: &str,
        style: WindowStyle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<WindowHandle>;

    fn destroy_window(&self, window: WindowHandle) -> Result<()>;

    fn window_rect(&self, window: WindowHandle) -> Result<Rect>;

    // ── Style & geometry ──────────────────────────────────────────────────────

    fn window_style(&self, window: WindowHandle) -> WindowStyle;

    /// Replace the style bits, returning the previous ones.
    fn set_window_style(&self, window: WindowHandle, style: WindowStyle) -> WindowStyle;

    fn window_placement(&self, window: WindowHandle) -> Result<WindowPlacement>;

    fn set_window_placement(&self, window: WindowHandle, placement: &WindowPlacement)
        -> Result<()>;

    fn set_window_pos(&self, window: WindowHandle, rect: Rect, flags: PositionFlags)
        -> Result<()>;

    /// The monitor containing most of `window`, or the primary monitor when
    /// none does (`MONITOR_DEFAULTTOPRIMARY`).
    fn monitor_from_window(&self, window: WindowHandle) -> Option<MonitorHandle>;

    fn monitor_info(&self, monitor: MonitorHandle) -> Result<MonitorInfo>;

    /// Adjust the process-wide cursor display counter; returns the new count.
    /// The cursor is visible while the count is non-negative.
    fn show_cursor(&self, show: bool) -> i32;

    // ── Messages ──────────────────────────────────────────────────────────────

    /// Block until a message is available and remove it.  Returns the
    /// `WM_QUIT` message itself when quit is retrieved.
    fn get_message(&self) -> Result<Message>;

    fn peek_message(&self, mode: PeekMode) -> Option<Message>;

    fn post_message(&self, window: WindowHandle, code: u32, wparam: usize, lparam: isize)
        -> Result<()>;

    /// Deliver `code` to `window`'s handler synchronously.
    fn send_message(&self, window: WindowHandle, code: u32, wparam: usize, lparam: isize)
        -> isize;

    /// Turn key presses into character messages; true when one was produced.
    fn translate_message(&self, message: &Message) -> bool;

    fn dispatch_message(&self, message: &Message) -> isize;

    fn post_quit_message(&self, exit_code: i32);

    /// The system's processing for messages a handler declined.
    fn default_window_proc(&self, window: WindowHandle, message: &Message) -> isize;

    // ── Shell ─────────────────────────────────────────────────────────────────

    /// Load icon `resource_id` from the running executable at the default
    /// size, shared.
    fn load_icon_resource(&self, resource_id: u16) -> Option<IconHandle>;

    fn console_window(&self) -> Option<WindowHandle>;

    fn window_process_id(&self, window: WindowHandle) -> u32;

    fn current_process_id(&self) -> u32;

    /// Queue a show-state change without waiting for the owning thread.
    fn show_window_async(&self, window: WindowHandle, command: ShowCommand) -> bool;
}
