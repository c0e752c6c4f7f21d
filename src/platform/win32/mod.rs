// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

mod display; // style bits, placement, monitors, cursor
mod shell; // icon resources, console window
pub mod window; // classes, windows, message loop primitives, WndProc

use std::{marker::PhantomData, rc::Rc};

use windows::Win32::UI::WindowsAndMessaging as wm;

use super::{PeekMode, WindowSystem};
use crate::{
    error::Result,
    window::{
        message::codes, IconHandle, Message, MessageHandler, MonitorHandle, MonitorInfo,
        PositionFlags, Rect, ShowCommand, WindowHandle, WindowPlacement, WindowStyle,
        USE_DEFAULT,
    },
};

// The portable constants must agree with the real ones.
const _: () = {
    assert!(codes::WM_CREATE == wm::WM_CREATE);
    assert!(codes::WM_DESTROY == wm::WM_DESTROY);
    assert!(codes::WM_CLOSE == wm::WM_CLOSE);
    assert!(codes::WM_QUIT == wm::WM_QUIT);
    assert!(codes::WM_SETICON == wm::WM_SETICON);
    assert!(codes::WM_KEYDOWN == wm::WM_KEYDOWN);
    assert!(codes::WM_CHAR == wm::WM_CHAR);
    assert!(codes::ICON_SMALL == wm::ICON_SMALL as usize);
    assert!(codes::ICON_BIG == wm::ICON_BIG as usize);
    assert!(codes::ICON_SMALL2 == wm::ICON_SMALL2 as usize);
    assert!(WindowStyle::OVERLAPPED_WINDOW.bits() == wm::WS_OVERLAPPEDWINDOW.0);
    assert!(WindowStyle::VISIBLE.bits() == wm::WS_VISIBLE.0);
    assert!(PositionFlags::FRAME_CHANGED.bits() == wm::SWP_FRAMECHANGED.0);
    assert!(PositionFlags::NO_OWNER_ZORDER.bits() == wm::SWP_NOOWNERZORDER.0);
    assert!(ShowCommand::Hide as i32 == wm::SW_HIDE.0);
    assert!(USE_DEFAULT == wm::CW_USEDEFAULT);
};

/// The real Windows window manager.
///
/// Zero-sized and `Copy`; every method forwards to one Win32 call.  Not
/// `Send`: windows and their message queue belong to the thread that created
/// them, and so does the class-handler registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32System {
    _thread_bound: PhantomData<*const ()>,
}

impl Win32System {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowSystem for Win32System {
    fn register_class(&self, class_name: &str, handler: Rc<dyn MessageHandler>) -> Result<()> {
        window::register_class(class_name, handler)
    }

    fn create_window(
        &self,
        class_name: &str,
        style: WindowStyle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<WindowHandle> {
        window::create_window(class_name, style, x, y, width, height)
    }

    fn destroy_window(&self, window: WindowHandle) -> Result<()> {
        window::destroy_window(window)
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Rect> {
        window::window_rect(window)
    }

    fn window_style(&self, window: WindowHandle) -> WindowStyle {
        display::window_style(window)
    }

    fn set_window_style(&self, window: WindowHandle, style: WindowStyle) -> WindowStyle {
        display::set_window_style(window, style)
    }

    fn window_placement(&self, window: WindowHandle) -> Result<WindowPlacement> {
        display::window_placement(window)
    }

    fn set_window_placement(&self, window: WindowHandle, placement: &WindowPlacement)
        -> Result<()> {
        display::set_window_placement(window, placement)
    }

    fn set_window_pos(&self, window: WindowHandle, rect: Rect, flags: PositionFlags)
        -> Result<()> {
        display::set_window_pos(window, rect, flags)
    }

    fn monitor_from_window(&self, window: WindowHandle) -> Option<MonitorHandle> {
        display::monitor_from_window(window)
    }

    fn monitor_info(&self, monitor: MonitorHandle) -> Result<MonitorInfo> {
        display::monitor_info(monitor)
    }

    fn show_cursor(&self, show: bool) -> i32 {
        display::show_cursor(show)
    }

    fn get_message(&self) -> Result<Message> {
        window::get_message()
    }

    fn peek_message(&self, mode: PeekMode) -> Option<Message> {
        window::peek_message(mode)
    }

    fn post_message(&self, window: WindowHandle, code: u32, wparam: usize, lparam: isize)
        -> Result<()> {
        window::post_message(window, code, wparam, lparam)
    }

    fn send_message(&self, window: WindowHandle, code: u32, wparam: usize, lparam: isize)
        -> isize {
        window::send_message(window, code, wparam, lparam)
    }

    fn translate_message(&self, message: &Message) -> bool {
        window::translate_message(message)
    }

    fn dispatch_message(&self, message: &Message) -> isize {
        window::dispatch_message(message)
    }

    fn post_quit_message(&self, exit_code: i32) {
        window::post_quit_message(exit_code)
    }

    fn default_window_proc(&self, window: WindowHandle, message: &Message) -> isize {
        window::default_window_proc(window, message)
    }

    fn load_icon_resource(&self, resource_id: u16) -> Option<IconHandle> {
        shell::load_icon_resource(resource_id)
    }

    fn console_window(&self) -> Option<WindowHandle> {
        shell::console_window()
    }

    fn window_process_id(&self, window: WindowHandle) -> u32 {
        shell::window_process_id(window)
    }

    fn current_process_id(&self) -> u32 {
        shell::current_process_id()
    }

    fn show_window_async(&self, window: WindowHandle, command: ShowCommand) -> bool {
        shell::show_window_async(window, command)
    }
}
