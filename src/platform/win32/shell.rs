#![allow(unsafe_code)]

// Executable icon resources and the console window.

use windows::{
    core::PCWSTR,
    Win32::{
        System::{Console::GetConsoleWindow, Threading::GetCurrentProcessId},
        UI::WindowsAndMessaging::{
            GetWindowThreadProcessId, LoadImageW, ShowWindowAsync, IMAGE_ICON, LR_DEFAULTSIZE,
            LR_SHARED, SHOW_WINDOW_CMD,
        },
    },
};

use super::window::{handle, hwnd, module_instance};
use crate::window::{IconHandle, ShowCommand, WindowHandle};

pub(super) fn load_icon_resource(resource_id: u16) -> Option<IconHandle> {
    let hinstance = module_instance().ok()?;
    // MAKEINTRESOURCEW: the id travels in the low word of the name pointer.
    let name = PCWSTR(usize::from(resource_id) as *const u16);
    // SAFETY: hinstance is this executable; `name` is an integer resource id,
    // which LoadImageW recognises and never dereferences.  LR_SHARED icons
    // are owned by the system and must not be destroyed by us.
    let icon = unsafe { LoadImageW(hinstance, name, IMAGE_ICON, 0, 0, LR_DEFAULTSIZE | LR_SHARED) };
    icon.ok().and_then(|h| IconHandle::from_raw(h.0 as isize))
}

pub(super) fn console_window() -> Option<WindowHandle> {
    // SAFETY: GetConsoleWindow has no preconditions; null means no console.
    handle(unsafe { GetConsoleWindow() })
}

pub(super) fn window_process_id(window: WindowHandle) -> u32 {
    let mut pid = 0u32;
    // SAFETY: &mut pid is a valid out-pointer for the duration of the call.
    unsafe {
        GetWindowThreadProcessId(hwnd(window), Some(&mut pid));
    }
    pid
}

pub(super) fn current_process_id() -> u32 {
    // SAFETY: no preconditions.
    unsafe { GetCurrentProcessId() }
}

pub(super) fn show_window_async(window: WindowHandle, command: ShowCommand) -> bool {
    // SAFETY: ShowWindowAsync posts the request to the window's owning
    // thread, which may belong to another process (the console host).
    unsafe { ShowWindowAsync(hwnd(window), SHOW_WINDOW_CMD(command as i32)) }.as_bool()
}
