#![allow(unsafe_code)]

// Style bits, placement, monitors and the cursor counter.

use windows::Win32::{
    Foundation::{BOOL, HWND, POINT},
    Graphics::Gdi::{
        GetMonitorInfoW, MonitorFromWindow, HMONITOR, MONITORINFO, MONITOR_DEFAULTTOPRIMARY,
    },
    UI::WindowsAndMessaging::{
        GetWindowLongW, GetWindowPlacement, SetWindowLongW, SetWindowPlacement, SetWindowPos,
        ShowCursor, GWL_STYLE, SET_WINDOW_POS_FLAGS, WINDOWPLACEMENT, WINDOWPLACEMENT_FLAGS,
    },
};

use super::window::{hwnd, last_error, rect_from, rect_to};
use crate::{
    error::{Result, SessionError},
    window::{
        MonitorHandle, MonitorInfo, Point, PositionFlags, Rect, WindowHandle, WindowPlacement,
        WindowStyle,
    },
};

/// `MONITORINFOF_PRIMARY`
const MONITOR_PRIMARY: u32 = 0x0000_0001;

fn point_from(p: POINT) -> Point {
    Point { x: p.x, y: p.y }
}

fn point_to(p: Point) -> POINT {
    POINT { x: p.x, y: p.y }
}

pub(super) fn window_style(window: WindowHandle) -> WindowStyle {
    // SAFETY: GetWindowLongW returns 0 for an invalid handle rather than
    // faulting.  The i32 → u32 cast reinterprets the style bits unchanged.
    let bits = unsafe { GetWindowLongW(hwnd(window), GWL_STYLE) } as u32;
    WindowStyle::from_bits_retain(bits)
}

pub(super) fn set_window_style(window: WindowHandle, style: WindowStyle) -> WindowStyle {
    // SAFETY: as above; SetWindowLongW returns the previous value.
    let previous = unsafe { SetWindowLongW(hwnd(window), GWL_STYLE, style.bits() as i32) };
    WindowStyle::from_bits_retain(previous as u32)
}

pub(super) fn window_placement(window: WindowHandle) -> Result<WindowPlacement> {
    let mut wp = WINDOWPLACEMENT {
        length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
        ..Default::default()
    };
    // SAFETY: wp is a valid WINDOWPLACEMENT with `length` set, as the API
    // requires.
    unsafe { GetWindowPlacement(hwnd(window), &mut wp) }.map_err(SessionError::from)?;
    Ok(WindowPlacement {
        flags: wp.flags.0,
        show_cmd: wp.showCmd,
        min_position: point_from(wp.ptMinPosition),
        max_position: point_from(wp.ptMaxPosition),
        normal_position: rect_from(wp.rcNormalPosition),
    })
}

pub(super) fn set_window_placement(window: WindowHandle, placement: &WindowPlacement)
    -> Result<()> {
    let wp = WINDOWPLACEMENT {
        length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
        flags: WINDOWPLACEMENT_FLAGS(placement.flags),
        showCmd: placement.show_cmd,
        ptMinPosition: point_to(placement.min_position),
        ptMaxPosition: point_to(placement.max_position),
        rcNormalPosition: rect_to(placement.normal_position),
    };
    // SAFETY: wp is fully initialised and lives across the call.
    unsafe { SetWindowPlacement(hwnd(window), &wp) }.map_err(SessionError::from)
}

pub(super) fn set_window_pos(window: WindowHandle, rect: Rect, flags: PositionFlags)
    -> Result<()> {
    // SAFETY: plain-value call.  A null insert-after handle is HWND_TOP: the
    // frame refresh passes SWP_NOZORDER so it is ignored there, while
    // covering the monitor brings the window to the top.
    unsafe {
        SetWindowPos(
            hwnd(window),
            HWND::default(),
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            SET_WINDOW_POS_FLAGS(flags.bits()),
        )
    }
    .map_err(SessionError::from)
}

pub(super) fn monitor_from_window(window: WindowHandle) -> Option<MonitorHandle> {
    // SAFETY: MonitorFromWindow accepts any handle; with
    // MONITOR_DEFAULTTOPRIMARY it only returns null for an invalid window.
    let monitor = unsafe { MonitorFromWindow(hwnd(window), MONITOR_DEFAULTTOPRIMARY) };
    MonitorHandle::from_raw(monitor.0 as isize)
}

pub(super) fn monitor_info(monitor: MonitorHandle) -> Result<MonitorInfo> {
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    let hmonitor = HMONITOR(monitor.raw() as *mut _);
    // SAFETY: info has cbSize set; hmonitor came from MonitorFromWindow.
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info) };
    if !ok.as_bool() {
        return Err(last_error("GetMonitorInfoW"));
    }
    Ok(MonitorInfo {
        monitor: rect_from(info.rcMonitor),
        work: rect_from(info.rcWork),
        primary: info.dwFlags & MONITOR_PRIMARY != 0,
    })
}

pub(super) fn show_cursor(show: bool) -> i32 {
    // SAFETY: ShowCursor only adjusts the process-wide display counter.
    unsafe { ShowCursor(BOOL::from(show)) }
}
