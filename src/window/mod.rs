// ── Window vocabulary ─────────────────────────────────────────────────────────
//
// Plain-data types shared by the session controller and every backend.  No
// `unsafe`, no OS calls: handles are identifiers, not owned resources, and
// the OS (or the headless simulation) decides when they stop being valid.

pub mod message;

use std::num::NonZeroIsize;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use message::{Message, MessageHandler};

// ── Handles ───────────────────────────────────────────────────────────────────

/// Opaque reference to an OS-owned top-level window (`HWND`).
///
/// Never null.  Copying it does not duplicate anything and dropping it does
/// not close anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(NonZeroIsize);

impl WindowHandle {
    /// Wrap a raw handle value; `None` for the null handle.
    pub fn from_raw(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    /// The raw handle value as the OS knows it.
    pub fn raw(self) -> isize {
        self.0.get()
    }
}

/// Opaque reference to a display monitor (`HMONITOR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorHandle(NonZeroIsize);

impl MonitorHandle {
    pub fn from_raw(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    pub fn raw(self) -> isize {
        self.0.get()
    }
}

/// Opaque reference to a loaded, shared icon (`HICON`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconHandle(NonZeroIsize);

impl IconHandle {
    pub fn from_raw(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    pub fn raw(self) -> isize {
        self.0.get()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A screen-space point in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// `CW_USEDEFAULT`: let the system choose the position (when passed as `x`)
/// or the size (when passed as `width`) of a new window.
pub const USE_DEFAULT: i32 = i32::MIN;

/// A screen-space rectangle; `right` and `bottom` are exclusive.
///
/// Edge arithmetic wraps like the `RECT` math it mirrors, so any origin and
/// size round-trip through `from_origin_size`, `width` and `height`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Build a rectangle from the `x, y, width, height` form used by
    /// `CreateWindowExW` and `SetWindowPos`.
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x.wrapping_add(width),
            bottom: y.wrapping_add(height),
        }
    }

    pub fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    /// Area shared with `other`, zero when they do not overlap.
    pub fn overlap_area(&self, other: &Rect) -> i64 {
        let w = i64::from(self.right.min(other.right)) - i64::from(self.left.max(other.left));
        let h = i64::from(self.bottom.min(other.bottom)) - i64::from(self.top.max(other.top));
        if w <= 0 || h <= 0 {
            0
        } else {
            w * h
        }
    }
}

// ── Style bits ────────────────────────────────────────────────────────────────

bitflags! {
    /// Window style bits (`GWL_STYLE`).
    ///
    /// Values match the Win32 `WS_*` constants.  Bits this type does not
    /// name are still carried through every operation untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowStyle: u32 {
        const MAXIMIZE_BOX = 0x0001_0000;
        const MINIMIZE_BOX = 0x0002_0000;
        const THICK_FRAME  = 0x0004_0000;
        const SYS_MENU     = 0x0008_0000;
        const DLG_FRAME    = 0x0040_0000;
        const BORDER       = 0x0080_0000;
        const CAPTION      = Self::BORDER.bits() | Self::DLG_FRAME.bits();
        const VISIBLE      = 0x1000_0000;
        const CHILD        = 0x4000_0000;
        const POPUP        = 0x8000_0000;

        /// Title bar, border, system menu, min/max boxes, resizable frame.
        const OVERLAPPED_WINDOW = Self::CAPTION.bits()
            | Self::SYS_MENU.bits()
            | Self::THICK_FRAME.bits()
            | Self::MINIMIZE_BOX.bits()
            | Self::MAXIMIZE_BOX.bits();

        const _ = !0;
    }
}

bitflags! {
    /// `SetWindowPos` behaviour flags (`SWP_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PositionFlags: u32 {
        const NO_SIZE         = 0x0001;
        const NO_MOVE         = 0x0002;
        const NO_ZORDER       = 0x0004;
        const FRAME_CHANGED   = 0x0020;
        const NO_OWNER_ZORDER = 0x0200;
    }
}

// ── Show state ────────────────────────────────────────────────────────────────

/// The subset of `SW_*` show commands this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ShowCommand {
    Hide = 0,
    ShowNormal = 1,
    Show = 5,
}

// ── Placement & monitors ──────────────────────────────────────────────────────

/// Snapshot of a window's show state and restored geometry
/// (`WINDOWPLACEMENT`), captured before entering fullscreen.
///
/// There is deliberately no `Default`: a zeroed placement restores the
/// window to an empty rectangle.  Values only come from
/// `WindowSystem::window_placement` (usually via `Session::enable_fullscreen`)
/// and must be handed back to the same window, unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlacement {
    /// Raw `WPF_*` flags.
    pub flags: u32,
    /// Raw `SW_*` show command the window was in.
    pub show_cmd: u32,
    pub min_position: Point,
    pub max_position: Point,
    /// The restored (non-minimized, non-maximized) rectangle.
    pub normal_position: Rect,
}

/// What the OS reports about one monitor (`MONITORINFO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Full monitor rectangle in virtual-screen coordinates.
    pub monitor: Rect,
    /// The monitor rectangle minus taskbars and app bars.
    pub work: Rect,
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handles_are_rejected() {
        assert!(WindowHandle::from_raw(0).is_none());
        assert_eq!(WindowHandle::from_raw(0x1234).map(WindowHandle::raw), Some(0x1234));
    }

    #[test]
    fn overlapped_window_matches_win32() {
        // WS_OVERLAPPEDWINDOW
        assert_eq!(WindowStyle::OVERLAPPED_WINDOW.bits(), 0x00CF_0000);
    }

    #[test]
    fn unknown_style_bits_survive_removal() {
        let style = WindowStyle::from_bits_retain(0x00CF_0000 | 0x1000_0000 | 0x0000_0004);
        let stripped = style.difference(WindowStyle::OVERLAPPED_WINDOW);
        assert_eq!(stripped.bits(), 0x1000_0004);
    }

    #[test]
    fn rect_geometry() {
        let r = Rect::from_origin_size(10, 20, 800, 600);
        assert_eq!((r.right, r.bottom), (810, 620));
        assert_eq!((r.width(), r.height()), (800, 600));

        let other = Rect::from_origin_size(410, 320, 800, 600);
        assert_eq!(r.overlap_area(&other), 400 * 300);
        assert_eq!(r.overlap_area(&Rect::from_origin_size(2000, 0, 10, 10)), 0);
    }

    #[test]
    fn extreme_geometry_round_trips() {
        let defaulted = Rect::from_origin_size(USE_DEFAULT, USE_DEFAULT, USE_DEFAULT, USE_DEFAULT);
        assert_eq!((defaulted.width(), defaulted.height()), (USE_DEFAULT, USE_DEFAULT));

        let far = Rect::from_origin_size(i32::MAX - 10, 0, 800, 600);
        assert_eq!((far.left, far.width(), far.height()), (i32::MAX - 10, 800, 600));
        // The wrapped right edge lies left of `left`, so nothing overlaps.
        assert_eq!(far.overlap_area(&Rect::from_origin_size(0, 0, 1920, 1080)), 0);
    }

    #[test]
    fn placement_survives_json() {
        use crate::platform::{headless::HeadlessSystem, WindowSystem};

        let sys = HeadlessSystem::new();
        let ignore = |_: WindowHandle, _: &Message| -> Option<isize> { None };
        sys.register_class("Persisted", std::rc::Rc::new(ignore)).unwrap();
        let w = sys
            .create_window("Persisted", WindowStyle::OVERLAPPED_WINDOW, 30, 40, 640, 480)
            .unwrap();
        let saved = sys.window_placement(w).unwrap();

        let json = serde_json::to_string(&saved).unwrap();
        let loaded: WindowPlacement = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, saved);

        sys.set_window_pos(w, Rect::from_origin_size(500, 500, 100, 100), PositionFlags::empty())
            .unwrap();
        sys.set_window_placement(w, &loaded).unwrap();
        assert_eq!(sys.window_rect(w).unwrap(), Rect::from_origin_size(30, 40, 640, 480));
    }
}
