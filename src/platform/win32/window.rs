// ── Window classes, windows & messages ────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register window classes and remember each class's MessageHandler.
//   • Create and destroy top-level windows.
//   • Retrieve, translate, dispatch, post and send messages.
//   • Route every message to its class's handler through one WndProc.
//   • Expose a safe error-dialog helper for the demo binary.

#![allow(unsafe_code)]

use std::{cell::RefCell, collections::HashMap, ffi::c_void, rc::Rc};

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClassNameW,
            GetMessageW, GetWindowRect, LoadCursorW, MessageBoxW, PeekMessageW, PostMessageW,
            PostQuitMessage, RegisterClassExW, SendMessageW, TranslateMessage, CS_OWNDC,
            HMENU, IDC_ARROW, MB_ICONERROR, MB_OK, MSG, PM_NOREMOVE, PM_REMOVE,
            WINDOW_EX_STYLE, WINDOW_STYLE, WNDCLASSEXW,
        },
    },
};

use crate::{
    error::{Result, SessionError},
    platform::PeekMode,
    window::{Message, MessageHandler, Point, Rect, WindowHandle, WindowStyle},
};

/// Longest class name Win32 accepts, plus the terminator.
const CLASS_NAME_BUF_LEN: usize = 257;

// ── Handler registry ──────────────────────────────────────────────────────────
//
// Window procedures always run on the thread that created the window, and a
// class's windows are created through the session on that same thread, so a
// thread-local map is the whole registry.  Keyed by class name.

thread_local! {
    static HANDLERS: RefCell<HashMap<String, Rc<dyn MessageHandler>>> =
        RefCell::new(HashMap::new());
}

// ── Conversions ───────────────────────────────────────────────────────────────

pub(super) fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as *mut c_void)
}

pub(super) fn handle(hwnd: HWND) -> Option<WindowHandle> {
    WindowHandle::from_raw(hwnd.0 as isize)
}

pub(super) fn rect_from(r: RECT) -> Rect {
    Rect {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

pub(super) fn rect_to(r: Rect) -> RECT {
    RECT {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

fn message_from(msg: &MSG) -> Message {
    Message {
        window: handle(msg.hwnd),
        code: msg.message,
        wparam: msg.wParam.0,
        lparam: msg.lParam.0,
        time: msg.time,
        point: Point {
            x: msg.pt.x,
            y: msg.pt.y,
        },
    }
}

fn message_to(message: &Message) -> MSG {
    MSG {
        hwnd: message.window.map_or(HWND::default(), hwnd),
        message: message.code,
        wParam: WPARAM(message.wparam),
        lParam: LPARAM(message.lparam),
        time: message.time,
        pt: POINT {
            x: message.point.x,
            y: message.point.y,
        },
        ..Default::default()
    }
}

/// Null-terminated UTF-16 copy of `s`.
pub(super) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub(super) fn module_instance() -> Result<HINSTANCE> {
    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // valid for the process lifetime.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(SessionError::from)?;
    // HINSTANCE and HMODULE are the same value on Windows.
    Ok(HINSTANCE(hmodule.0))
}

// ── Window class registration ─────────────────────────────────────────────────

pub(super) fn register_class(class_name: &str, handler: Rc<dyn MessageHandler>) -> Result<()> {
    let rejected = |code| SessionError::ClassRegistration {
        class_name: class_name.to_owned(),
        code,
    };

    let hinstance = module_instance()?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(SessionError::from)?;

    let name = wide(class_name);
    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~80 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // CS_OWNDC: one private device context per window, which OpenGL
        // pixel formats need.
        style: CS_OWNDC,
        lpfnWndProc: Some(wnd_proc),
        hInstance: hinstance,
        hCursor: cursor,
        lpszClassName: PCWSTR(name.as_ptr()),
        ..Default::default()
    };

    // SAFETY: wndclass is fully initialised with valid handles; `name` is a
    // null-terminated UTF-16 string that outlives the call (the OS copies it
    // into the atom table).
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        // SAFETY: reads the error left by the RegisterClassExW call above.
        return Err(rejected(unsafe { GetLastError() }.0));
    }

    // Only a successful registration may claim the name; a duplicate must not
    // replace the live class's handler.
    HANDLERS.with(|h| h.borrow_mut().insert(class_name.to_owned(), handler));
    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

pub(super) fn create_window(
    class_name: &str,
    style: WindowStyle,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
) -> Result<WindowHandle> {
    let rejected = |code| SessionError::WindowCreation {
        class_name: class_name.to_owned(),
        code,
    };

    let hinstance = module_instance()?;
    let name = wide(class_name);

    // SAFETY: `name` names a class registered by this module and outlives the
    // call.  HWND::default() (null parent) creates a top-level window;
    // HMENU::default() attaches no menu; no creation data is passed.
    let created = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            PCWSTR(name.as_ptr()),
            PCWSTR::null(),
            WINDOW_STYLE(style.bits()),
            x,
            y,
            width,
            height,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    };

    match created {
        Ok(hwnd) => handle(hwnd).ok_or_else(|| rejected(0)),
        // HRESULT_FROM_WIN32 keeps the Win32 code in the low word.
        Err(e) => Err(rejected(e.code().0 as u32 & 0xFFFF)),
    }
}

pub(super) fn destroy_window(window: WindowHandle) -> Result<()> {
    // SAFETY: DestroyWindow validates the handle and fails cleanly for one
    // that no longer names a window.  Must run on the owning thread.
    unsafe { DestroyWindow(hwnd(window)) }.map_err(SessionError::from)
}

pub(super) fn window_rect(window: WindowHandle) -> Result<Rect> {
    let mut r = RECT::default();
    // SAFETY: &mut r is a valid RECT pointer for the duration of the call.
    unsafe { GetWindowRect(hwnd(window), &mut r) }.map_err(SessionError::from)?;
    Ok(rect_from(r))
}

// ── Messages ──────────────────────────────────────────────────────────────────

pub(super) fn get_message() -> Result<Message> {
    let mut msg = MSG::default();
    // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
    // messages for all windows on this thread; 0,0 filter accepts all.
    let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
    // GetMessage returns -1 on error and 0 when WM_QUIT is retrieved, in
    // which case `msg` holds the WM_QUIT message itself.
    if ret.0 == -1 {
        return Err(last_error("GetMessageW"));
    }
    Ok(message_from(&msg))
}

pub(super) fn peek_message(mode: PeekMode) -> Option<Message> {
    let remove = match mode {
        PeekMode::NoRemove => PM_NOREMOVE,
        PeekMode::Remove => PM_REMOVE,
    };
    let mut msg = MSG::default();
    // SAFETY: as for GetMessageW; PeekMessageW never blocks.
    let found = unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, remove) };
    found.as_bool().then(|| message_from(&msg))
}

pub(super) fn post_message(window: WindowHandle, code: u32, wparam: usize, lparam: isize)
    -> Result<()> {
    // SAFETY: PostMessageW copies the parameters into the target thread's
    // queue; no pointer is passed.
    unsafe { PostMessageW(hwnd(window), code, WPARAM(wparam), LPARAM(lparam)) }
        .map_err(SessionError::from)
}

pub(super) fn send_message(window: WindowHandle, code: u32, wparam: usize, lparam: isize)
    -> isize {
    // SAFETY: the caller only sends messages whose parameters are plain
    // values (WM_CLOSE, WM_SETICON with an icon handle).
    unsafe { SendMessageW(hwnd(window), code, WPARAM(wparam), LPARAM(lparam)) }.0
}

pub(super) fn translate_message(message: &Message) -> bool {
    let msg = message_to(message);
    // SAFETY: &msg is a valid MSG for the duration of the call.
    unsafe { TranslateMessage(&msg) }.as_bool()
}

pub(super) fn dispatch_message(message: &Message) -> isize {
    let msg = message_to(message);
    // SAFETY: &msg is a valid MSG; DispatchMessageW calls the target
    // window's procedure synchronously on this thread.
    unsafe { DispatchMessageW(&msg) }.0
}

pub(super) fn post_quit_message(exit_code: i32) {
    // SAFETY: PostQuitMessage only sets the thread's quit flag.
    unsafe { PostQuitMessage(exit_code) }
}

pub(super) fn default_window_proc(window: WindowHandle, message: &Message) -> isize {
    // SAFETY: forwards a message this thread received for `window`.
    unsafe {
        DefWindowProcW(
            hwnd(window),
            message.code,
            WPARAM(message.wparam),
            LPARAM(message.lparam),
        )
    }
    .0
}

// ── Window procedure ──────────────────────────────────────────────────────────

fn class_name_of(hwnd: HWND) -> Option<String> {
    let mut buf = [0u16; CLASS_NAME_BUF_LEN];
    // SAFETY: buf is a writable slice; GetClassNameW writes at most its
    // length including the terminator and returns the character count.
    let len = unsafe { GetClassNameW(hwnd, &mut buf) };
    let len = usize::try_from(len).ok().filter(|&n| n > 0)?;
    Some(String::from_utf16_lossy(&buf[..len]))
}

// SAFETY: wnd_proc is registered as lpfnWndProc for every class this module
// registers.  Windows guarantees that hwnd, msg, wparam, and lparam are valid
// for the lifetime of this call.  No registry borrow is held while the
// handler runs, so handlers may re-enter (send messages, destroy windows).
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(window) = handle(hwnd) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };
    let handler = class_name_of(hwnd)
        .and_then(|name| HANDLERS.with(|h| h.borrow().get(&name).cloned()));

    let message = Message::new(Some(window), msg, wparam.0, lparam.0);
    match handler.and_then(|h| h.handle(window, &message)) {
        Some(result) => LRESULT(result),
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Show a modal error dialog with the given message.
///
/// Used by the demo binary when startup fails; in a GUI-subsystem build it
/// is the only place the error can go.
pub fn show_error_dialog(message: &str) {
    let msg_wide = wide(message);
    let title_wide = wide("Casement: fatal error");

    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// Capture the current Win32 last-error code and wrap it in a `SessionError`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
pub(super) fn last_error(function: &'static str) -> SessionError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    let code = unsafe { GetLastError() };
    SessionError::Win32 {
        function,
        code: code.0,
    }
}
