// ── Window session controller ─────────────────────────────────────────────────
//
// Creation, the fullscreen toggle protocol, and the ancillary window
// operations, written once against `WindowSystem`.  The message loops live in
// `message_loop.rs`.
//
// No `unsafe` here.  Every OS interaction goes through the backend the
// session was built with, which is also where all process-wide state lives.

mod message_loop;

use std::rc::Rc;

use crate::{
    config::WindowConfig,
    error::{Result, SessionError},
    platform::WindowSystem,
    window::{
        message::codes::{ICON_BIG, ICON_SMALL, ICON_SMALL2, WM_CLOSE, WM_SETICON},
        MessageHandler, PositionFlags, Rect, ShowCommand, WindowHandle, WindowPlacement,
        WindowStyle,
    },
};

/// Flags for the frame refresh after restoring a placement: apply the new
/// style without moving, resizing or reordering anything.
const REFRESH_FRAME: PositionFlags = PositionFlags::NO_MOVE
    .union(PositionFlags::NO_SIZE)
    .union(PositionFlags::NO_ZORDER)
    .union(PositionFlags::NO_OWNER_ZORDER)
    .union(PositionFlags::FRAME_CHANGED);

/// Flags for covering the monitor when entering fullscreen.
const COVER_MONITOR: PositionFlags =
    PositionFlags::NO_OWNER_ZORDER.union(PositionFlags::FRAME_CHANGED);

/// A window opened by [`Session::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedWindow {
    pub window: WindowHandle,
    /// Windowed placement, captured when the config asked to start
    /// fullscreen.  Hand it to `disable_fullscreen` to leave fullscreen.
    pub windowed: Option<WindowPlacement>,
}

/// The window session controller.
///
/// A thin, stateless layer over a [`WindowSystem`] backend.  Cloning a
/// session clones the backend handle, which for both shipped backends still
/// refers to the same desktop; message handlers typically hold a clone.
#[derive(Clone, Default)]
pub struct Session<S> {
    system: S,
}

impl<S: WindowSystem> Session<S> {
    pub fn new(system: S) -> Self {
        Self { system }
    }

    /// The backend this session forwards to.
    pub fn system(&self) -> &S {
        &self.system
    }

    // ── Window creation ───────────────────────────────────────────────────────

    /// Register `class_name` with `handler` as its message handler, then
    /// create a visible, standard-decorated window at the given geometry.
    /// The geometry reaches the OS unchanged; pass
    /// [`USE_DEFAULT`](crate::window::USE_DEFAULT) to let it choose.
    ///
    /// The class stays registered for the rest of the process, even when
    /// creation fails afterwards; registering the same name twice fails with
    /// [`SessionError::ClassRegistration`].
    pub fn create_window<H>(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        class_name: &str,
        handler: H,
    ) -> Result<WindowHandle>
    where
        H: MessageHandler + 'static,
    {
        self.system.register_class(class_name, Rc::new(handler))?;

        let style = WindowStyle::OVERLAPPED_WINDOW | WindowStyle::VISIBLE;
        let window = self
            .system
            .create_window(class_name, style, x, y, width, height)?;

        log::debug!(
            "created {class_name:?} window {:#x} at ({x}, {y}) {width}x{height}",
            window.raw()
        );
        Ok(window)
    }

    /// Create a window from `config` and apply the rest of it: icon, console
    /// suppression, and starting in fullscreen.
    pub fn open<H>(&self, config: &WindowConfig, handler: H) -> Result<OpenedWindow>
    where
        H: MessageHandler + 'static,
    {
        let window = self.create_window(
            config.x,
            config.y,
            config.width,
            config.height,
            &config.class_name,
            handler,
        )?;

        if let Some(resource_id) = config.icon_resource {
            self.set_icon_from_exe(window, resource_id);
        }
        if config.hide_console {
            self.hide_console_window();
        }
        let windowed = if config.start_fullscreen {
            self.enable_fullscreen(window)
        } else {
            None
        };

        Ok(OpenedWindow { window, windowed })
    }

    // ── Fullscreen toggle ─────────────────────────────────────────────────────

    /// True when `window` carries none of the standard overlapped-window
    /// bits.
    ///
    /// This is a heuristic that matches what `enable_fullscreen` does to a
    /// window.  It is not a general test for fullscreen windows, and is
    /// wrong for windows whose style other code changed.
    pub fn is_fullscreen(&self, window: WindowHandle) -> bool {
        !self
            .system
            .window_style(window)
            .intersects(WindowStyle::OVERLAPPED_WINDOW)
    }

    /// Make `window` a borderless window covering the monitor it is on, and
    /// return its previous placement for [`Session::disable_fullscreen`].
    ///
    /// The placement is captured before anything is changed.  When the
    /// monitor cannot be queried the window is left as it was (and the
    /// placement is still returned); `None` means the capture itself failed.
    /// Either way the cursor is hidden: cursor visibility is process-wide,
    /// and callers pair every enable with a disable that shows it again.
    ///
    /// Failures are logged, not returned.  See
    /// [`Session::try_enable_fullscreen`].
    pub fn enable_fullscreen(&self, window: WindowHandle) -> Option<WindowPlacement> {
        let placement = match self.system.window_placement(window) {
            Ok(placement) => {
                if let Err(e) = self.cover_monitor(window) {
                    log::warn!("fullscreen: window {:#x} left windowed: {e}", window.raw());
                }
                Some(placement)
            }
            Err(e) => {
                log::warn!("fullscreen: cannot capture window {:#x}: {e}", window.raw());
                None
            }
        };
        self.system.show_cursor(false);
        placement
    }

    /// [`Session::enable_fullscreen`], but the first failure is returned.
    ///
    /// Ordering and side effects are identical, including hiding the cursor
    /// when it fails.
    pub fn try_enable_fullscreen(&self, window: WindowHandle) -> Result<WindowPlacement> {
        let outcome = self
            .system
            .window_placement(window)
            .and_then(|placement| self.cover_monitor(window).map(|()| placement));
        self.system.show_cursor(false);
        outcome
    }

    /// Give `window` back its border and standard buttons, put it where
    /// `placement` says, and show the cursor again.
    ///
    /// `placement` must come from enabling fullscreen on this same window.
    /// Failures are logged, not returned.  See
    /// [`Session::try_disable_fullscreen`].
    pub fn disable_fullscreen(&self, window: WindowHandle, placement: &WindowPlacement) {
        let style = self.system.window_style(window);
        self.system
            .set_window_style(window, style | WindowStyle::OVERLAPPED_WINDOW);
        if let Err(e) = self.system.set_window_placement(window, placement) {
            log::warn!("fullscreen: cannot restore window {:#x}: {e}", window.raw());
        }
        if let Err(e) = self.system.set_window_pos(window, Rect::default(), REFRESH_FRAME) {
            log::warn!("fullscreen: frame refresh of {:#x} failed: {e}", window.raw());
        }
        self.system.show_cursor(true);
    }

    /// [`Session::disable_fullscreen`], but the first failure is returned.
    ///
    /// The style change and the cursor change happen regardless.
    pub fn try_disable_fullscreen(
        &self,
        window: WindowHandle,
        placement: &WindowPlacement,
    ) -> Result<()> {
        let style = self.system.window_style(window);
        self.system
            .set_window_style(window, style | WindowStyle::OVERLAPPED_WINDOW);
        let outcome = self
            .system
            .set_window_placement(window, placement)
            .and_then(|()| self.system.set_window_pos(window, Rect::default(), REFRESH_FRAME));
        self.system.show_cursor(true);
        outcome
    }

    /// Flip `window` between windowed and fullscreen, keeping the windowed
    /// placement in `saved` while fullscreen.
    ///
    /// Every enable hides the cursor, including one that left the window
    /// windowed because the monitor could not be queried.  The next toggle
    /// then enables again, so each such failure lowers the cursor display
    /// counter once more and a single disable no longer shows the cursor.
    pub fn toggle_fullscreen(&self, window: WindowHandle, saved: &mut Option<WindowPlacement>) {
        if !self.is_fullscreen(window) {
            *saved = self.enable_fullscreen(window);
            return;
        }
        match saved.take() {
            Some(placement) => self.disable_fullscreen(window, &placement),
            None => log::warn!(
                "fullscreen: window {:#x} has no saved placement to restore",
                window.raw()
            ),
        }
    }

    /// Strip the overlapped-window bits and cover the containing monitor.
    /// Nothing is changed unless both monitor queries succeed, and the old
    /// style is put back if the window cannot be moved.
    fn cover_monitor(&self, window: WindowHandle) -> Result<()> {
        let style = self.system.window_style(window);
        if !style.intersects(WindowStyle::OVERLAPPED_WINDOW) {
            log::debug!("fullscreen: window {:#x} is already borderless", window.raw());
        }

        let monitor = self
            .system
            .monitor_from_window(window)
            .ok_or(SessionError::Win32 {
                function: "MonitorFromWindow",
                code: 0,
            })?;
        let info = self.system.monitor_info(monitor)?;

        self.system
            .set_window_style(window, style.difference(WindowStyle::OVERLAPPED_WINDOW));
        if let Err(e) = self.system.set_window_pos(window, info.monitor, COVER_MONITOR) {
            self.system.set_window_style(window, style);
            return Err(e);
        }

        log::debug!("fullscreen: window {:#x} covers {:?}", window.raw(), info.monitor);
        Ok(())
    }

    // ── Ancillary operations ──────────────────────────────────────────────────

    /// Use icon `resource_id`, embedded in the running executable, for the
    /// title bar, the taskbar and Alt-Tab.  Does nothing if it cannot be
    /// loaded.
    pub fn set_icon_from_exe(&self, window: WindowHandle, resource_id: u16) {
        let Some(icon) = self.system.load_icon_resource(resource_id) else {
            log::warn!("icon resource {resource_id} not found in executable");
            return;
        };
        for kind in [ICON_SMALL, ICON_SMALL2, ICON_BIG] {
            self.system.send_message(window, WM_SETICON, kind, icon.raw());
        }
    }

    /// Ask `window`'s handler to close it by sending `WM_CLOSE`.
    ///
    /// The window is not destroyed here.  The send is synchronous: the
    /// handler (or the default processing it defers to) has run by the time
    /// this returns.
    pub fn close_window(&self, window: WindowHandle) {
        self.system.send_message(window, WM_CLOSE, 0, 0);
    }

    /// Hide the console window if this process created it, i.e. the program
    /// was built as a console application but started from Explorer rather
    /// than from a terminal.  A console inherited from a terminal, or no
    /// console at all, is left alone.
    pub fn hide_console_window(&self) {
        let Some(console) = self.system.console_window() else {
            return;
        };
        if self.system.window_process_id(console) == self.system.current_process_id() {
            self.system.show_window_async(console, ShowCommand::Hide);
            log::debug!("hid console window {:#x}", console.raw());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        config::LoopMode,
        platform::headless::{HeadlessSystem, DEFAULT_PROCESS_ID},
        window::{message::codes::WM_DESTROY, Message, USE_DEFAULT},
    };

    fn ignore_all(_: WindowHandle, _: &Message) -> Option<isize> {
        None
    }

    fn session() -> Session<HeadlessSystem> {
        Session::new(HeadlessSystem::new())
    }

    fn test_window(session: &Session<HeadlessSystem>) -> WindowHandle {
        session
            .create_window(0, 0, 800, 600, "TestClass", ignore_all)
            .expect("create window")
    }

    // ── Creation ──────────────────────────────────────────────────────────────

    #[test]
    fn creates_visible_overlapped_window() {
        let s = session();
        let w = test_window(&s);
        let style = s.system().window_style(w);
        assert!(style.contains(WindowStyle::OVERLAPPED_WINDOW | WindowStyle::VISIBLE));
        assert_eq!(s.system().window_rect(w).unwrap(), Rect::from_origin_size(0, 0, 800, 600));
        assert!(!s.is_fullscreen(w));
    }

    #[test]
    fn system_default_geometry_is_accepted() {
        let s = session();
        let w = s
            .create_window(USE_DEFAULT, USE_DEFAULT, USE_DEFAULT, USE_DEFAULT, "Default", ignore_all)
            .expect("default geometry");
        assert!(s.system().is_visible(w));
        assert!(s.enable_fullscreen(w).is_some());
        assert!(s.is_fullscreen(w));
    }

    #[test]
    fn far_origin_does_not_overflow() {
        let s = session();
        let w = s
            .create_window(i32::MAX - 10, 0, 800, 600, "Far", ignore_all)
            .expect("far window");
        let rect = s.system().window_rect(w).unwrap();
        assert_eq!((rect.left, rect.width(), rect.height()), (i32::MAX - 10, 800, 600));

        // Off every monitor, so it lands on the primary.
        let placement = s.enable_fullscreen(w).unwrap();
        assert_eq!(s.system().window_rect(w).unwrap(), Rect::from_origin_size(0, 0, 1920, 1080));
        s.disable_fullscreen(w, &placement);
        assert_eq!(s.system().window_rect(w).unwrap(), rect);
    }

    #[test]
    fn duplicate_class_name_fails_registration() {
        let s = session();
        test_window(&s);
        let err = s
            .create_window(0, 0, 800, 600, "TestClass", ignore_all)
            .unwrap_err();
        assert!(matches!(err, SessionError::ClassRegistration { .. }));
    }

    #[test]
    fn rejected_creation_keeps_class_registered() {
        let s = session();
        s.system().reject_window_creation(true);
        let err = s
            .create_window(0, 0, 800, 600, "Rejected", ignore_all)
            .unwrap_err();
        assert!(matches!(err, SessionError::WindowCreation { .. }));

        s.system().reject_window_creation(false);
        let again = s.create_window(0, 0, 800, 600, "Rejected", ignore_all);
        assert!(matches!(again, Err(SessionError::ClassRegistration { .. })));
    }

    // ── Fullscreen ────────────────────────────────────────────────────────────

    #[test]
    fn fullscreen_round_trip_restores_geometry_and_style() {
        let s = session();
        let w = test_window(&s);
        let style_before = s.system().window_style(w);

        let placement = s.enable_fullscreen(w).expect("placement captured");
        assert!(s.is_fullscreen(w));
        assert_eq!(
            s.system().window_rect(w).unwrap(),
            Rect::from_origin_size(0, 0, 1920, 1080)
        );
        assert!(!s.system().cursor_visible());

        s.disable_fullscreen(w, &placement);
        assert!(!s.is_fullscreen(w));
        assert_eq!(s.system().window_rect(w).unwrap(), Rect::from_origin_size(0, 0, 800, 600));
        assert_eq!(s.system().window_style(w), style_before);
        assert!(s.system().cursor_visible());
    }

    #[test]
    fn fullscreen_covers_the_containing_monitor_only() {
        let primary = Rect::from_origin_size(0, 0, 1920, 1080);
        let secondary = Rect::from_origin_size(1920, 0, 2560, 1440);
        let s = Session::new(HeadlessSystem::with_monitors(vec![primary, secondary]));
        let w = s
            .create_window(2000, 100, 800, 600, "Second", ignore_all)
            .unwrap();

        s.enable_fullscreen(w).unwrap();
        assert_eq!(s.system().window_rect(w).unwrap(), secondary);
    }

    #[test]
    fn fullscreen_keeps_unrelated_style_bits() {
        let s = session();
        let w = test_window(&s);
        let extra = WindowStyle::from_bits_retain(0x0000_0100);
        let style = s.system().window_style(w) | extra;
        s.system().set_window_style(w, style);

        let placement = s.enable_fullscreen(w).unwrap();
        assert_eq!(s.system().window_style(w), WindowStyle::VISIBLE | extra);

        s.disable_fullscreen(w, &placement);
        assert_eq!(s.system().window_style(w), style);
    }

    #[test]
    fn monitor_failure_leaves_window_but_hides_cursor() {
        let s = session();
        let w = test_window(&s);
        let style_before = s.system().window_style(w);
        s.system().fail_monitor_lookup(true);

        let placement = s.enable_fullscreen(w);

        // Captured before the failing query, so still returned.
        assert_eq!(
            placement.map(|p| p.normal_position),
            Some(Rect::from_origin_size(0, 0, 800, 600))
        );
        assert_eq!(s.system().window_style(w), style_before);
        assert_eq!(s.system().window_rect(w).unwrap(), Rect::from_origin_size(0, 0, 800, 600));
        assert!(!s.is_fullscreen(w));
        assert!(!s.system().cursor_visible());
    }

    #[test]
    fn capture_failure_returns_nothing_and_changes_nothing() {
        let s = session();
        let w = test_window(&s);
        s.system().fail_placement_capture(true);

        assert!(s.enable_fullscreen(w).is_none());
        assert!(!s.is_fullscreen(w));
        assert_eq!(s.system().cursor_count(), -1);
    }

    #[test]
    fn try_enable_surfaces_monitor_failure() {
        let s = session();
        let w = test_window(&s);
        s.system().fail_monitor_lookup(true);

        let err = s.try_enable_fullscreen(w).unwrap_err();
        assert!(matches!(err, SessionError::Win32 { function: "MonitorFromWindow", .. }));
        assert!(!s.is_fullscreen(w));
        assert!(!s.system().cursor_visible());
    }

    #[test]
    fn failed_move_puts_the_frame_back() {
        let s = session();
        let w = test_window(&s);
        let style_before = s.system().window_style(w);
        s.system().fail_window_pos(true);

        let err = s.try_enable_fullscreen(w).unwrap_err();
        assert!(matches!(err, SessionError::Win32 { function: "SetWindowPos", .. }));
        assert_eq!(s.system().window_style(w), style_before);
        assert!(!s.is_fullscreen(w));

        // The silent variant still hands back the placement.
        let placement = s.enable_fullscreen(w).expect("placement captured");
        assert!(!s.is_fullscreen(w));
        assert_eq!(placement.normal_position, Rect::from_origin_size(0, 0, 800, 600));
        assert_eq!(s.system().cursor_count(), -2);
    }

    #[test]
    fn try_disable_surfaces_restore_failure() {
        let s = session();
        let w = test_window(&s);
        let placement = s.try_enable_fullscreen(w).expect("enable");
        s.system().fail_placement_restore(true);

        let err = s.try_disable_fullscreen(w, &placement).unwrap_err();
        assert!(matches!(err, SessionError::Win32 { function: "SetWindowPlacement", .. }));
        // The style and the cursor are still put back.
        assert!(!s.is_fullscreen(w));
        assert!(s.system().cursor_visible());
    }

    #[test]
    fn silent_disable_still_shows_cursor_on_failure() {
        let s = session();
        let w = test_window(&s);
        let placement = s.enable_fullscreen(w).unwrap();
        s.system().fail_placement_restore(true);

        s.disable_fullscreen(w, &placement);
        assert!(!s.is_fullscreen(w));
        assert!(s.system().cursor_visible());
    }

    #[test]
    fn toggle_after_monitor_failure_hides_cursor_again() {
        let s = session();
        let w = test_window(&s);
        let mut saved = None;
        s.system().fail_monitor_lookup(true);

        s.toggle_fullscreen(w, &mut saved);
        assert!(!s.is_fullscreen(w));
        assert!(saved.is_some());

        s.system().fail_monitor_lookup(false);
        s.toggle_fullscreen(w, &mut saved);
        assert!(s.is_fullscreen(w));
        s.toggle_fullscreen(w, &mut saved);
        assert!(!s.is_fullscreen(w));
        assert_eq!(s.system().cursor_count(), -1);
        assert!(!s.system().cursor_visible());
    }

    #[test]
    fn toggle_round_trips() {
        let s = session();
        let w = test_window(&s);
        let mut saved = None;

        s.toggle_fullscreen(w, &mut saved);
        assert!(s.is_fullscreen(w));
        assert!(saved.is_some());

        s.toggle_fullscreen(w, &mut saved);
        assert!(!s.is_fullscreen(w));
        assert!(saved.is_none());
        assert_eq!(s.system().window_rect(w).unwrap(), Rect::from_origin_size(0, 0, 800, 600));
    }

    // ── Ancillary ─────────────────────────────────────────────────────────────

    #[test]
    fn icon_is_applied_to_every_slot() {
        let s = session();
        let w = test_window(&s);
        s.system().add_icon_resource(101);

        s.set_icon_from_exe(w, 101);

        let icon = s.system().load_icon_resource(101);
        assert!(icon.is_some());
        for kind in [ICON_SMALL, ICON_SMALL2, ICON_BIG] {
            assert_eq!(s.system().icon(w, kind), icon);
        }
    }

    #[test]
    fn missing_icon_is_ignored() {
        let s = session();
        let w = test_window(&s);
        s.set_icon_from_exe(w, 999);
        assert!(s.system().icon(w, ICON_BIG).is_none());
    }

    #[test]
    fn close_asks_the_handler() {
        let s = session();
        let closes = Rc::new(Cell::new(0));
        let seen = Rc::clone(&closes);
        // Swallows WM_CLOSE, so the window must survive.
        let w = s
            .create_window(0, 0, 320, 240, "Stubborn", move |_: WindowHandle, m: &Message| -> Option<isize> {
                if m.code == WM_CLOSE {
                    seen.set(seen.get() + 1);
                    return Some(0);
                }
                None
            })
            .unwrap();

        s.close_window(w);
        assert_eq!(closes.get(), 1);
        assert!(s.system().is_window(w));
    }

    #[test]
    fn close_with_default_processing_destroys() {
        let s = session();
        let destroyed = Rc::new(Cell::new(false));
        let seen = Rc::clone(&destroyed);
        let w = s
            .create_window(0, 0, 320, 240, "Polite", move |_: WindowHandle, m: &Message| -> Option<isize> {
                if m.code == WM_DESTROY {
                    seen.set(true);
                }
                None
            })
            .unwrap();

        s.close_window(w);
        assert!(destroyed.get());
        assert!(!s.system().is_window(w));
    }

    #[test]
    fn hides_console_owned_by_this_process() {
        let s = session();
        let console = s.system().attach_console(DEFAULT_PROCESS_ID).unwrap();
        s.hide_console_window();
        assert!(!s.system().is_visible(console));
    }

    #[test]
    fn leaves_inherited_console_alone() {
        let s = session();
        let console = s.system().attach_console(DEFAULT_PROCESS_ID + 1).unwrap();
        s.hide_console_window();
        assert!(s.system().is_visible(console));
    }

    #[test]
    fn no_console_is_a_no_op() {
        session().hide_console_window();
    }

    // ── Config-driven open ────────────────────────────────────────────────────

    #[test]
    fn open_applies_config() {
        let s = session();
        s.system().add_icon_resource(1);
        let console = s.system().attach_console(DEFAULT_PROCESS_ID).unwrap();
        let config = WindowConfig {
            x: 100,
            y: 50,
            width: 640,
            height: 480,
            class_name: "Configured".to_owned(),
            icon_resource: Some(1),
            start_fullscreen: true,
            hide_console: true,
            loop_mode: LoopMode::Polling,
        };

        let opened = s.open(&config, ignore_all).expect("open");

        assert!(s.is_fullscreen(opened.window));
        assert!(s.system().icon(opened.window, ICON_BIG).is_some());
        assert!(!s.system().is_visible(console));
        let windowed = opened.windowed.expect("windowed placement");
        s.disable_fullscreen(opened.window, &windowed);
        assert_eq!(
            s.system().window_rect(opened.window).unwrap(),
            Rect::from_origin_size(100, 50, 640, 480)
        );
    }
}
