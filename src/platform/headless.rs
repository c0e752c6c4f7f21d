// ── Headless window system ────────────────────────────────────────────────────
//
// An in-memory window manager that behaves like the parts of Win32 the
// session touches: a class registry, top-level windows with style bits and
// rectangles, monitors, one thread's message queue, the cursor display
// counter, embedded icon resources, and an optional console window.
//
// It exists so that the session logic runs (and is tested) on any host, and
// it can be told to fail individual OS calls to exercise the silent-failure
// paths.  Cloning shares the same simulated desktop.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    rc::Rc,
};

use super::{PeekMode, WindowSystem};
use crate::{
    error::{Result, SessionError},
    window::{
        message::codes::{WM_CHAR, WM_CLOSE, WM_CREATE, WM_DESTROY, WM_KEYDOWN, WM_QUIT, WM_SETICON},
        IconHandle, Message, MessageHandler, MonitorHandle, MonitorInfo, Point, PositionFlags,
        Rect, ShowCommand, WindowHandle, WindowPlacement, WindowStyle, USE_DEFAULT,
    },
};

// Win32 error codes reported for simulated failures.
const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;
const ERROR_INVALID_WINDOW_HANDLE: u32 = 1400;
const ERROR_CANNOT_FIND_WND_CLASS: u32 = 1407;
const ERROR_CLASS_ALREADY_EXISTS: u32 = 1410;
const ERROR_INVALID_MONITOR_HANDLE: u32 = 1461;

const CONSOLE_CLASS: &str = "ConsoleWindowClass";

/// Process id the simulated process runs as.
pub const DEFAULT_PROCESS_ID: u32 = 4242;

const FIRST_WINDOW_HANDLE: isize = 0x0001_0010;
const ICON_HANDLE_BASE: isize = 0x0002_0000;

/// `WINDOWPLACEMENT` reports unset min/max positions as (-1, -1).
const UNSET_POSITION: Point = Point { x: -1, y: -1 };

/// Where and how large `USE_DEFAULT` geometry puts a new window.
const DEFAULT_ORIGIN: Point = Point { x: 26, y: 26 };
const DEFAULT_SIZE: (i32, i32) = (1024, 768);

/// `SW_SHOWNORMAL`
const SHOW_NORMAL: u32 = ShowCommand::ShowNormal as u32;

// ── State ─────────────────────────────────────────────────────────────────────

struct SimWindow {
    class_name: String,
    style: WindowStyle,
    rect: Rect,
    show_cmd: u32,
    process_id: u32,
    /// `WM_SETICON` slots, keyed by `ICON_SMALL` / `ICON_BIG` / `ICON_SMALL2`.
    icons: HashMap<usize, IconHandle>,
}

#[derive(Default)]
struct Faults {
    monitor_lookup: bool,
    placement_capture: bool,
    placement_restore: bool,
    window_pos: bool,
    window_creation: bool,
}

struct State {
    classes: HashMap<String, Rc<dyn MessageHandler>>,
    windows: BTreeMap<WindowHandle, SimWindow>,
    next_handle: isize,
    /// Monitor rectangles; the first one is the primary monitor.
    monitors: Vec<Rect>,
    cursor_count: i32,
    queue: VecDeque<Message>,
    quit: Option<i32>,
    icon_resources: HashSet<u16>,
    console: Option<WindowHandle>,
    process_id: u32,
    faults: Faults,
    /// Fake `GetMessageTime` clock, bumped on every post.
    tick: u32,
}

impl State {
    fn alloc_window(&mut self, class_name: &str, style: WindowStyle, rect: Rect, pid: u32)
        -> Option<WindowHandle> {
        let handle = WindowHandle::from_raw(self.next_handle)?;
        self.next_handle += 2;
        self.windows.insert(
            handle,
            SimWindow {
                class_name: class_name.to_owned(),
                style,
                rect,
                show_cmd: SHOW_NORMAL,
                process_id: pid,
                icons: HashMap::new(),
            },
        );
        Some(handle)
    }

    fn window(&self, window: WindowHandle, function: &'static str) -> Result<&SimWindow> {
        self.windows.get(&window).ok_or(SessionError::Win32 {
            function,
            code: ERROR_INVALID_WINDOW_HANDLE,
        })
    }

    fn window_mut(&mut self, window: WindowHandle, function: &'static str)
        -> Result<&mut SimWindow> {
        self.windows.get_mut(&window).ok_or(SessionError::Win32 {
            function,
            code: ERROR_INVALID_WINDOW_HANDLE,
        })
    }

    fn handler_for(&self, window: WindowHandle) -> Option<Rc<dyn MessageHandler>> {
        let class_name = &self.windows.get(&window)?.class_name;
        self.classes.get(class_name).cloned()
    }

    fn quit_message(code: i32) -> Message {
        Message::new(None, WM_QUIT, code as usize, 0)
    }
}

// ── HeadlessSystem ────────────────────────────────────────────────────────────

/// Simulated single-thread desktop.  See the module docs.
#[derive(Clone)]
pub struct HeadlessSystem {
    state: Rc<RefCell<State>>,
}

impl Default for HeadlessSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSystem {
    /// A desktop with a single 1920×1080 primary monitor at the origin.
    pub fn new() -> Self {
        Self::with_monitors(vec![Rect::from_origin_size(0, 0, 1920, 1080)])
    }

    /// A desktop with the given monitors; the first one is primary.
    pub fn with_monitors(monitors: Vec<Rect>) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                classes: HashMap::new(),
                windows: BTreeMap::new(),
                next_handle: FIRST_WINDOW_HANDLE,
                monitors,
                cursor_count: 0,
                queue: VecDeque::new(),
                quit: None,
                icon_resources: HashSet::new(),
                console: None,
                process_id: DEFAULT_PROCESS_ID,
                faults: Faults::default(),
                tick: 0,
            })),
        }
    }

    // ── Fixture setup ─────────────────────────────────────────────────────────

    /// Embed icon `resource_id` in the simulated executable.
    pub fn add_icon_resource(&self, resource_id: u16) {
        self.state.borrow_mut().icon_resources.insert(resource_id);
    }

    /// Attach a visible console window owned by `owner_process_id`.
    ///
    /// Pass `DEFAULT_PROCESS_ID` for a console this process allocated, any
    /// other id for one inherited from a launching terminal.
    pub fn attach_console(&self, owner_process_id: u32) -> Option<WindowHandle> {
        let mut st = self.state.borrow_mut();
        let rect = Rect::from_origin_size(40, 40, 640, 480);
        let style = WindowStyle::OVERLAPPED_WINDOW | WindowStyle::VISIBLE;
        let console = st.alloc_window(CONSOLE_CLASS, style, rect, owner_process_id)?;
        st.console = Some(console);
        Some(console)
    }

    // ── Fault injection ───────────────────────────────────────────────────────

    /// Make `monitor_from_window` report no monitor.
    pub fn fail_monitor_lookup(&self, fail: bool) {
        self.state.borrow_mut().faults.monitor_lookup = fail;
    }

    /// Make `window_placement` fail.
    pub fn fail_placement_capture(&self, fail: bool) {
        self.state.borrow_mut().faults.placement_capture = fail;
    }

    /// Make `set_window_placement` fail.
    pub fn fail_placement_restore(&self, fail: bool) {
        self.state.borrow_mut().faults.placement_restore = fail;
    }

    /// Make `set_window_pos` fail.
    pub fn fail_window_pos(&self, fail: bool) {
        self.state.borrow_mut().faults.window_pos = fail;
    }

    /// Make `create_window` fail as if the system were out of memory.
    pub fn reject_window_creation(&self, reject: bool) {
        self.state.borrow_mut().faults.window_creation = reject;
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    pub fn is_window(&self, window: WindowHandle) -> bool {
        self.state.borrow().windows.contains_key(&window)
    }

    pub fn is_visible(&self, window: WindowHandle) -> bool {
        self.state
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.style.contains(WindowStyle::VISIBLE))
    }

    pub fn cursor_count(&self) -> i32 {
        self.state.borrow().cursor_count
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_count() >= 0
    }

    /// The icon in `kind`'s `WM_SETICON` slot.
    pub fn icon(&self, window: WindowHandle, kind: usize) -> Option<IconHandle> {
        self.state
            .borrow()
            .windows
            .get(&window)
            .and_then(|w| w.icons.get(&kind).copied())
    }

    pub fn queued_messages(&self) -> usize {
        self.state.borrow().queue.len()
    }

    // ── Delivery ──────────────────────────────────────────────────────────────

    /// Run `message` through `window`'s class handler, falling back to the
    /// default processing.  The state borrow is released before the handler
    /// runs so that it may call back into the system.
    fn deliver(&self, window: WindowHandle, message: &Message) -> isize {
        let handler = self.state.borrow().handler_for(window);
        match handler.and_then(|h| h.handle(window, message)) {
            Some(result) => result,
            None => self.default_window_proc(window, message),
        }
    }
}

impl WindowSystem for HeadlessSystem {
    fn register_class(&self, class_name: &str, handler: Rc<dyn MessageHandler>) -> Result<()> {
        let mut st = self.state.borrow_mut();
        if st.classes.contains_key(class_name) {
            return Err(SessionError::ClassRegistration {
                class_name: class_name.to_owned(),
                code: ERROR_CLASS_ALREADY_EXISTS,
            });
        }
        st.classes.insert(class_name.to_owned(), handler);
        Ok(())
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
        let rejected = |code| SessionError::WindowCreation {
            class_name: class_name.to_owned(),
            code,
        };

        let window = {
            let mut st = self.state.borrow_mut();
            if st.faults.window_creation {
                return Err(rejected(ERROR_NOT_ENOUGH_MEMORY));
            }
            if !st.classes.contains_key(class_name) {
                return Err(rejected(ERROR_CANNOT_FIND_WND_CLASS));
            }
            // USE_DEFAULT in `x` also overrides `y`; in `width`, `height`.
            let (x, y) = if x == USE_DEFAULT {
                (DEFAULT_ORIGIN.x, DEFAULT_ORIGIN.y)
            } else {
                (x, y)
            };
            let (width, height) = if width == USE_DEFAULT { DEFAULT_SIZE } else { (width, height) };
            let rect = Rect::from_origin_size(x, y, width, height);
            let pid = st.process_id;
            st.alloc_window(class_name, style, rect, pid)
                .ok_or_else(|| rejected(ERROR_NOT_ENOUGH_MEMORY))?
        };

        // A handler answering WM_CREATE with -1 vetoes the creation.
        if self.send_message(window, WM_CREATE, 0, 0) == -1 {
            let _ = self.destroy_window(window);
            return Err(rejected(0));
        }
        Ok(window)
    }

    fn destroy_window(&self, window: WindowHandle) -> Result<()> {
        self.state.borrow().window(window, "DestroyWindow")?;
        self.send_message(window, WM_DESTROY, 0, 0);

        let mut st = self.state.borrow_mut();
        st.windows.remove(&window);
        if st.console == Some(window) {
            st.console = None;
        }
        Ok(())
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Rect> {
        Ok(self.state.borrow().window(window, "GetWindowRect")?.rect)
    }

    fn window_style(&self, window: WindowHandle) -> WindowStyle {
        // GetWindowLongW yields 0 for an invalid handle.
        self.state
            .borrow()
            .windows
            .get(&window)
            .map_or(WindowStyle::empty(), |w| w.style)
    }

    fn set_window_style(&self, window: WindowHandle, style: WindowStyle) -> WindowStyle {
        self.state
            .borrow_mut()
            .windows
            .get_mut(&window)
            .map_or(WindowStyle::empty(), |w| std::mem::replace(&mut w.style, style))
    }

    fn window_placement(&self, window: WindowHandle) -> Result<WindowPlacement> {
        let st = self.state.borrow();
        if st.faults.placement_capture {
            return Err(SessionError::Win32 {
                function: "GetWindowPlacement",
                code: ERROR_INVALID_WINDOW_HANDLE,
            });
        }
        let w = st.window(window, "GetWindowPlacement")?;
        Ok(WindowPlacement {
            flags: 0,
            show_cmd: w.show_cmd,
            min_position: UNSET_POSITION,
            max_position: UNSET_POSITION,
            normal_position: w.rect,
        })
    }

    fn set_window_placement(&self, window: WindowHandle, placement: &WindowPlacement)
        -> Result<()> {
        let mut st = self.state.borrow_mut();
        if st.faults.placement_restore {
            return Err(SessionError::Win32 {
                function: "SetWindowPlacement",
                code: ERROR_INVALID_WINDOW_HANDLE,
            });
        }
        let w = st.window_mut(window, "SetWindowPlacement")?;
        w.rect = placement.normal_position;
        w.show_cmd = placement.show_cmd;
        Ok(())
    }

    fn set_window_pos(&self, window: WindowHandle, rect: Rect, flags: PositionFlags)
        -> Result<()> {
        let mut st = self.state.borrow_mut();
        if st.faults.window_pos {
            return Err(SessionError::Win32 {
                function: "SetWindowPos",
                code: ERROR_INVALID_WINDOW_HANDLE,
            });
        }
        let w = st.window_mut(window, "SetWindowPos")?;
        let (left, top) = if flags.contains(PositionFlags::NO_MOVE) {
            (w.rect.left, w.rect.top)
        } else {
            (rect.left, rect.top)
        };
        let (width, height) = if flags.contains(PositionFlags::NO_SIZE) {
            (w.rect.width(), w.rect.height())
        } else {
            (rect.width(), rect.height())
        };
        w.rect = Rect::from_origin_size(left, top, width, height);
        Ok(())
    }

    fn monitor_from_window(&self, window: WindowHandle) -> Option<MonitorHandle> {
        let st = self.state.borrow();
        if st.faults.monitor_lookup || st.monitors.is_empty() {
            return None;
        }
        let rect = st.windows.get(&window)?.rect;

        // Largest overlap wins, the earliest monitor on a tie.  With no
        // overlap at all that is index 0, the primary.
        let mut best = (0, 0);
        for (index, monitor) in st.monitors.iter().enumerate() {
            let area = monitor.overlap_area(&rect);
            if area > best.1 {
                best = (index, area);
            }
        }
        MonitorHandle::from_raw(best.0 as isize + 1)
    }

    fn monitor_info(&self, monitor: MonitorHandle) -> Result<MonitorInfo> {
        let st = self.state.borrow();
        let found = monitor
            .raw()
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| st.monitors.get(index).map(|rect| (index, rect)));
        let Some((index, rect)) = found else {
            return Err(SessionError::Win32 {
                function: "GetMonitorInfoW",
                code: ERROR_INVALID_MONITOR_HANDLE,
            });
        };
        Ok(MonitorInfo {
            monitor: *rect,
            work: *rect,
            primary: index == 0,
        })
    }

    fn show_cursor(&self, show: bool) -> i32 {
        let mut st = self.state.borrow_mut();
        st.cursor_count += if show { 1 } else { -1 };
        st.cursor_count
    }

    fn get_message(&self) -> Result<Message> {
        let mut st = self.state.borrow_mut();
        if let Some(message) = st.queue.pop_front() {
            return Ok(message);
        }
        // WM_QUIT is only retrieved once the queue has drained.
        st.quit
            .take()
            .map(State::quit_message)
            .ok_or(SessionError::EmptyQueue)
    }

    fn peek_message(&self, mode: PeekMode) -> Option<Message> {
        let mut st = self.state.borrow_mut();
        match mode {
            PeekMode::NoRemove => st
                .queue
                .front()
                .copied()
                .or_else(|| st.quit.map(State::quit_message)),
            PeekMode::Remove => st
                .queue
                .pop_front()
                .or_else(|| st.quit.take().map(State::quit_message)),
        }
    }

    fn post_message(&self, window: WindowHandle, code: u32, wparam: usize, lparam: isize)
        -> Result<()> {
        let mut st = self.state.borrow_mut();
        st.window(window, "PostMessageW")?;
        st.tick += 1;
        let message = Message {
            time: st.tick,
            ..Message::new(Some(window), code, wparam, lparam)
        };
        st.queue.push_back(message);
        Ok(())
    }

    fn send_message(&self, window: WindowHandle, code: u32, wparam: usize, lparam: isize)
        -> isize {
        if !self.is_window(window) {
            return 0;
        }
        self.deliver(window, &Message::new(Some(window), code, wparam, lparam))
    }

    fn translate_message(&self, message: &Message) -> bool {
        let Some(window) = message.window else {
            return false;
        };
        if message.code != WM_KEYDOWN {
            return false;
        }
        // Unshifted US layout: letter keys type lowercase, digits and space
        // type themselves, everything else produces no character.
        let ch = match u8::try_from(message.wparam) {
            Ok(key @ b'A'..=b'Z') => key.to_ascii_lowercase(),
            Ok(key @ (b'0'..=b'9' | b' ')) => key,
            _ => return false,
        };
        self.post_message(window, WM_CHAR, usize::from(ch), message.lparam)
            .is_ok()
    }

    fn dispatch_message(&self, message: &Message) -> isize {
        match message.window {
            Some(window) if self.is_window(window) => self.deliver(window, message),
            _ => 0,
        }
    }

    fn post_quit_message(&self, exit_code: i32) {
        self.state.borrow_mut().quit = Some(exit_code);
    }

    fn default_window_proc(&self, window: WindowHandle, message: &Message) -> isize {
        match message.code {
            WM_CLOSE => {
                let _ = self.destroy_window(window);
                0
            }
            WM_SETICON => {
                let mut st = self.state.borrow_mut();
                let Some(w) = st.windows.get_mut(&window) else {
                    return 0;
                };
                let previous = match IconHandle::from_raw(message.lparam) {
                    Some(icon) => w.icons.insert(message.wparam, icon),
                    None => w.icons.remove(&message.wparam),
                };
                previous.map_or(0, IconHandle::raw)
            }
            _ => 0,
        }
    }

    fn load_icon_resource(&self, resource_id: u16) -> Option<IconHandle> {
        let st = self.state.borrow();
        if !st.icon_resources.contains(&resource_id) {
            return None;
        }
        // LR_SHARED: every load of the same resource yields the same handle.
        IconHandle::from_raw(ICON_HANDLE_BASE + resource_id as isize)
    }

    fn console_window(&self) -> Option<WindowHandle> {
        self.state.borrow().console
    }

    fn window_process_id(&self, window: WindowHandle) -> u32 {
        self.state
            .borrow()
            .windows
            .get(&window)
            .map_or(0, |w| w.process_id)
    }

    fn current_process_id(&self) -> u32 {
        self.state.borrow().process_id
    }

    fn show_window_async(&self, window: WindowHandle, command: ShowCommand) -> bool {
        let mut st = self.state.borrow_mut();
        let Some(w) = st.windows.get_mut(&window) else {
            return false;
        };
        match command {
            ShowCommand::Hide => w.style.remove(WindowStyle::VISIBLE),
            ShowCommand::Show | ShowCommand::ShowNormal => w.style.insert(WindowStyle::VISIBLE),
        }
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::window::message::codes::WM_NULL;

    fn ignore_all() -> Rc<dyn MessageHandler> {
        Rc::new(|_: WindowHandle, _: &Message| -> Option<isize> { None })
    }

    fn visible_window(sys: &HeadlessSystem, class_name: &str, rect: Rect) -> WindowHandle {
        sys.register_class(class_name, ignore_all()).expect("register");
        let style = WindowStyle::OVERLAPPED_WINDOW | WindowStyle::VISIBLE;
        sys.create_window(class_name, style, rect.left, rect.top, rect.width(), rect.height())
            .expect("create")
    }

    #[test]
    fn duplicate_class_is_rejected() {
        let sys = HeadlessSystem::new();
        sys.register_class("Dup", ignore_all()).expect("first registration");
        match sys.register_class("Dup", ignore_all()) {
            Err(SessionError::ClassRegistration { class_name, code }) => {
                assert_eq!(class_name, "Dup");
                assert_eq!(code, ERROR_CLASS_ALREADY_EXISTS);
            }
            other => panic!("expected ClassRegistration, got {other:?}"),
        }
    }

    #[test]
    fn unregistered_class_cannot_create() {
        let sys = HeadlessSystem::new();
        let err = sys
            .create_window("Nope", WindowStyle::VISIBLE, 0, 0, 10, 10)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::WindowCreation { code: ERROR_CANNOT_FIND_WND_CLASS, .. }
        ));
    }

    #[test]
    fn create_vetoed_by_handler() {
        let sys = HeadlessSystem::new();
        let veto: Rc<dyn MessageHandler> =
            Rc::new(|_: WindowHandle, m: &Message| -> Option<isize> {
            (m.code == WM_CREATE).then_some(-1)
        });
        sys.register_class("Veto", veto).expect("register");
        let err = sys
            .create_window("Veto", WindowStyle::VISIBLE, 0, 0, 10, 10)
            .unwrap_err();
        assert!(matches!(err, SessionError::WindowCreation { .. }));
    }

    #[test]
    fn close_destroys_via_default_processing() {
        let sys = HeadlessSystem::new();
        let destroyed = Rc::new(Cell::new(false));
        let seen = Rc::clone(&destroyed);
        let handler: Rc<dyn MessageHandler> = Rc::new(move |_: WindowHandle, m: &Message| -> Option<isize> {
            if m.code == WM_DESTROY {
                seen.set(true);
            }
            None
        });
        sys.register_class("Closable", handler).expect("register");
        let w = sys
            .create_window("Closable", WindowStyle::VISIBLE, 0, 0, 10, 10)
            .expect("create");

        sys.send_message(w, WM_CLOSE, 0, 0);

        assert!(destroyed.get());
        assert!(!sys.is_window(w));
    }

    #[test]
    fn set_window_pos_honours_no_move_and_no_size() {
        let sys = HeadlessSystem::new();
        let w = visible_window(&sys, "Pos", Rect::from_origin_size(10, 10, 100, 100));

        sys.set_window_pos(w, Rect::from_origin_size(50, 60, 300, 200), PositionFlags::NO_SIZE)
            .expect("move");
        assert_eq!(sys.window_rect(w).unwrap(), Rect::from_origin_size(50, 60, 100, 100));

        sys.set_window_pos(w, Rect::from_origin_size(0, 0, 300, 200), PositionFlags::NO_MOVE)
            .expect("resize");
        assert_eq!(sys.window_rect(w).unwrap(), Rect::from_origin_size(50, 60, 300, 200));
    }

    #[test]
    fn monitor_lookup_prefers_largest_overlap() {
        let primary = Rect::from_origin_size(0, 0, 1920, 1080);
        let secondary = Rect::from_origin_size(1920, 0, 2560, 1440);
        let sys = HeadlessSystem::with_monitors(vec![primary, secondary]);

        let w = visible_window(&sys, "Mon", Rect::from_origin_size(1800, 100, 800, 600));
        let info = sys.monitor_info(sys.monitor_from_window(w).unwrap()).unwrap();
        assert_eq!(info.monitor, secondary);
        assert!(!info.primary);

        // Off every monitor: MONITOR_DEFAULTTOPRIMARY.
        sys.set_window_pos(w, Rect::from_origin_size(-5000, -5000, 10, 10), PositionFlags::empty())
            .unwrap();
        let info = sys.monitor_info(sys.monitor_from_window(w).unwrap()).unwrap();
        assert!(info.primary);
    }

    #[test]
    fn quit_is_retrieved_after_queued_messages() {
        let sys = HeadlessSystem::new();
        let w = visible_window(&sys, "Queue", Rect::from_origin_size(0, 0, 10, 10));
        sys.post_quit_message(3);
        sys.post_message(w, WM_NULL, 0, 0).unwrap();

        assert_eq!(sys.peek_message(PeekMode::NoRemove).unwrap().code, WM_NULL);
        assert_eq!(sys.get_message().unwrap().code, WM_NULL);

        let quit = sys.peek_message(PeekMode::NoRemove).unwrap();
        assert!(quit.is_quit());
        // Peeking without removal leaves the quit pending.
        let quit = sys.get_message().unwrap();
        assert_eq!(quit.exit_code(), 3);
        assert!(matches!(sys.get_message(), Err(SessionError::EmptyQueue)));
    }

    #[test]
    fn translate_posts_characters_for_letter_keys() {
        let sys = HeadlessSystem::new();
        let w = visible_window(&sys, "Keys", Rect::from_origin_size(0, 0, 10, 10));

        let key = Message::new(Some(w), WM_KEYDOWN, usize::from(b'Q'), 0x0010_0001);
        assert!(sys.translate_message(&key));
        let ch = sys.get_message().unwrap();
        assert_eq!((ch.code, ch.wparam), (WM_CHAR, usize::from(b'q')));

        let f11 = Message::new(Some(w), WM_KEYDOWN, 0x7A, 0);
        assert!(!sys.translate_message(&f11));
        assert_eq!(sys.queued_messages(), 0);
    }

    #[test]
    fn shared_icons_are_stable() {
        let sys = HeadlessSystem::new();
        sys.add_icon_resource(7);
        assert_eq!(sys.load_icon_resource(7), sys.load_icon_resource(7));
        assert!(sys.load_icon_resource(8).is_none());

        sys.add_icon_resource(u16::MAX);
        assert_eq!(
            sys.load_icon_resource(u16::MAX).map(IconHandle::raw),
            Some(ICON_HANDLE_BASE + 0xFFFF)
        );
    }

    #[test]
    fn default_geometry_is_chosen_by_the_system() {
        let sys = HeadlessSystem::new();
        sys.register_class("Default", ignore_all()).expect("register");
        let w = sys
            .create_window("Default", WindowStyle::VISIBLE, USE_DEFAULT, 5, USE_DEFAULT, 7)
            .expect("create");
        let (width, height) = DEFAULT_SIZE;
        assert_eq!(
            sys.window_rect(w).unwrap(),
            Rect::from_origin_size(DEFAULT_ORIGIN.x, DEFAULT_ORIGIN.y, width, height)
        );
    }

    #[test]
    fn bogus_monitor_handles_are_rejected() {
        let sys = HeadlessSystem::new();
        for raw in [isize::MIN, -1, 2] {
            let monitor = MonitorHandle::from_raw(raw).unwrap();
            assert!(matches!(
                sys.monitor_info(monitor),
                Err(SessionError::Win32 { code: ERROR_INVALID_MONITOR_HANDLE, .. })
            ));
        }
    }

    #[test]
    fn equal_overlap_picks_the_earlier_monitor() {
        let left = Rect::from_origin_size(0, 0, 1000, 1000);
        let right = Rect::from_origin_size(1000, 0, 1000, 1000);
        let primary = Rect::from_origin_size(-3000, 0, 1000, 1000);
        let sys = HeadlessSystem::with_monitors(vec![primary, left, right]);
        let w = visible_window(&sys, "Straddle", Rect::from_origin_size(900, 0, 200, 100));
        let info = sys.monitor_info(sys.monitor_from_window(w).unwrap()).unwrap();
        assert_eq!(info.monitor, left);
        assert!(!info.primary);
    }
}
