// ── Message loops ─────────────────────────────────────────────────────────────
//
// Both loops service every window owned by the calling thread and end only
// when WM_QUIT is retrieved.  Dispatch is single-threaded: the idle callback
// of the game loop never runs concurrently with a handler.

use super::Session;
use crate::{
    error::Result,
    platform::{PeekMode, WindowSystem},
    window::Message,
};

impl<S: WindowSystem> Session<S> {
    /// Run the event-driven message loop until quit is posted.
    ///
    /// Blocks the calling thread waiting for each message, translates key
    /// presses into character messages, and dispatches to the handler the
    /// target window's class was registered with.  Returns the exit code
    /// passed to `post_quit_message`.
    pub fn run_main_loop(&self) -> Result<i32> {
        loop {
            let message = self.system.get_message()?;
            if message.is_quit() {
                log::debug!("main loop: quit with exit code {}", message.exit_code());
                return Ok(message.exit_code());
            }
            self.dispatch(&message);
        }
    }

    /// Run the real-time message loop until quit is posted.
    ///
    /// Pending messages are handled exactly as in [`Session::run_main_loop`];
    /// whenever the queue is empty `idle` is called once instead.  Use it
    /// for a simulation or render tick.  `idle` runs on this thread, so it
    /// must return promptly or the windows stop responding; a short sleep in
    /// it keeps the loop from spinning a core.
    ///
    /// Ends as soon as the last peeked message is `WM_QUIT`.  If quit is
    /// already pending on entry, `idle` is never called.
    pub fn run_game_loop<F>(&self, mut idle: F) -> i32
    where
        F: FnMut(),
    {
        // Establish the initial last-seen message without consuming it.
        let mut last = self
            .system
            .peek_message(PeekMode::NoRemove)
            .unwrap_or_default();

        while !last.is_quit() {
            match self.system.peek_message(PeekMode::Remove) {
                Some(message) => {
                    self.dispatch(&message);
                    last = message;
                }
                None => idle(),
            }
        }

        log::debug!("game loop: quit with exit code {}", last.exit_code());
        last.exit_code()
    }

    fn dispatch(&self, message: &Message) {
        log::trace!(
            "dispatch {:#06x} to {:?}",
            message.code,
            message.window.map(|w| w.raw())
        );
        self.system.translate_message(message);
        self.system.dispatch_message(message);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        error::SessionError,
        platform::headless::HeadlessSystem,
        window::{
            message::codes::{WM_CHAR, WM_DESTROY, WM_KEYDOWN, WM_NULL},
            WindowHandle,
        },
    };

    /// A window whose handler records every message code and quits on
    /// destroy, the way a real application's handler would.
    fn recording_window(
        session: &Session<HeadlessSystem>,
    ) -> (WindowHandle, Rc<RefCell<Vec<u32>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&log);
        let system = session.system().clone();
        let window = session
            .create_window(0, 0, 800, 600, "LoopClass", move |_: WindowHandle, m: &Message| -> Option<isize> {
                seen.borrow_mut().push(m.code);
                if m.code == WM_DESTROY {
                    system.post_quit_message(7);
                    return Some(0);
                }
                None
            })
            .expect("create window");
        (window, log)
    }

    #[test]
    fn main_loop_dispatches_until_quit() {
        let s = Session::new(HeadlessSystem::new());
        let (w, log) = recording_window(&s);
        s.system().post_message(w, WM_NULL, 0, 0).unwrap();
        s.system()
            .post_message(w, crate::window::message::codes::WM_CLOSE, 0, 0)
            .unwrap();

        assert_eq!(s.run_main_loop().unwrap(), 7);
        assert!(!s.system().is_window(w));
        assert!(log.borrow().contains(&WM_NULL));
    }

    #[test]
    fn main_loop_translates_key_presses() {
        let s = Session::new(HeadlessSystem::new());
        let (w, log) = recording_window(&s);
        s.system().post_message(w, WM_KEYDOWN, usize::from(b'A'), 0).unwrap();
        s.system().post_quit_message(0);

        assert_eq!(s.run_main_loop().unwrap(), 0);
        let codes = log.borrow();
        let key = codes.iter().position(|&c| c == WM_KEYDOWN).expect("key dispatched");
        let ch = codes.iter().position(|&c| c == WM_CHAR).expect("char dispatched");
        assert!(key < ch);
    }

    #[test]
    fn main_loop_surfaces_retrieval_failure() {
        let s = Session::new(HeadlessSystem::new());
        assert!(matches!(s.run_main_loop(), Err(SessionError::EmptyQueue)));
    }

    #[test]
    fn game_loop_skips_idle_when_quit_is_pending() {
        let s = Session::new(HeadlessSystem::new());
        s.system().post_quit_message(2);

        let mut ticks = 0;
        let code = s.run_game_loop(|| ticks += 1);

        assert_eq!(code, 2);
        assert_eq!(ticks, 0);
    }

    #[test]
    fn game_loop_idles_until_the_caller_quits() {
        let s = Session::new(HeadlessSystem::new());
        let system = s.system().clone();

        let mut ticks = 0;
        let code = s.run_game_loop(|| {
            ticks += 1;
            if ticks == 100 {
                system.post_quit_message(0);
            }
        });

        assert_eq!(code, 0);
        assert_eq!(ticks, 100);
    }

    #[test]
    fn game_loop_interleaves_messages_and_idle() {
        let s = Session::new(HeadlessSystem::new());
        let (w, log) = recording_window(&s);
        s.system().post_message(w, WM_NULL, 0, 0).unwrap();
        s.system().post_message(w, WM_NULL, 0, 0).unwrap();

        let system = s.system().clone();
        let mut ticks = 0;
        let code = s.run_game_loop(|| {
            ticks += 1;
            // Messages are drained before the first idle tick.
            if ticks == 1 {
                assert_eq!(system.queued_messages(), 0);
            }
            if ticks == 3 {
                let _ = system.post_message(w, crate::window::message::codes::WM_CLOSE, 0, 0);
            }
        });

        assert_eq!(code, 7);
        assert_eq!(ticks, 3);
        assert_eq!(log.borrow().iter().filter(|&&c| c == WM_NULL).count(), 2);
        assert!(!s.system().is_window(w));
    }
}
