// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use casement::{
    codes::{VK_ESCAPE, VK_F11, WM_DESTROY, WM_KEYDOWN},
    config_path, LoopMode, Message, Session, WindowConfig, WindowHandle, WindowPlacement,
    WindowSystem,
};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = load_config();

    if let Err(e) = run(&config) {
        log::error!("{e}");
        // Startup failed before or during the message loop.  In a GUI build
        // a dialog is the only output the user will see.
        #[cfg(windows)]
        casement::platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

/// The config named on the command line, else the one in `%APPDATA%`, else
/// the defaults.
fn load_config() -> WindowConfig {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(config_path);

    match path {
        Some(path) if path.exists() => match WindowConfig::load(&path) {
            Ok(config) => {
                log::info!("loaded {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                WindowConfig::default()
            }
        },
        _ => WindowConfig::default(),
    }
}

#[cfg(windows)]
fn run(config: &WindowConfig) -> casement::Result<()> {
    let session = Session::new(casement::platform::win32::Win32System::new());
    let exit_code = run_demo(&session, config)?;
    log::info!("exited with code {exit_code}");
    Ok(())
}

#[cfg(not(windows))]
fn run(_config: &WindowConfig) -> casement::Result<()> {
    Err(casement::SessionError::Win32 {
        function: "casement-demo",
        // ERROR_CALL_NOT_IMPLEMENTED
        code: 120,
    })
}

/// Open the configured window and drive it: F11 toggles fullscreen, Escape
/// closes, destroying the window quits.
#[cfg_attr(not(windows), allow(dead_code))]
fn run_demo<S>(session: &Session<S>, config: &WindowConfig) -> casement::Result<i32>
where
    S: WindowSystem + Clone + 'static,
{
    // Filled in once `open` returns; the handler only needs it for F11.
    let windowed: Rc<RefCell<Option<WindowPlacement>>> = Rc::new(RefCell::new(None));

    let handler_session = session.clone();
    let handler_windowed = Rc::clone(&windowed);
    let handler = move |window: WindowHandle, m: &Message| -> Option<isize> {
        match (m.code, m.wparam) {
            (WM_KEYDOWN, VK_F11) => {
                let mut saved = handler_windowed.borrow_mut();
                handler_session.toggle_fullscreen(window, &mut saved);
                Some(0)
            }
            (WM_KEYDOWN, VK_ESCAPE) => {
                handler_session.close_window(window);
                Some(0)
            }
            (WM_DESTROY, _) => {
                handler_session.system().post_quit_message(0);
                Some(0)
            }
            _ => None,
        }
    };

    let opened = session.open(config, handler)?;
    *windowed.borrow_mut() = opened.windowed;
    log::info!(
        "window {:#x} open, {:?} loop; F11 toggles fullscreen, Esc closes",
        opened.window.raw(),
        config.loop_mode
    );

    match config.loop_mode {
        LoopMode::Blocking => session.run_main_loop(),
        LoopMode::Polling => {
            let mut frames: u64 = 0;
            Ok(session.run_game_loop(|| {
                frames += 1;
                if frames % 1000 == 0 {
                    log::debug!("{frames} idle frames");
                }
                std::thread::sleep(std::time::Duration::from_millis(1));
            }))
        }
    }
}
