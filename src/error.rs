// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Casement return `error::Result<T>`.  Most window
// operations are fire-and-forget and never produce one; only window setup,
// the blocking message loop, the `try_*` fullscreen variants and the config
// file do.

/// Every error that Casement can produce.
#[derive(Debug)]
pub enum SessionError {
    /// The OS rejected the window class registration (e.g. duplicate name).
    ClassRegistration {
        /// The class name that was being registered.
        class_name: String,
        /// The raw Win32 error code (`GetLastError()` value).
        code: u32,
    },

    /// The OS rejected window creation after the class was registered.
    WindowCreation {
        /// The class the window was being created from.
        class_name: String,
        /// The raw Win32 error code (`GetLastError()` value).
        code: u32,
    },

    /// Any other Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A blocking retrieval on the headless backend found an empty queue and
    /// no pending quit.  Nothing else could ever post, so it would hang.
    EmptyQueue,

    /// A standard I/O error while reading or writing the config file.
    Io(std::io::Error),

    /// The config file is not valid JSON for `WindowConfig`.
    Config(serde_json::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClassRegistration { class_name, code } => {
                write!(f, "registering window class {class_name:?} failed (error {code:#010x})")
            }
            Self::WindowCreation { class_name, code } => {
                write!(f, "creating a {class_name:?} window failed (error {code:#010x})")
            }
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::EmptyQueue => f.write_str("message queue is empty and no quit is pending"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "invalid window config: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a SessionError so that
// `?` can be used on `windows::core::Result<T>` inside the Win32 backend.
#[cfg(windows)]
impl From<windows::core::Error> for SessionError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SessionError>;
