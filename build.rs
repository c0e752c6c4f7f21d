/// Casement build script.
///
/// The Win32 backend only exists on Windows targets. Everywhere else the
/// crate still builds, but callers get the headless backend alone; say so
/// once at build time instead of letting a missing `platform::win32` module
/// surprise them later.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        println!(
            "cargo:warning=casement: target {target_os:?} has no Win32 backend; \
             only platform::headless is available"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
