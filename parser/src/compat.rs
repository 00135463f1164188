//! Platform compatibility warning.

use tracing::warn;

/// Operating systems whose `netstat` output this crate understands, as
/// reported by [`std::env::consts::OS`].
pub const COMPATIBLE_PLATFORMS: &[&str] = &["linux", "macos"];

/// Returns a warning message when `os` is not in `supported`.
///
/// # Examples
///
/// ```
/// use netstat_schema_parser::compat::{COMPATIBLE_PLATFORMS, check_compatibility};
///
/// assert!(check_compatibility("linux", COMPATIBLE_PLATFORMS).is_none());
/// assert!(check_compatibility("windows", COMPATIBLE_PLATFORMS).is_some());
/// ```
pub fn check_compatibility(os: &str, supported: &[&str]) -> Option<String> {
    if supported.contains(&os) {
        return None;
    }
    Some(format!(
        "netstat parser is not compatible with your OS ({os}); supported platforms: {}",
        supported.join(", ")
    ))
}

/// Checks the running OS and emits a warning when it is unsupported.
pub fn warn_if_incompatible() -> Option<String> {
    let message = check_compatibility(std::env::consts::OS, COMPATIBLE_PLATFORMS)?;
    warn!("{message}");
    Some(message)
}
