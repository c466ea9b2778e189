//! Platform data locations.

use std::path::PathBuf;

/// Directory name used under the platform's local data directory.
pub const APP_DIR_NAME: &str = "native-lifecycle";

/// Returns the default directory for traces and other local files.
///
/// Resolves to the platform local data directory (e.g.
/// `~/.local/share/native-lifecycle` on Linux, the app sandbox's
/// `Library/Application Support` on iOS), falling back to the system temp
/// directory when the platform reports none.
///
/// # Examples
///
/// ```
/// use native_lifecycle::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("native-lifecycle"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or on platforms without a home directory, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use native_lifecycle::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/traces"), home.join("traces"));
            assert_eq!(expand_tilde("~"), home);
        }
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
    }
}
