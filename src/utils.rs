//! Path helpers.

use std::path::PathBuf;

/// Joins `name` to the directory `dir_path` with the platform separator.
///
/// # Examples
///
/// ```text
/// let path = get_path("/var/lib/jenga", "session");
/// assert_eq!(path, "/var/lib/jenga/session");
/// ```
pub fn get_path(dir_path: &str, name: &str) -> String {
    let path: PathBuf = [dir_path, name].iter().collect();
    path.to_string_lossy().into_owned()
}
