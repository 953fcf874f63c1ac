//! Filesystem locations used by the client.

use std::path::PathBuf;

/// Directory name under the platform config dir.
const APP_DIR: &str = "ifarm-admin";

/// The client's config directory, e.g. `~/.config/ifarm-admin` on Linux.
///
/// `None` when the platform config dir cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Default location of the persisted credential file.
pub fn credentials_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("credentials.json"))
}
