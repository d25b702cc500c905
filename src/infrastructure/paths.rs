//! Filesystem locations used by the client.
//!
//! All durable files live in one data directory: the session token file and
//! the rotated trace log. The directory defaults to the XDG data home and can
//! be overridden through configuration.

use std::path::{Path, PathBuf};

/// File name of the persisted session token.
pub const TOKEN_FILE: &str = "session.json";

/// File name of the trace log.
pub const TRACE_FILE: &str = "blogline.log";

/// File name of the optional configuration file.
pub const CONFIG_FILE: &str = "config.toml";

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Returns the default data directory.
///
/// Resolves to `$XDG_DATA_HOME/blogline`, else `~/.local/share/blogline`, else
/// a `blogline` directory under the system temp dir when no home is known.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("blogline");
    }
    home_dir().map_or_else(
        || std::env::temp_dir().join("blogline"),
        |home| home.join(".local").join("share").join("blogline"),
    )
}

/// Returns the default configuration file path.
///
/// Resolves to `$XDG_CONFIG_HOME/blogline/config.toml`, else
/// `~/.config/blogline/config.toml`. `None` when neither is known.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("blogline").join(CONFIG_FILE));
    }
    home_dir().map(|home| home.join(".config").join("blogline").join(CONFIG_FILE))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use blogline::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Location of the token file inside `data_dir`.
#[must_use]
pub fn token_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TOKEN_FILE)
}

/// Location of the trace log inside `data_dir`.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_untouched() {
        assert_eq!(expand_tilde("/var/lib/blog"), PathBuf::from("/var/lib/blog"));
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
    }

    #[test]
    fn files_live_in_the_data_dir() {
        let dir = Path::new("/data");
        assert_eq!(token_file(dir), PathBuf::from("/data/session.json"));
        assert_eq!(trace_file(dir), PathBuf::from("/data/blogline.log"));
    }
}
