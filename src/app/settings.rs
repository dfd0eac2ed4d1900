//! Client settings: parse/write `settings.conf` and resolve config file locations.
//!
//! The file uses the same `<key> = <value>` format as the theme and keybinding
//! files. Command-line flags are applied on top of whatever the file provides.

use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "svcpkg-manager";
pub const SETTINGS_FILE: &str = "settings.conf";
pub const THEME_FILE: &str = "theme.conf";
pub const KEYBINDS_FILE: &str = "keybinds.conf";

/// Connection and behavior settings for the client.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Scheme and authority of the backend, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Path of the collection resource relative to `base_url`.
    pub collection_path: String,
    /// Reject drafts whose price/duration/accuracy do not parse as numbers.
    pub strict_numbers: bool,
    /// Refetch the collection after a delete instead of patching it locally.
    pub refetch_after_delete: bool,
    /// How long a notification stays on screen.
    pub notice_ttl_secs: u64,
    /// Per-request timeout; 0 keeps the transport default.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            collection_path: "/api/services".to_string(),
            strict_numbers: false,
            refetch_after_delete: false,
            notice_ttl_secs: 3,
            request_timeout_secs: 0,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or write and return defaults if the file is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default settings");
        }
        cfg
    }

    /// Parse a settings file. Unknown keys and malformed lines are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            match lhs {
                "base_url" => cfg.base_url = rhs.to_string(),
                "collection_path" => cfg.collection_path = rhs.to_string(),
                "strict_numbers" => cfg.strict_numbers = parse_bool(rhs),
                "refetch_after_delete" => cfg.refetch_after_delete = parse_bool(rhs),
                "notice_ttl_secs" => {
                    cfg.notice_ttl_secs = rhs.parse().unwrap_or(cfg.notice_ttl_secs)
                }
                "request_timeout_secs" => {
                    cfg.request_timeout_secs = rhs.parse().unwrap_or(cfg.request_timeout_secs)
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# svcpkg-manager settings\n");
        buf.push_str("# Command-line flags override these values.\n\n");
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        let _ = writeln!(&mut buf, "collection_path = {}", self.collection_path);
        let _ = writeln!(&mut buf, "strict_numbers = {}", self.strict_numbers);
        let _ = writeln!(&mut buf, "refetch_after_delete = {}", self.refetch_after_delete);
        let _ = writeln!(&mut buf, "notice_ttl_secs = {}", self.notice_ttl_secs);
        let _ = writeln!(&mut buf, "request_timeout_secs = {}", self.request_timeout_secs);
        std::fs::write(path, buf)
    }
}

/// Directory holding `settings.conf`, `theme.conf` and `keybinds.conf`.
///
/// An explicit directory wins; otherwise the platform config dir, then the working directory.
pub fn config_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
