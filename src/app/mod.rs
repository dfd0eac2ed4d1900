//! Application state types and entry glue.
//!
//! Defines the list view-state, the edit dialog, the notifier and the theme,
//! plus the `AppState` that ties them together. The event loop lives in
//! `update` (re-exported as `run`), state transitions driven by server
//! responses in `sync`, and the background request thread in `worker`.
//!
pub mod keymap;
pub mod settings;
pub mod sync;
pub mod update;
pub mod worker;

use ratatui::style::Color;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::model::{Draft, DraftField, ServicePackage};
use crate::search;
use keymap::Keymap;
use settings::Settings;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Dialog,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

const THEME_KEYS: [&str; 12] = [
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "highlight_bg",
    "success",
    "error",
];

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "success" => &mut self.success,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if let (Some(color), Some(slot)) = (Self::parse_color(val), theme.slot(key)) {
                *slot = color;
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB"), "index:N", or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        if let Some(idx) = lower.strip_prefix("index:") {
            return idx.trim().parse::<u8>().ok().map(Color::Indexed);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        match (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            (Ok(r), Ok(g), Ok(b)) => Some(Color::Rgb(r, g, b)),
            _ => None,
        }
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# svcpkg-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, index:N, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // named colors become their usual hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut copy = *self;
        for key in THEME_KEYS {
            if let Some(c) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(*c));
            }
        }

        std::fs::write(path, buf)
    }

    /// Load the theme from `path`, writing the defaults there first if it is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

/// Last-fetched collection and the loading flag gating the table.
#[derive(Clone, Debug)]
pub struct ListView {
    pub loading: bool,
    pub items: Vec<ServicePackage>,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            loading: true,
            items: Vec::new(),
        }
    }
}

/// Whether the dialog creates a new record or edits an existing one.
#[derive(Clone, Debug, PartialEq)]
pub enum DialogMode {
    Create,
    Edit(ServicePackage),
}

/// Open edit dialog: its mode, the draft being typed, and the focused input.
#[derive(Clone, Debug, PartialEq)]
pub struct EditDialog {
    pub mode: DialogMode,
    pub draft: Draft,
    pub focus: DraftField,
}

impl EditDialog {
    pub fn create() -> Self {
        Self {
            mode: DialogMode::Create,
            draft: Draft::default(),
            focus: DraftField::Name,
        }
    }

    pub fn edit(record: &ServicePackage) -> Self {
        Self {
            draft: Draft::from_record(record),
            mode: DialogMode::Edit(record.clone()),
            focus: DraftField::Name,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Add Service",
            DialogMode::Edit(_) => "Edit Service",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Add",
            DialogMode::Edit(_) => "Update",
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.field_mut(self.focus).push(c);
    }

    pub fn backspace(&mut self) {
        self.draft.field_mut(self.focus).pop();
    }

    pub fn clear_field(&mut self) {
        self.draft.field_mut(self.focus).clear();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Holds the notice currently on screen; a newer notice replaces the older one.
#[derive(Clone, Debug)]
pub struct Notifier {
    pub current: Option<Notice>,
    pub ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Error, message.into());
    }

    fn raise(&mut self, kind: NoticeKind, message: String) {
        self.current = Some(Notice {
            kind,
            message,
            raised_at: Instant::now(),
        });
    }

    /// Drop the current notice once it has been shown for `ttl`. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(n) if now.saturating_duration_since(n.raised_at) >= self.ttl => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

pub struct AppState {
    pub list: ListView,
    pub dialog: Option<EditDialog>,
    pub notifier: Notifier,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_keybinds: bool,
    pub settings: Settings,
    /// Set by every mutation; the event loop redraws and clears it.
    pub dirty: bool,
}

impl AppState {
    /// Create the initial state: loading, no items, dialog closed.
    pub fn new(settings: Settings, theme: Theme, keymap: Keymap) -> Self {
        Self {
            list: ListView::default(),
            dialog: None,
            notifier: Notifier::new(Duration::from_secs(settings.notice_ttl_secs)),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            keymap,
            show_keybinds: false,
            settings,
            dirty: true,
        }
    }

    /// State with default theme and keymap, for tests and embedding.
    pub fn with_settings(settings: Settings) -> Self {
        Self::new(settings, Theme::mocha(), Keymap::default())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return whether a redraw is pending and clear the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Rows currently shown: all items in server order, narrowed by the search query.
    pub fn visible_services(&self) -> Vec<&ServicePackage> {
        search::filter_services(&self.list.items, &self.search_query)
    }

    pub fn selected_service(&self) -> Option<&ServicePackage> {
        self.visible_services().get(self.selected_index).copied()
    }

    /// Keep the selection inside the visible rows after the list changes.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_services().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_services().len();
        if len == 0 {
            self.selected_index = 0;
        } else {
            let next = self.selected_index as isize + delta;
            self.selected_index = next.clamp(0, len as isize - 1) as usize;
        }
        self.mark_dirty();
    }

    /// Open the dialog in create mode with an empty draft.
    pub fn open_create(&mut self) {
        self.dialog = Some(EditDialog::create());
        self.input_mode = InputMode::Dialog;
        self.mark_dirty();
    }

    /// Open the dialog pre-filled from `record`.
    pub fn open_edit(&mut self, record: &ServicePackage) {
        self.dialog = Some(EditDialog::edit(record));
        self.input_mode = InputMode::Dialog;
        self.mark_dirty();
    }

    /// Open the dialog for the selected row, if any.
    pub fn open_edit_selected(&mut self) {
        if let Some(record) = self.selected_service().cloned() {
            self.open_edit(&record);
        }
    }

    /// Close the dialog and discard the draft.
    pub fn close_dialog(&mut self) {
        self.dialog = None;
        if self.input_mode == InputMode::Dialog {
            self.input_mode = InputMode::Normal;
        }
        self.mark_dirty();
    }

    /// Apply a dialog edit and flag a redraw.
    pub fn edit_dialog(&mut self, f: impl FnOnce(&mut EditDialog)) {
        if let Some(d) = self.dialog.as_mut() {
            f(d);
            self.mark_dirty();
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
