//! Shared UI components (status bar, notice toast, keybindings panel, layout helpers).
//!
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode, NoticeKind};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Dialog => "DIALOG",
    };
    let state = if app.list.loading { "  loading" } else { "" };
    let msg = format!(
        "mode: {mode}  services:{}  shown:{}  rows/page:{}{state}",
        app.list.items.len(),
        app.visible_services().len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the current notice, if any, in the bottom-right corner of `area`.
pub fn render_notice(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(notice) = &app.notifier.current else {
        return;
    };
    let width = (notice.message.chars().count() as u16 + 4)
        .min(area.width.saturating_sub(2))
        .max(10);
    let height = 3u16.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width: width.min(area.width),
        height,
    };
    let (title, color) = match notice.kind {
        NoticeKind::Success => ("OK", app.theme.success),
        NoticeKind::Error => ("Error", app.theme.error),
    };
    let p = Paragraph::new(notice.message.clone())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Group the keymap into `label -> keys` for display.
pub fn keybind_sections(keymap: &Keymap) -> BTreeMap<&'static str, BTreeSet<String>> {
    let mut out: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in keymap.all_bindings() {
        let key = match code {
            KeyCode::Char(c) if mods.contains(KeyModifiers::SHIFT) => c.to_string(),
            _ => Keymap::format_key(mods, code),
        };
        let label = match action {
            KeyAction::Quit => "Quit",
            KeyAction::AddService => "Add service",
            KeyAction::EditSelection => "Edit",
            KeyAction::DeleteSelection => "Delete",
            KeyAction::Refresh => "Refresh",
            KeyAction::StartSearch => "Search",
            KeyAction::ToggleKeybindsPane => "Toggle this panel",
            KeyAction::MoveUp => "Move up",
            KeyAction::MoveDown => "Move down",
            KeyAction::PageUp => "Page up",
            KeyAction::PageDown => "Page down",
            KeyAction::Ignore => continue,
        };
        out.entry(label).or_default().insert(key);
    }
    out
}

/// Render the right-side keybindings viewer.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let sections = keybind_sections(&app.keymap);
    let col1_w = sections
        .keys()
        .map(|k| k.len())
        .max()
        .unwrap_or(0)
        .max("Next field".len());

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", label, width = col1_w)),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Services:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, keys) in &sections {
        lines.push(row(*label, keys.iter().cloned().collect::<Vec<_>>().join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Dialog:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(row("Submit", "Enter".to_string()));
    lines.push(row("Cancel", "Esc".to_string()));
    lines.push(row("Next field", "Tab, Down".to_string()));
    lines.push(row("Prev field", "Shift+Tab, Up".to_string()));
    lines.push(row("Clear field", "Ctrl+u".to_string()));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 4, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.y, 3);
    }

    #[test]
    fn keybind_sections_group_keys_by_action() {
        let sections = keybind_sections(&Keymap::default());
        let add = sections.get("Add service").unwrap();
        assert!(add.contains("n") && add.contains("a"));
        assert!(sections.get("Quit").unwrap().contains("Ctrl+c"));
        assert!(!sections.contains_key("Ignore"));
    }
}
