//! Add/Edit service modal: four text inputs plus Cancel/Submit hints.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::components::centered_rect;
use crate::app::{AppState, EditDialog};
use crate::model::DraftField;

pub fn render_edit_dialog(f: &mut Frame, area: Rect, app: &AppState, dialog: &EditDialog) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, 11, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in DraftField::ALL {
        let focused = field == dialog.focus;
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<10}", field.label()), label_style),
            Span::raw(format!("{}{cursor}", dialog.draft.field(field))),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("[Esc] Cancel", Style::default().fg(app.theme.muted)),
        Span::raw("   "),
        Span::styled(
            format!("[Enter] {}", dialog.submit_label()),
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "Tab/Shift-Tab: next/prev field  Ctrl-U: clear field",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(dialog.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
