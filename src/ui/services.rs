//! Services table and the loading placeholder shown before the first fetch completes.
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::app::keymap::KeyAction;

pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new("\nLoading services…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.muted))
        .block(
            Block::default()
                .title("Services")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// Render the paged services table; the page follows the selected row.
pub fn render_services_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let visible = app.visible_services();
    let total = visible.len();
    let rpp = app.rows_per_page.max(1);
    let start = (app.selected_index / rpp) * rpp;
    let end = (start + rpp).min(total);
    let slice = if start < end { &visible[start..end] } else { &visible[0..0] };

    let actions = format!(
        "{} edit · {} delete",
        app.keymap.key_hint(KeyAction::EditSelection).unwrap_or_default(),
        app.keymap.key_hint(KeyAction::DeleteSelection).unwrap_or_default(),
    );
    let rows = slice.iter().enumerate().map(|(i, s)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(s.name.clone()),
            Cell::from(s.price.to_string()),
            Cell::from(s.duration.to_string()),
            Cell::from(s.accuracy.to_string()),
            Cell::from(actions.clone()).style(Style::default().fg(app.theme.muted)),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
    ];
    let header = Row::new(vec!["Name", "Price", "Duration", "Accuracy", "Actions"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let title = if total == app.list.items.len() {
        format!("Services ({total})")
    } else {
        format!("Services ({total} of {})", app.list.items.len())
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
