pub mod components;
pub mod dialog;
pub mod services;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

/// Draw the whole screen from the current state.
pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}", app.search_query),
        InputMode::Normal | InputMode::Dialog if !app.search_query.is_empty() => {
            format!("  filter: {}", app.search_query)
        }
        _ => String::new(),
    };
    let p = Paragraph::new(format!(
        "{}{prompt}  | n: add service; Enter/e: edit; d/Delete: delete; r: refresh; /: search; ?: keys; q: quit",
        app.settings.base_url
    ))
    .block(
        Block::default()
            .title("Manage Service Packages")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    let body = if app.show_keybinds {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(root[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)].as_ref())
            .split(root[1])
    };

    if app.list.loading {
        services::render_loading(f, body[0], app);
    } else {
        services::render_services_table(f, body[0], app);
    }
    if app.show_keybinds {
        components::render_keybinds_panel(f, body[1], app);
    }

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    if let Some(d) = &app.dialog {
        dialog::render_edit_dialog(f, area, app, d);
    }
    components::render_notice(f, root[1], app);
}
