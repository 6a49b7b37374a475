use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const LOGO: &str = r#"
 ___         _            ___ _         _
| _ \___ __| |  ___ _ _  | _ ) |__ _ __| |__
|   / -_) _` | / _ \ '_| | _ \ / _` / _| / /
|_|_\___\__,_| \___/_|   |___/_\__,_\__|_\_\
"#;

pub(super) fn draw_setup(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 80, f.area());
    let block = Block::default().title("red-or-black").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    let inner_all = inner(area);

    let logo_lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Red))))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(logo_lines.len() as u16 + 1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(inner_all);
    f.render_widget(Paragraph::new(logo_lines).alignment(Alignment::Center), rows[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(app.name_input.as_str()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().title("Player name").borders(Borders::ALL));
    f.render_widget(input, rows[1]);

    let mut roster_lines: Vec<Line> = Vec::new();
    roster_lines.push(Line::from(Span::styled(
        format!("Players ({}):", app.roster.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let entries = app.roster_display();
    if entries.is_empty() {
        roster_lines.push(Line::from(Span::styled(
            "nobody yet",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for (i, entry) in entries.into_iter().enumerate() {
        let style = if i == app.selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if i == app.selected { "> " } else { "  " };
        roster_lines.push(Line::from(Span::styled(format!("{marker}{entry}"), style)));
    }
    if app.roster.dealer().is_none() && !app.roster.is_empty() {
        roster_lines.push(Line::from(""));
        roster_lines.push(Line::from(Span::styled(
            "Dealer: random at start",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    f.render_widget(Paragraph::new(roster_lines).wrap(Wrap { trim: true }), rows[2]);

    let mut footer = vec![Line::from(Span::styled(
        "[Enter] Add/Start  [↑/↓] Select  [Tab] Dealer  [Del] Remove  [Esc] Quit",
        Style::default().add_modifier(Modifier::DIM),
    ))];
    match app.action_error() {
        Some(err) => footer.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        ))),
        None => footer.push(Line::from(app.setup_hint())),
    }
    f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), rows[3]);
}
