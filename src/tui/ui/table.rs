use crate::cards::{self, Card};
use crate::game::{NoticeKind, Outcome};
use crate::rules::Stage;
use crate::scheduler::SystemScheduler;
use crate::sequencer::Sequencer;
use crate::tui::app::AppState;
use crate::view::TableView;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner, slots};

const CARD_WIDTH: u16 = 9;

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let Some(table) = app.table() else {
        return;
    };
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(7), // row
            Constraint::Length(3), // notice
            Constraint::Min(4),    // status
        ])
        .split(size);

    let header_lines = vec![
        Line::from(format!(
            "Dealer: {}   Up: {}",
            table.dealer_name(),
            table.current_player_name()
        )),
        Line::from(format!(
            "Deck: {}   Discard: {}   Stage {}/4",
            table.deck_remaining(),
            table.discard_count(),
            table.stage()
        )),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("red-or-black").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_row(f, chunks[1], table);
    draw_notice(f, chunks[2], table);

    let status_area = chunks[3];
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), status_area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner(status_area));

    let mut left_info = Vec::new();
    if table.session().is_deck_exhausted() && !table.turn_locked() {
        left_info.push(Line::from("Deck is empty. Press N for a new game."));
    } else {
        left_info.push(Line::from(format!(
            "{}: {}",
            table.current_player_name(),
            table.stage().label()
        )));
        let options = table.valid_guesses();
        if options.is_empty() {
            left_info.push(Line::from(Span::styled(
                "Revealing...",
                Style::default().add_modifier(Modifier::DIM),
            )));
        } else {
            let mut spans = vec![Span::raw("Guess: ")];
            for (i, g) in options.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" • "));
                }
                spans.push(Span::styled(
                    format!("{} {}", i + 1, g.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
            left_info.push(Line::from(spans));
        }
    }
    if let Some(err) = app.action_error() {
        left_info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    let right_keys = vec![Line::from(""), Line::from("? help • H history • N new • Q quit")];
    f.render_widget(Paragraph::new(left_info).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right_keys).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app, table);
    }
}

// Four slots: revealed cards, then the drawn card where it will land.
fn draw_row(f: &mut Frame, area: Rect, table: &Sequencer<SystemScheduler>) {
    let block =
        Block::default().title(format!("Row: {}", table.stage().label())).borders(Borders::ALL);
    let row_inner = inner(area);
    f.render_widget(block, area);
    let cells = slots(row_inner, Stage::ALL.len(), CARD_WIDTH);
    let revealed = table.revealed_row();
    let active = table.active_card();
    let failed = table
        .session()
        .in_flight()
        .and_then(|p| p.outcome)
        .is_some_and(|o| matches!(o, Outcome::Failure { .. }));
    for (i, cell) in cells.iter().take(Stage::ALL.len()).enumerate() {
        if let Some(card) = revealed.get(i) {
            render_card_widget(f, *cell, CardFace::Up(*card), None);
        } else if i == revealed.len() {
            match active {
                Some((card, true)) => {
                    let border = if failed { Color::Red } else { Color::Yellow };
                    render_card_widget(f, *cell, CardFace::Up(card), Some(border));
                }
                Some((_, false)) => {
                    render_card_widget(f, *cell, CardFace::Down, Some(Color::Yellow))
                }
                None => render_card_widget(f, *cell, CardFace::Empty, Some(Color::DarkGray)),
            }
        } else {
            render_card_widget(f, *cell, CardFace::Empty, Some(Color::DarkGray));
        }
    }
}

fn draw_notice(f: &mut Frame, area: Rect, table: &Sequencer<SystemScheduler>) {
    let line = match table.notice() {
        Some(n) => {
            let color = match n.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Danger => Color::Red,
            };
            Line::from(Span::styled(
                n.message.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(""),
    };
    let para = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_history(f: &mut Frame, app: &AppState, table: &Sequencer<SystemScheduler>) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let session = table.session();
    let mut lines: Vec<Line> = Vec::new();
    let entries = session.history_recent_offset(AppState::HISTORY_PAGE_SIZE, app.history_offset());
    if entries.is_empty() {
        lines.push(Line::from("No guesses yet."));
    } else {
        for entry in entries {
            let name = session.players().get(entry.player).map(|p| p.name()).unwrap_or("?");
            let style = match entry.outcome {
                Outcome::Failure { .. } => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "{name} [{}] {} → {} ({})",
                    entry.stage,
                    entry.guess.label(),
                    short_card(entry.card),
                    entry.outcome.label()
                ),
                style,
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Stages:", bold)),
        Line::from("1. Red or black?"),
        Line::from("2. Higher or lower than the first card? Ties lose."),
        Line::from("3. Inside or outside the first two? Edges lose."),
        Line::from("4. Which suit?"),
        Line::from("A wrong guess costs two drinks and ends the turn."),
        Line::from(""),
        Line::from(Span::styled("Table:", bold)),
        Line::from("- 1-4: pick a guess"),
        Line::from("- H: history"),
        Line::from("- N: new game (back to setup)"),
        Line::from("- Q: quit"),
        Line::from(""),
        Line::from(Span::styled("Setup:", bold)),
        Line::from("- Type a name, Enter to add"),
        Line::from("- Up / Down: select player"),
        Line::from("- Tab: toggle dealer"),
        Line::from("- Delete: remove player"),
        Line::from("- Enter on an empty name: start"),
        Line::from("- Esc: quit"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

enum CardFace {
    Up(Card),
    Down,
    Empty,
}

fn suit_glyph_and_style(s: cards::Suit) -> (char, Style) {
    let style = match s.color() {
        cards::Color::Red => Style::default().fg(Color::Red),
        cards::Color::Black => Style::default().fg(Color::White),
    };
    (s.glyph(), style)
}

fn short_card(c: Card) -> String {
    format!("{}{}", c.name(), c.suit().glyph())
}

fn render_card_widget(f: &mut Frame, area: Rect, face: CardFace, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let body = inner(area);
    f.render_widget(block, area);
    let content = match face {
        CardFace::Up(c) => {
            let (_, style) = suit_glyph_and_style(c.suit());
            vec![
                Line::from(""),
                Line::from(Span::styled(short_card(c), style.add_modifier(Modifier::BOLD))),
            ]
        }
        CardFace::Down => vec![
            Line::from(Span::styled("░░░░░", Style::default().fg(Color::Blue))),
            Line::from(Span::styled("░░░░░", Style::default().fg(Color::Blue))),
            Line::from(Span::styled("░░░░░", Style::default().fg(Color::Blue))),
        ],
        CardFace::Empty => vec![Line::from(""), Line::from("[  ]")],
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), body);
}
