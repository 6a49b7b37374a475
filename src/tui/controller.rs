use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an action. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    match app.scene {
        Scene::Setup => match code {
            KeyCode::Esc => return true,
            KeyCode::Enter => {
                let _ = app.handle_input(InputAction::NameSubmit);
            }
            KeyCode::Backspace => {
                let _ = app.handle_input(InputAction::NameBackspace);
            }
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::SelectPrev);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::SelectNext);
            }
            KeyCode::Tab => {
                let _ = app.handle_input(InputAction::ToggleDealer);
            }
            KeyCode::Delete => {
                let _ = app.handle_input(InputAction::RemovePlayer);
            }
            KeyCode::Char(c) => {
                let _ = app.handle_input(InputAction::NameChar(c));
            }
            _ => {}
        },
        Scene::Table => return handle_table_key(app, code),
    }
    false
}

fn handle_table_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('?')) {
        let _ = app.handle_input(InputAction::ToggleHelp);
        return false;
    }
    if matches!(code, KeyCode::Char('h') | KeyCode::Char('H')) {
        let _ = app.handle_input(InputAction::ToggleHistory);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            let _ = app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }
    if app.history_open() {
        match code {
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::HistoryUp);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::HistoryDown);
            }
            KeyCode::Esc => {
                let _ = app.handle_input(InputAction::ToggleHistory);
            }
            _ => {}
        }
        return false;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char('n') | KeyCode::Char('N') => {
            let _ = app.handle_input(InputAction::NewGame);
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as u8 - b'1') as usize;
            let _ = app.handle_input(InputAction::Guess(idx));
        }
        _ => {}
    }
    false
}
