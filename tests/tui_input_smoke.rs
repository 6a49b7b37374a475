use crossterm::event::KeyCode;
use red_or_black::sequencer::Timings;
use red_or_black::tui::app::{AppState, InputAction, Scene};
use red_or_black::tui::controller::handle_key;
use red_or_black::view::TableView;

fn type_name(app: &mut AppState, name: &str) {
    for c in name.chars() {
        let _ = handle_key(app, KeyCode::Char(c));
    }
    let _ = handle_key(app, KeyCode::Enter);
}

fn setup_table_app() -> AppState {
    let mut app = AppState::with_timings(Timings::instant());
    type_name(&mut app, "Dee");
    type_name(&mut app, "Ann");
    type_name(&mut app, "Bo");
    // Dee deals
    let _ = handle_key(&mut app, KeyCode::Up);
    let _ = handle_key(&mut app, KeyCode::Up);
    let _ = handle_key(&mut app, KeyCode::Tab);
    let _ = handle_key(&mut app, KeyCode::Enter);
    app
}

#[test]
fn setup_typing_and_start() {
    let app = setup_table_app();
    assert!(matches!(app.scene, Scene::Table));
    assert_eq!(app.roster.names().to_vec(), vec!["Dee", "Ann", "Bo"]);
    let table = app.table().unwrap();
    assert_eq!(table.dealer_name(), "Dee");
    assert_eq!(table.current_player_name(), "Ann");
}

#[test]
fn setup_needs_two_players() {
    let mut app = AppState::default();
    type_name(&mut app, "Solo");
    let _ = handle_key(&mut app, KeyCode::Enter);
    assert!(matches!(app.scene, Scene::Setup));
    assert!(app.action_error().is_some());

    // blank names are not added
    type_name(&mut app, "   ");
    assert_eq!(app.roster.len(), 1);
}

#[test]
fn setup_edit_and_remove() {
    let mut app = AppState::default();
    type_name(&mut app, "Ana");
    for c in "Bx".chars() {
        let _ = handle_key(&mut app, KeyCode::Char(c));
    }
    let _ = handle_key(&mut app, KeyCode::Backspace);
    assert_eq!(app.name_input, "B");
    let _ = handle_key(&mut app, KeyCode::Enter);
    assert_eq!(app.selected, 1);
    let _ = handle_key(&mut app, KeyCode::Tab);
    assert_eq!(app.roster.dealer(), Some(1));
    let _ = handle_key(&mut app, KeyCode::Delete);
    assert_eq!(app.roster.len(), 1);
    assert_eq!(app.roster.dealer(), None);
    assert_eq!(app.selected, 0);
    // q is a name character here, not quit
    assert!(!handle_key(&mut app, KeyCode::Char('q')));
    assert!(handle_key(&mut app, KeyCode::Esc));
}

#[test]
fn guess_keys_resolve_on_tick() {
    let mut app = setup_table_app();
    assert_eq!(app.guess_options().len(), 2);
    let _ = handle_key(&mut app, KeyCode::Char('1'));
    app.tick();
    let session = app.table().unwrap().session();
    assert_eq!(session.deck_remaining(), 51);
    assert_eq!(session.history_len(), 1);
    assert!(!session.turn_locked());
}

#[test]
fn help_and_history_toggle() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(app.help_open());
    let _ = app.handle_input(InputAction::ToggleHistory);
    assert!(!app.help_open());
    assert!(app.history_open());
    // guesses are swallowed while a popup is open
    let _ = handle_key(&mut app, KeyCode::Char('1'));
    assert_eq!(app.table().unwrap().deck_remaining(), 52);
    let _ = handle_key(&mut app, KeyCode::Esc);
    assert!(!app.history_open());
}

#[test]
fn new_game_returns_to_setup_with_roster() {
    let mut app = setup_table_app();
    assert!(!handle_key(&mut app, KeyCode::Char('n')));
    assert!(matches!(app.scene, Scene::Setup));
    assert!(app.table().is_none());
    assert_eq!(app.roster.len(), 3);
    let _ = handle_key(&mut app, KeyCode::Enter);
    assert!(matches!(app.scene, Scene::Table));
    assert!(handle_key(&mut app, KeyCode::Char('Q')));
}
