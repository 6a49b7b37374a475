use crate::config::AppConfig;
use crate::game::GameError;
use crate::roster::Roster;
use crate::rules::Guess;
use crate::scheduler::SystemScheduler;
use crate::sequencer::{Sequencer, SequencerEvent, Timings};
use crate::view::TableView;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Setup,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    NameChar(char),
    NameBackspace,
    /// Add the typed name, or start the game when the field is empty.
    NameSubmit,
    SelectNext,
    SelectPrev,
    ToggleDealer,
    RemovePlayer,
    StartGame,
    /// Pick the n-th guess option (0-based) for the current stage.
    Guess(usize),
    ToggleHelp,
    ToggleHistory,
    HistoryUp,
    HistoryDown,
    NewGame,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub roster: Roster,
    // Setup input buffer and highlighted roster row
    pub name_input: String,
    pub selected: usize,
    pub(crate) table: Option<Sequencer<SystemScheduler>>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) seed: u64,
    pub(crate) timings: Timings,
    help_open: bool,
    history_open: bool,
    history_offset: usize,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    pub const MAX_NAME_LEN: usize = 24;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    pub fn new(config: &AppConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            scene: Scene::Setup,
            roster: Roster::new(),
            name_input: String::new(),
            selected: 0,
            table: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            timings: config.timings,
            help_open: false,
            history_open: false,
            history_offset: 0,
            action_error: None,
            action_error_at: None,
        }
    }

    /// Same as [`AppState::default`] but with explicit presentation delays.
    pub fn with_timings(timings: Timings) -> Self {
        Self::new(&AppConfig { timings, ..AppConfig::default() })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The running game, once started.
    pub fn table(&self) -> Option<&Sequencer<SystemScheduler>> {
        self.table.as_ref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub(crate) fn set_action_error(&mut self, msg: impl Into<String>) {
        self.action_error = Some(msg.into());
        self.action_error_at = Some(Instant::now());
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub(crate) fn close_popups(&mut self) {
        self.help_open = false;
        self.history_open = false;
        self.history_offset = 0;
    }

    /// Options bound to keys 1..=n; empty while a guess is resolving.
    pub fn guess_options(&self) -> Vec<Guess> {
        self.table.as_ref().map(|t| t.valid_guesses()).unwrap_or_default()
    }

    fn guess(&mut self, idx: usize) -> bool {
        if self.scene != Scene::Table {
            return false;
        }
        let Some(table) = self.table.as_mut() else {
            return false;
        };
        let Some(guess) = table.valid_guesses().get(idx).copied() else {
            return false;
        };
        match table.submit_guess(guess) {
            Ok(()) => {
                self.clear_action_error();
                true
            }
            // Key repeat during a reveal; not worth a banner.
            Err(GameError::ConcurrentGuessRejected) => false,
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::NameChar(c) => {
                if self.scene == Scene::Setup {
                    self.push_name_char(c);
                }
                false
            }
            InputAction::NameBackspace => {
                if self.scene == Scene::Setup {
                    self.name_input.pop();
                }
                false
            }
            InputAction::NameSubmit => self.scene == Scene::Setup && self.submit_name(),
            InputAction::SelectNext => {
                if self.scene == Scene::Setup {
                    self.select_next();
                }
                false
            }
            InputAction::SelectPrev => {
                if self.scene == Scene::Setup {
                    self.select_prev();
                }
                false
            }
            InputAction::ToggleDealer => self.scene == Scene::Setup && self.toggle_selected_dealer(),
            InputAction::RemovePlayer => self.scene == Scene::Setup && self.remove_selected(),
            InputAction::StartGame => self.scene == Scene::Setup && self.start_game(),
            InputAction::Guess(idx) => self.guess(idx),
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.history_open = false;
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::ToggleHistory => {
                if self.scene == Scene::Table {
                    self.help_open = false;
                    if !self.history_open {
                        self.history_offset = 0;
                    }
                    self.history_open = !self.history_open;
                }
                false
            }
            InputAction::HistoryUp => {
                if self.scene == Scene::Table && self.history_open {
                    let len = self.table.as_ref().map(|t| t.session().history_len()).unwrap_or(0);
                    let max_offset = len.saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.scene == Scene::Table && self.history_open && self.history_offset > 0 {
                    self.history_offset -= 1;
                }
                false
            }
            InputAction::NewGame => {
                if self.scene == Scene::Table {
                    self.back_to_setup();
                }
                false
            }
        }
    }

    /// Fire due timers and expire the error banner. Called once per tick.
    pub fn tick(&mut self) {
        if let Some(at) = self.action_error_at {
            if at.elapsed() >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        let Some(table) = self.table.as_mut() else {
            return;
        };
        let mut failure = None;
        for ev in table.pump() {
            debug!(?ev, "sequencer event");
            if let SequencerEvent::Failed(err) = ev {
                failure = Some(err);
            }
        }
        if let Some(err) = failure {
            self.set_action_error(err.to_string());
        }
    }

    pub(crate) fn enter_table(&mut self, table: Sequencer<SystemScheduler>) {
        info!(
            dealer = %table.dealer_name(),
            first = %table.current_player_name(),
            seed = self.seed,
            "table opened"
        );
        self.table = Some(table);
        self.close_popups();
        self.clear_action_error();
        self.scene = Scene::Table;
    }

    pub(crate) fn back_to_setup(&mut self) {
        self.table = None;
        self.close_popups();
        self.clear_action_error();
        self.scene = Scene::Setup;
    }
}
