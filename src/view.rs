//! Read-only projections for renderers. Frontends (the TUI, tests, anything
//! else) draw from this trait instead of reaching into session internals.
//! It is implemented for the bare `Session` and for the timed `Sequencer`.

use crate::cards::Card;
use crate::game::Session;
use crate::rules::{Guess, Stage};
use crate::scheduler::Scheduler;
use crate::sequencer::Sequencer;

pub trait TableView {
    fn session(&self) -> &Session;

    // Queries
    fn stage(&self) -> Stage {
        self.session().stage()
    }
    /// Guess options for the current stage; empty while a guess is resolving.
    fn valid_guesses(&self) -> Vec<Guess> {
        if self.session().turn_locked() {
            return Vec::new();
        }
        self.session().stage().options()
    }
    fn deck_remaining(&self) -> usize {
        self.session().deck_remaining()
    }
    fn revealed_row(&self) -> &[Card] {
        self.session().revealed()
    }
    fn discard_count(&self) -> usize {
        self.session().discard().len()
    }
    fn current_player_name(&self) -> &str {
        self.session().current_player().name()
    }
    fn dealer_name(&self) -> &str {
        self.session().dealer_player().name()
    }
    fn turn_locked(&self) -> bool {
        self.session().turn_locked()
    }
}

impl TableView for Session {
    fn session(&self) -> &Session {
        self
    }
}

impl<S: Scheduler> TableView for Sequencer<S> {
    fn session(&self) -> &Session {
        Sequencer::session(self)
    }
}
