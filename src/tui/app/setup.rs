use crate::roster::RosterError;
use crate::scheduler::SystemScheduler;
use crate::sequencer::Sequencer;

use super::AppState;

// --- Setup scene operations ---
impl AppState {
    pub(crate) fn push_name_char(&mut self, c: char) {
        if c.is_control() || self.name_input.chars().count() >= Self::MAX_NAME_LEN {
            return;
        }
        self.name_input.push(c);
    }

    /// Enter on the name field: add a player, or start once the field is blank.
    pub(crate) fn submit_name(&mut self) -> bool {
        if self.name_input.trim().is_empty() {
            self.name_input.clear();
            return self.start_game();
        }
        match self.roster.add_player(&self.name_input) {
            Ok(idx) => {
                self.selected = idx;
                self.name_input.clear();
                true
            }
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.roster.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.roster.len();
    }

    pub fn select_prev(&mut self) {
        if self.roster.is_empty() {
            return;
        }
        let n = self.roster.len();
        self.selected = (self.selected + n - 1) % n;
    }

    pub(crate) fn toggle_selected_dealer(&mut self) -> bool {
        self.apply_roster(|app| {
            let idx = app.selected;
            app.roster.toggle_dealer(idx)
        })
    }

    pub(crate) fn remove_selected(&mut self) -> bool {
        let ok = self.apply_roster(|app| {
            let idx = app.selected;
            app.roster.remove_player(idx).map(|_| ())
        });
        if self.selected >= self.roster.len() {
            self.selected = self.roster.len().saturating_sub(1);
        }
        ok
    }

    /// Freeze the roster and open the table. Needs at least two players.
    pub fn start_game(&mut self) -> bool {
        match self.roster.start(&mut self.rng) {
            Ok(session) => {
                let table = Sequencer::new(session, SystemScheduler::new(), self.timings);
                self.enter_table(table);
                true
            }
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    fn apply_roster<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> Result<(), RosterError>,
    {
        match f(self) {
            Ok(()) => true,
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    /// Roster rows for the setup screen: name plus a dealer marker.
    pub fn roster_display(&self) -> Vec<String> {
        self.roster
            .names()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if self.roster.dealer() == Some(i) {
                    format!("{name}  [Dealer]")
                } else {
                    name.clone()
                }
            })
            .collect()
    }

    pub fn setup_hint(&self) -> &'static str {
        if self.roster.can_start() {
            "Enter on an empty name starts the game."
        } else {
            "Add at least two players."
        }
    }
}
