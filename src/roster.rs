//! Pre-game setup: who plays and who deals.

use crate::game::{GameError, Session};
use rand::Rng;
use tracing::debug;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RosterError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("no player at index {index} (roster has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Players in join order plus an optional explicit dealer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
    dealer: Option<usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn dealer(&self) -> Option<usize> {
        self.dealer
    }

    pub fn can_start(&self) -> bool {
        self.names.len() >= 2
    }

    /// Append a player; the name is trimmed and must not be blank.
    pub fn add_player(&mut self, name: &str) -> Result<usize, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        self.names.push(name.to_string());
        debug!(player = name, count = self.names.len(), "player added");
        Ok(self.names.len() - 1)
    }

    /// Remove a player. A chosen dealer keeps pointing at the same person,
    /// or becomes unset when the dealer is the one removed.
    pub fn remove_player(&mut self, index: usize) -> Result<String, RosterError> {
        if index >= self.names.len() {
            return Err(RosterError::IndexOutOfRange { index, len: self.names.len() });
        }
        let removed = self.names.remove(index);
        self.dealer = match self.dealer {
            Some(d) if d == index => None,
            Some(d) if d > index => Some(d - 1),
            other => other,
        };
        Ok(removed)
    }

    pub fn set_dealer(&mut self, index: usize) -> Result<(), RosterError> {
        if index >= self.names.len() {
            return Err(RosterError::IndexOutOfRange { index, len: self.names.len() });
        }
        self.dealer = Some(index);
        Ok(())
    }

    pub fn clear_dealer(&mut self) {
        self.dealer = None;
    }

    /// Select `index` as dealer, or unset it if it already is.
    pub fn toggle_dealer(&mut self, index: usize) -> Result<(), RosterError> {
        if self.dealer == Some(index) {
            self.clear_dealer();
            return Ok(());
        }
        self.set_dealer(index)
    }

    /// Freeze the roster into a new game.
    pub fn start<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Session, RosterError> {
        Ok(Session::start(self.names.as_slice(), self.dealer, rng)?)
    }
}
