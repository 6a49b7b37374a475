use crate::cards::Card;
use crate::deck::Deck;
use crate::rules::{self, Guess, Stage};
use crate::turn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, info, warn};

/// Drinks owed by a player whose guess was wrong.
pub const FAILURE_PENALTY_DRINKS: u8 = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("at least 2 players are required, got {count}")]
    InsufficientPlayers { count: usize },
    #[error("the deck is empty")]
    DeckExhausted,
    #[error("a guess is already being resolved")]
    ConcurrentGuessRejected,
    #[error("guess '{guess}' is not valid at stage {stage}")]
    GuessStageMismatch { stage: Stage, guess: Guess },
    #[error("stage {stage} cannot be played with {revealed} revealed cards")]
    IncompleteRow { stage: Stage, revealed: usize },
    #[error("dealer index {dealer} is out of range for {players} players")]
    DealerOutOfRange { dealer: usize, players: usize },
    #[error("player names must not be empty")]
    EmptyPlayerName,
    #[error("no guess is waiting to be resolved")]
    NothingToResolve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub(crate) name: String,
}

impl Player {
    /// Trimmed, non-empty player.
    pub fn new(name: &str) -> Result<Self, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        Ok(Self { name: name.to_string() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of a resolved guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    /// Correct guess; the same player continues at `next`.
    Success { next: Stage },
    /// Correct suit on the last stage. No drink, turn passes.
    RowComplete,
    /// Wrong guess. The player drinks and the turn passes.
    Failure { drinks: u8 },
}

impl Outcome {
    pub fn ends_turn(self) -> bool {
        !matches!(self, Outcome::Success { .. })
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success { .. } => "Correct",
            Outcome::RowComplete => "Row complete",
            Outcome::Failure { .. } => "Drink",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoticeKind {
    Success,
    Danger,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeKind::Success => f.write_str("success"),
            NoticeKind::Danger => f.write_str("danger"),
        }
    }
}

/// Human-readable outcome message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn for_outcome(player: &str, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success { next } => Notice {
                kind: NoticeKind::Success,
                message: format!("{player} called it! {}", next.label()),
            },
            Outcome::RowComplete => Notice {
                kind: NoticeKind::Success,
                message: format!("{player} completed the row! 🎉"),
            },
            Outcome::Failure { drinks } => Notice {
                kind: NoticeKind::Danger,
                message: format!("{player} drinks {drinks}! 🍺"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GuessReport {
    pub player: usize,
    pub stage: Stage,
    pub guess: Guess,
    pub card: Card,
    pub outcome: Outcome,
    pub notice: Notice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub player: usize,
    pub stage: Stage,
    pub guess: Guess,
    pub card: Card,
    pub outcome: Outcome,
}

/// A drawn card whose guess has not been applied to the row yet, or a
/// losing card waiting for the turn hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct InFlight {
    pub player: usize,
    pub stage: Stage,
    pub guess: Guess,
    pub card: Card,
    pub outcome: Option<Outcome>,
}

/// The authoritative state of one game.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Session {
    pub(crate) players: Vec<Player>,
    pub(crate) dealer: usize,
    pub(crate) current: usize,
    pub(crate) deck: Deck,
    pub(crate) revealed: Vec<Card>,
    pub(crate) discard: Vec<Card>,
    pub(crate) stage: Stage,
    pub(crate) turn_locked: bool,
    pub(crate) in_flight: Option<InFlight>,
    /// Set once a guess ended the turn; cleared by the hand-off.
    pub(crate) awaiting_handoff: bool,
    history: Vec<HistoryEntry>,
}

impl Session {
    /// Start a game with a freshly shuffled deck. A dealer is drawn from `rng`
    /// when none is given.
    pub fn start<S, R>(names: &[S], dealer: Option<usize>, rng: &mut R) -> Result<Self, GameError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if names.len() < 2 {
            return Err(GameError::InsufficientPlayers { count: names.len() });
        }
        let dealer = match dealer {
            Some(d) => d,
            None => turn::choose_dealer(names.len(), rng)
                .ok_or(GameError::InsufficientPlayers { count: names.len() })?,
        };
        let deck = Deck::standard().shuffled_with(rng);
        Self::with_deck(names, dealer, deck)
    }

    /// [`Session::start`] driven by a ChaCha8 RNG seeded with `seed`.
    ///
    /// ```
    /// use red_or_black::game::Session;
    ///
    /// let s = Session::start_seeded(&["Ana", "Ben", "Cy"], Some(2), 7).unwrap();
    /// assert_eq!(s.current(), 0);
    /// assert_eq!(s.deck_remaining(), 52);
    /// ```
    pub fn start_seeded<S: AsRef<str>>(
        names: &[S],
        dealer: Option<usize>,
        seed: u64,
    ) -> Result<Self, GameError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::start(names, dealer, &mut rng)
    }

    /// Start a game on a deck in a known order.
    pub fn with_deck<S: AsRef<str>>(
        names: &[S],
        dealer: usize,
        deck: Deck,
    ) -> Result<Self, GameError> {
        if names.len() < 2 {
            return Err(GameError::InsufficientPlayers { count: names.len() });
        }
        if dealer >= names.len() {
            return Err(GameError::DealerOutOfRange { dealer, players: names.len() });
        }
        let players =
            names.iter().map(|n| Player::new(n.as_ref())).collect::<Result<Vec<_>, _>>()?;
        let current = turn::first_player(dealer, players.len());
        info!(
            players = players.len(),
            dealer = %players[dealer].name,
            first = %players[current].name,
            "game started"
        );
        Ok(Self {
            players,
            dealer,
            current,
            deck,
            revealed: Vec::with_capacity(4),
            discard: Vec::new(),
            stage: Stage::Color,
            turn_locked: false,
            in_flight: None,
            awaiting_handoff: false,
            history: Vec::new(),
        })
    }

    /// Returns a reference to the players
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the dealer position
    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Returns the current player index
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn dealer_player(&self) -> &Player {
        &self.players[self.dealer]
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn revealed(&self) -> &[Card] {
        &self.revealed
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn turn_locked(&self) -> bool {
        self.turn_locked
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    pub fn awaiting_handoff(&self) -> bool {
        self.awaiting_handoff
    }

    /// True when no further guess can be drawn for; the caller should end the game.
    pub fn is_deck_exhausted(&self) -> bool {
        self.deck.is_empty() && !self.turn_locked
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `n` history entries ending `offset` entries before the newest one.
    pub fn history_recent_offset(&self, n: usize, offset: usize) -> Vec<HistoryEntry> {
        if n == 0 || self.history.is_empty() {
            return Vec::new();
        }
        let len = self.history.len();
        let offset = offset.min(len.saturating_sub(n));
        let end = len - offset;
        let start = end.saturating_sub(n);
        self.history[start..end].to_vec()
    }

    /// Resolve a guess in one step: draw, judge, and hand the turn off if it ended.
    pub fn submit_guess(&mut self, guess: Guess) -> Result<GuessReport, GameError> {
        self.begin_guess(guess)?;
        let report = self.resolve_pending()?;
        if report.outcome.ends_turn() {
            self.finish_turn()?;
        }
        Ok(report)
    }

    /// Lock the turn and draw the card for `guess`. The card is held in flight
    /// until [`Session::resolve_pending`].
    pub fn begin_guess(&mut self, guess: Guess) -> Result<Card, GameError> {
        if self.turn_locked {
            debug!(%guess, "guess rejected while another is resolving");
            return Err(GameError::ConcurrentGuessRejected);
        }
        if guess.stage() != self.stage {
            return Err(GameError::GuessStageMismatch { stage: self.stage, guess });
        }
        let Some(card) = self.deck.draw() else {
            warn!(player = %self.current_player().name, stage = %self.stage, "deck exhausted");
            return Err(GameError::DeckExhausted);
        };
        debug!(
            player = %self.current_player().name,
            stage = %self.stage,
            %guess,
            %card,
            remaining = self.deck.len(),
            "card drawn"
        );
        self.turn_locked = true;
        self.in_flight =
            Some(InFlight { player: self.current, stage: self.stage, guess, card, outcome: None });
        Ok(card)
    }

    /// Judge the in-flight card and apply it to the row.
    ///
    /// A correct guess below the last stage unlocks the turn for the same
    /// player. A failure or a completed row keeps the turn locked until
    /// [`Session::finish_turn`].
    pub fn resolve_pending(&mut self) -> Result<GuessReport, GameError> {
        let pending = match self.in_flight {
            Some(p) if p.outcome.is_none() => p,
            _ => return Err(GameError::NothingToResolve),
        };
        let correct = rules::is_correct(pending.stage, &self.revealed, pending.card, pending.guess)?;
        let outcome = match (correct, pending.stage.next()) {
            (true, Some(next)) => Outcome::Success { next },
            (true, None) => Outcome::RowComplete,
            (false, _) => Outcome::Failure { drinks: FAILURE_PENALTY_DRINKS },
        };

        match outcome {
            Outcome::Success { next } => {
                self.revealed.push(pending.card);
                self.stage = next;
                self.in_flight = None;
                self.turn_locked = false;
            }
            Outcome::RowComplete => {
                self.revealed.push(pending.card);
                self.in_flight = None;
                self.awaiting_handoff = true;
            }
            Outcome::Failure { .. } => {
                self.in_flight = Some(InFlight { outcome: Some(outcome), ..pending });
                self.awaiting_handoff = true;
            }
        }

        let name = &self.players[pending.player].name;
        match outcome {
            Outcome::Success { next } => {
                debug!(player = %name, card = %pending.card, next = %next, "guess correct")
            }
            Outcome::RowComplete => info!(player = %name, card = %pending.card, "row complete"),
            Outcome::Failure { drinks } => info!(
                player = %name,
                stage = %pending.stage,
                guess = %pending.guess,
                card = %pending.card,
                drinks,
                "guess wrong"
            ),
        }

        self.history.push(HistoryEntry {
            player: pending.player,
            stage: pending.stage,
            guess: pending.guess,
            card: pending.card,
            outcome,
        });
        Ok(GuessReport {
            player: pending.player,
            stage: pending.stage,
            guess: pending.guess,
            card: pending.card,
            outcome,
            notice: Notice::for_outcome(name, outcome),
        })
    }

    /// Complete a turn that a failure or a full row ended: discard its cards
    /// and pass play to the next eligible player.
    pub fn finish_turn(&mut self) -> Result<(), GameError> {
        if !self.awaiting_handoff {
            return Err(GameError::NothingToResolve);
        }
        let n = self.players.len();
        if n < 2 {
            return Err(GameError::InsufficientPlayers { count: n });
        }
        if let Some(losing) = self.in_flight.take() {
            self.discard.push(losing.card);
        }
        self.rotate()?;
        self.awaiting_handoff = false;
        self.turn_locked = false;
        Ok(())
    }

    /// Drop a guess that cannot be completed. The drawn card is discarded and
    /// the turn unlocks for the same player; a row waiting for its hand-off
    /// is discarded too and play restarts at stage 1.
    pub(crate) fn abandon_guess(&mut self) {
        if let Some(p) = self.in_flight.take() {
            self.discard.push(p.card);
        }
        if self.awaiting_handoff {
            self.discard.append(&mut self.revealed);
            self.stage = Stage::Color;
        }
        self.awaiting_handoff = false;
        self.turn_locked = false;
    }

    /// Rotate to the next player (never the dealer), clearing the row back
    /// to stage 1. Cards left in the row go to the discard pile.
    ///
    /// Rejected while a guess is resolving or waiting for its hand-off;
    /// [`Session::finish_turn`] rotates in that case.
    pub fn advance_turn(&mut self) -> Result<(), GameError> {
        if self.turn_locked || self.awaiting_handoff {
            debug!("turn advance rejected while a guess is in progress");
            return Err(GameError::ConcurrentGuessRejected);
        }
        self.rotate()
    }

    fn rotate(&mut self) -> Result<(), GameError> {
        let n = self.players.len();
        if n < 2 {
            return Err(GameError::InsufficientPlayers { count: n });
        }
        self.discard.append(&mut self.revealed);
        self.stage = Stage::Color;
        let prev = self.current;
        self.current = turn::next_player(self.current, self.dealer, n);
        info!(
            from = %self.players[prev].name,
            to = %self.players[self.current].name,
            discarded = self.discard.len(),
            "turn passed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, Color, Suit};

    fn stacked(cards: &str) -> Deck {
        Deck::from_cards(parse_cards(cards).expect("valid cards"))
    }

    fn mk_session(n: usize, dealer: usize, cards: &str) -> Session {
        let names: Vec<String> = (1..=n).map(|i| format!("P{i}")).collect();
        Session::with_deck(names.as_slice(), dealer, stacked(cards)).expect("valid session")
    }

    #[test]
    fn start_requires_two_players() {
        let err = Session::start_seeded(&["solo"], None, 1).unwrap_err();
        assert_eq!(err, GameError::InsufficientPlayers { count: 1 });
    }

    #[test]
    fn start_rejects_bad_dealer_and_blank_names() {
        let err = Session::start_seeded(&["a", "b"], Some(2), 1).unwrap_err();
        assert_eq!(err, GameError::DealerOutOfRange { dealer: 2, players: 2 });
        let err = Session::start_seeded(&["a", "  "], Some(0), 1).unwrap_err();
        assert_eq!(err, GameError::EmptyPlayerName);
    }

    #[test]
    fn random_dealer_is_reproducible() {
        let names = ["a", "b", "c", "d"];
        let s1 = Session::start_seeded(&names, None, 99).unwrap();
        let s2 = Session::start_seeded(&names, None, 99).unwrap();
        assert_eq!(s1.dealer, s2.dealer);
        assert_eq!(s1.deck, s2.deck);
        assert_ne!(s1.current, s1.dealer);
    }

    #[test]
    fn success_keeps_player_and_advances_stage() {
        let mut s = mk_session(3, 0, "Qh 2c");
        let report = s.submit_guess(Guess::Color(Color::Red)).unwrap();
        assert_eq!(report.outcome, Outcome::Success { next: Stage::HigherLower });
        assert_eq!(report.notice.kind, NoticeKind::Success);
        assert_eq!(s.current, 1);
        assert_eq!(s.stage, Stage::HigherLower);
        assert_eq!(s.revealed.len(), 1);
        assert!(!s.turn_locked);
    }

    #[test]
    fn failure_discards_row_and_card() {
        let mut s = mk_session(3, 0, "Qh 2c 5d");
        s.submit_guess(Guess::Color(Color::Red)).unwrap();
        let report = s.submit_guess(Guess::Higher).unwrap();
        assert_eq!(report.outcome, Outcome::Failure { drinks: FAILURE_PENALTY_DRINKS });
        assert_eq!(report.notice.kind, NoticeKind::Danger);
        assert_eq!(report.notice.message, "P2 drinks 2! 🍺");
        assert_eq!(s.discard.len(), 2);
        assert!(s.revealed.is_empty());
        assert_eq!(s.stage, Stage::Color);
        assert_eq!(s.current, 2);
    }

    #[test]
    fn completed_row_goes_to_discard() {
        let mut s = mk_session(3, 0, "Qh 2c 5d Ks");
        s.submit_guess(Guess::Color(Color::Red)).unwrap();
        s.submit_guess(Guess::Lower).unwrap();
        s.submit_guess(Guess::Inside).unwrap();
        let report = s.submit_guess(Guess::Suit(Suit::Spades)).unwrap();
        assert_eq!(report.outcome, Outcome::RowComplete);
        assert_eq!(s.discard.len(), 4);
        assert!(s.revealed.is_empty());
        assert_eq!(s.stage, Stage::Color);
        assert_eq!(s.current, 2);
    }

    #[test]
    fn locked_turn_rejects_guess_without_mutation() {
        let mut s = mk_session(2, 0, "Qh 2c");
        s.begin_guess(Guess::Color(Color::Red)).unwrap();
        let before = s.clone();
        let err = s.begin_guess(Guess::Color(Color::Black)).unwrap_err();
        assert_eq!(err, GameError::ConcurrentGuessRejected);
        assert_eq!(s.deck, before.deck);
        assert_eq!(s.in_flight, before.in_flight);
        assert_eq!(s.history.len(), before.history.len());
    }

    #[test]
    fn wrong_stage_guess_draws_nothing() {
        let mut s = mk_session(2, 0, "Qh 2c");
        let err = s.submit_guess(Guess::Inside).unwrap_err();
        assert_eq!(err, GameError::GuessStageMismatch { stage: Stage::Color, guess: Guess::Inside });
        assert_eq!(s.deck_remaining(), 2);
        assert!(!s.turn_locked);
    }

    #[test]
    fn empty_deck_reports_exhaustion_and_stays_unlocked() {
        let mut s = mk_session(2, 0, "Qh");
        s.submit_guess(Guess::Color(Color::Red)).unwrap();
        let err = s.submit_guess(Guess::Higher).unwrap_err();
        assert_eq!(err, GameError::DeckExhausted);
        assert!(!s.turn_locked);
        assert!(s.is_deck_exhausted());
        assert_eq!(s.revealed.len(), 1);
    }

    #[test]
    fn finish_turn_requires_ended_turn() {
        let mut s = mk_session(2, 0, "Qh");
        assert_eq!(s.finish_turn().unwrap_err(), GameError::NothingToResolve);
        assert_eq!(s.resolve_pending().unwrap_err(), GameError::NothingToResolve);
    }

    #[test]
    fn advance_turn_rejected_mid_guess() {
        let mut s = mk_session(3, 0, "Qh 2c 5d");
        s.submit_guess(Guess::Color(Color::Red)).unwrap();
        s.begin_guess(Guess::Higher).unwrap();
        assert_eq!(s.advance_turn().unwrap_err(), GameError::ConcurrentGuessRejected);
        assert_eq!(s.current, 1);
        assert_eq!(s.stage, Stage::HigherLower);

        // the pending guess still resolves and play continues
        let report = s.resolve_pending().unwrap();
        assert!(matches!(report.outcome, Outcome::Failure { .. }));
        s.finish_turn().unwrap();
        assert_eq!(s.current, 2);
        assert!(s.submit_guess(Guess::Color(Color::Red)).is_ok());
    }

    #[test]
    fn advance_turn_rejected_before_handoff() {
        let mut s = mk_session(4, 0, "Qh");
        s.begin_guess(Guess::Color(Color::Black)).unwrap();
        s.resolve_pending().unwrap();
        assert!(s.awaiting_handoff);
        assert_eq!(s.advance_turn().unwrap_err(), GameError::ConcurrentGuessRejected);
        s.finish_turn().unwrap();
        // one rotation only: seat 2 is next, not skipped
        assert_eq!(s.current, 2);
        assert_eq!(s.discard.len(), 1);
        s.advance_turn().unwrap();
        assert_eq!(s.current, 3);
    }

    #[test]
    fn history_paging() {
        let mut s = mk_session(3, 0, "Qh 2d 3h 4h");
        for _ in 0..4 {
            s.submit_guess(Guess::Color(Color::Black)).unwrap();
        }
        assert_eq!(s.history_len(), 4);
        let newest = s.history_recent_offset(2, 0);
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[1].card, s.history()[3].card);
        let older = s.history_recent_offset(2, 5);
        assert_eq!(older[0].card, s.history()[0].card);
        assert!(s.history_recent_offset(0, 0).is_empty());
    }
}
