//! red-or-black: engine for the "Red or Black" drinking card game
//!
//! Each turn a player builds a row of up to four cards, calling one
//! property of each card before it is drawn: its color, higher or lower
//! than the first, inside or outside the first two, then its suit. A wrong
//! call costs two drinks and passes the turn; the dealer never plays.
//!
//! Goals:
//! - Deterministic under a seed, so games can be replayed and tested
//! - Game rules independent of timing; presentation delays live in [`sequencer`]
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: play a stacked deck
//! ```
//! use red_or_black::cards::{parse_cards, Color};
//! use red_or_black::deck::Deck;
//! use red_or_black::game::{Outcome, Session};
//! use red_or_black::rules::{Guess, Stage};
//!
//! let deck = Deck::from_cards(parse_cards("Qh 2c").unwrap());
//! let mut game = Session::with_deck(&["Dana", "Ari", "Bo"], 0, deck).unwrap();
//! assert_eq!(game.current_player().name(), "Ari");
//!
//! let report = game.submit_guess(Guess::Color(Color::Red)).unwrap();
//! assert_eq!(report.outcome, Outcome::Success { next: Stage::HigherLower });
//!
//! // 2 is lower than the queen, so "higher" fails and Bo is up.
//! let report = game.submit_guess(Guess::Higher).unwrap();
//! assert!(matches!(report.outcome, Outcome::Failure { drinks: 2 }));
//! assert_eq!(game.current_player().name(), "Bo");
//! assert_eq!(game.discard().len(), 2);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin red-or-black
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod game;
pub mod roster;
pub mod rules;
pub mod scheduler;
pub mod sequencer;
pub mod tui;
pub mod turn;
pub mod view;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
