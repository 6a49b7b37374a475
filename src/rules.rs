//! Stage rules: which guesses a stage accepts and whether a drawn card
//! satisfies them. Everything here is pure; the session applies the result.

use crate::cards::{Card, Color, Suit};
use crate::game::GameError;
use std::fmt;

/// One of the four sequential guesses within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Stage {
    Color,
    HigherLower,
    InsideOutside,
    Suit,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Color, Stage::HigherLower, Stage::InsideOutside, Stage::Suit];

    /// 1-based stage number.
    pub const fn number(self) -> u8 {
        match self {
            Stage::Color => 1,
            Stage::HigherLower => 2,
            Stage::InsideOutside => 3,
            Stage::Suit => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Stage> {
        Stage::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// `None` after the last stage: the row is complete.
    pub const fn next(self) -> Option<Stage> {
        match self {
            Stage::Color => Some(Stage::HigherLower),
            Stage::HigherLower => Some(Stage::InsideOutside),
            Stage::InsideOutside => Some(Stage::Suit),
            Stage::Suit => None,
        }
    }

    /// Cards that must already be in the revealed row when this stage is played.
    pub const fn required_revealed(self) -> usize {
        self.number() as usize - 1
    }

    pub const fn label(self) -> &'static str {
        match self {
            Stage::Color => "Red or black?",
            Stage::HigherLower => "Higher or lower?",
            Stage::InsideOutside => "Inside or outside?",
            Stage::Suit => "Pick the suit",
        }
    }

    /// The guesses a player may make at this stage, in display order.
    pub fn options(self) -> Vec<Guess> {
        match self {
            Stage::Color => Color::ALL.iter().map(|&c| Guess::Color(c)).collect(),
            Stage::HigherLower => vec![Guess::Higher, Guess::Lower],
            Stage::InsideOutside => vec![Guess::Inside, Guess::Outside],
            Stage::Suit => Suit::ALL.iter().map(|&s| Guess::Suit(s)).collect(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A player's call. Each variant belongs to exactly one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Guess {
    Color(Color),
    Higher,
    Lower,
    Inside,
    Outside,
    Suit(Suit),
}

impl Guess {
    pub const fn stage(self) -> Stage {
        match self {
            Guess::Color(_) => Stage::Color,
            Guess::Higher | Guess::Lower => Stage::HigherLower,
            Guess::Inside | Guess::Outside => Stage::InsideOutside,
            Guess::Suit(_) => Stage::Suit,
        }
    }

    pub fn label(self) -> String {
        match self {
            Guess::Color(Color::Red) => "Red".to_string(),
            Guess::Color(Color::Black) => "Black".to_string(),
            Guess::Higher => "Higher".to_string(),
            Guess::Lower => "Lower".to_string(),
            Guess::Inside => "Inside".to_string(),
            Guess::Outside => "Outside".to_string(),
            Guess::Suit(s) => s.glyph().to_string(),
        }
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guess::Color(c) => write!(f, "{c}"),
            Guess::Higher => f.write_str("higher"),
            Guess::Lower => f.write_str("lower"),
            Guess::Inside => f.write_str("inside"),
            Guess::Outside => f.write_str("outside"),
            Guess::Suit(s) => f.write_str(s.name()),
        }
    }
}

/// Decide whether `card` satisfies `guess` at `stage`, given the cards
/// already revealed this turn.
///
/// Ties never succeed: an equal rank is wrong for both higher and lower, and
/// a rank equal to either bound is wrong for both inside and outside.
///
/// ```
/// use red_or_black::cards::{Card, Rank, Suit};
/// use red_or_black::rules::{is_correct, Guess, Stage};
///
/// let revealed = [Card::new(Rank::Ten, Suit::Hearts)];
/// let drawn = Card::new(Rank::Ten, Suit::Spades);
/// assert!(!is_correct(Stage::HigherLower, &revealed, drawn, Guess::Higher).unwrap());
/// ```
pub fn is_correct(
    stage: Stage,
    revealed: &[Card],
    card: Card,
    guess: Guess,
) -> Result<bool, GameError> {
    if guess.stage() != stage {
        return Err(GameError::GuessStageMismatch { stage, guess });
    }
    if revealed.len() < stage.required_revealed() {
        return Err(GameError::IncompleteRow { stage, revealed: revealed.len() });
    }
    let rank = card.rank().value();
    let correct = match guess {
        Guess::Color(color) => card.color() == color,
        Guess::Higher | Guess::Lower => {
            // stage 2 compares against the most recently revealed card
            let prev = revealed[stage.required_revealed() - 1].rank().value();
            if guess == Guess::Higher {
                rank > prev
            } else {
                rank < prev
            }
        }
        Guess::Inside | Guess::Outside => {
            let a = revealed[0].rank().value();
            let b = revealed[1].rank().value();
            let (lo, hi) = (a.min(b), a.max(b));
            if guess == Guess::Inside {
                lo < rank && rank < hi
            } else {
                rank < lo || rank > hi
            }
        }
        Guess::Suit(suit) => card.suit() == suit,
    };
    Ok(correct)
}
