use crate::cards::{Card, Rank, Suit};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub const DECK_SIZE: usize = 52;

/// An ordered pile of cards; the front is the next card to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The 52 canonical cards, suit-major (hearts, diamonds, clubs, spades)
    /// then rank-minor (Ace..King).
    ///
    /// ```
    /// use red_or_black::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// assert_eq!(deck.peek().unwrap().to_string(), "Ah");
    /// ```
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                cards.push_back(Card::new(r, s));
            }
        }
        Self { cards }
    }

    /// A deck in exactly the given order, front first.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self { cards: cards.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn peek(&self) -> Option<Card> {
        self.cards.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Return a shuffled copy; `self` is left untouched.
    ///
    /// Fisher-Yates from the last index down to 1, swapping each position
    /// with a uniform index in `0..=i`.
    pub fn shuffled_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Deck {
        let mut cards: Vec<Card> = self.cards.iter().copied().collect();
        for i in (1..cards.len()).rev() {
            let j = rng.random_range(0..=i);
            cards.swap(i, j);
        }
        Deck::from_cards(cards)
    }

    /// Shuffled copy using a seeded RNG for reproducibility.
    pub fn shuffled_seeded(&self, seed: u64) -> Deck {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffled_with(&mut rng)
    }

    /// Draw one card from the front of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}
