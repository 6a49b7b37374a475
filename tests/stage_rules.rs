use proptest::prelude::*;
use red_or_black::cards::{Card, Color, Rank, Suit};
use red_or_black::game::GameError;
use red_or_black::rules::{is_correct, Guess, Stage};

fn any_rank() -> impl Strategy<Value = Rank> {
    (1u8..=13).prop_map(|v| Rank::from_value(v).unwrap())
}

fn any_suit() -> impl Strategy<Value = Suit> {
    prop_oneof![Just(Suit::Hearts), Just(Suit::Diamonds), Just(Suit::Clubs), Just(Suit::Spades)]
}

fn any_card() -> impl Strategy<Value = Card> {
    (any_rank(), any_suit()).prop_map(|(r, s)| Card::new(r, s))
}

fn c(s: &str) -> Card {
    s.parse().unwrap()
}

#[test]
fn ace_is_low() {
    let row = [c("Ah")];
    assert!(is_correct(Stage::HigherLower, &row, c("2s"), Guess::Higher).unwrap());
    assert!(!is_correct(Stage::HigherLower, &row, c("As"), Guess::Lower).unwrap());
    let row = [c("Kh"), c("Qd")];
    assert!(is_correct(Stage::InsideOutside, &row, c("Ac"), Guess::Outside).unwrap());
}

#[test]
fn inside_needs_a_gap() {
    // adjacent bounds leave nothing strictly between them
    let row = [c("5h"), c("6c")];
    for rank in Rank::ALL {
        let card = Card::new(rank, Suit::Spades);
        assert!(!is_correct(Stage::InsideOutside, &row, card, Guess::Inside).unwrap());
    }
}

#[test]
fn bound_order_does_not_matter() {
    let low_first = [c("3h"), c("Jc")];
    let high_first = [c("Jc"), c("3h")];
    for g in [Guess::Inside, Guess::Outside] {
        assert_eq!(
            is_correct(Stage::InsideOutside, &low_first, c("7d"), g),
            is_correct(Stage::InsideOutside, &high_first, c("7d"), g)
        );
    }
}

#[test]
fn misuse_is_an_error() {
    assert_eq!(
        is_correct(Stage::Color, &[], c("Ah"), Guess::Higher),
        Err(GameError::GuessStageMismatch { stage: Stage::Color, guess: Guess::Higher })
    );
    assert_eq!(
        is_correct(Stage::InsideOutside, &[c("Ah")], c("2h"), Guess::Inside),
        Err(GameError::IncompleteRow { stage: Stage::InsideOutside, revealed: 1 })
    );
}

proptest! {
    #[test]
    fn color_matches_suit(card in any_card()) {
        let red = matches!(card.suit(), Suit::Hearts | Suit::Diamonds);
        prop_assert_eq!(is_correct(Stage::Color, &[], card, Guess::Color(Color::Red)).unwrap(), red);
        prop_assert_eq!(is_correct(Stage::Color, &[], card, Guess::Color(Color::Black)).unwrap(), !red);
    }

    #[test]
    fn higher_lower_ties_lose_both(first in any_card(), drawn in any_card()) {
        let row = [first];
        let hi = is_correct(Stage::HigherLower, &row, drawn, Guess::Higher).unwrap();
        let lo = is_correct(Stage::HigherLower, &row, drawn, Guess::Lower).unwrap();
        if first.rank() == drawn.rank() {
            prop_assert!(!hi && !lo);
        } else {
            prop_assert!(hi ^ lo);
        }
    }

    #[test]
    fn inside_outside_bounds_lose_both(a in any_card(), b in any_card(), drawn in any_card()) {
        let row = [a, b];
        let inside = is_correct(Stage::InsideOutside, &row, drawn, Guess::Inside).unwrap();
        let outside = is_correct(Stage::InsideOutside, &row, drawn, Guess::Outside).unwrap();
        let r = drawn.rank();
        if r == a.rank() || r == b.rank() {
            prop_assert!(!inside && !outside);
        } else {
            prop_assert!(inside ^ outside);
        }
    }

    #[test]
    fn exactly_one_suit_wins(row in prop::collection::vec(any_card(), 3), drawn in any_card()) {
        let wins = Suit::ALL
            .iter()
            .filter(|&&s| is_correct(Stage::Suit, &row, drawn, Guess::Suit(s)).unwrap())
            .count();
        prop_assert_eq!(wins, 1);
    }
}
