//! Turn rotation. The dealer never takes a turn.

use rand::Rng;

/// Pick a dealer uniformly at random from `0..player_count`.
///
/// Returns `None` for an empty table.
pub fn choose_dealer<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> Option<usize> {
    if player_count == 0 {
        return None;
    }
    Some(rng.random_range(0..player_count))
}

/// The seat left of the dealer opens the game.
pub fn first_player(dealer: usize, player_count: usize) -> usize {
    (dealer + 1) % player_count
}

/// Next seat after `current`, skipping the dealer.
///
/// ```
/// use red_or_black::turn::next_player;
///
/// // two players, dealer 0: play stays with seat 1
/// assert_eq!(next_player(1, 0, 2), 1);
/// assert_eq!(next_player(3, 0, 4), 1);
/// ```
pub fn next_player(current: usize, dealer: usize, player_count: usize) -> usize {
    let mut next = (current + 1) % player_count;
    if next == dealer {
        next = (next + 1) % player_count;
    }
    next
}
