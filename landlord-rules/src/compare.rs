//! Deciding whether one classified [`Hand`](crate::patterns::Hand) legally
//! beats another.

use crate::patterns::{Hand, HandType};

/// True if `candidate` legally beats `reference` under the table's current
/// play mode.
///
/// - Free play (`is_free_play`): any legally classified hand is accepted.
/// - Otherwise a `Rocket` candidate beats anything.
/// - A `Bomb` candidate beats any non-`Bomb`; against another `Bomb` it
///   only wins by strictly higher power.
/// - Any other candidate must share `reference`'s [`HandType`], have
///   strictly higher power, and — for the length-sensitive shapes
///   (`Straight`, `StraightPair`, `Airplane`, `AirplaneWithPair`) — the
///   same card count.
#[must_use]
pub fn beats(candidate: &Hand, reference: &Hand, is_free_play: bool) -> bool {
    if is_free_play {
        return true;
    }

    if candidate.hand_type == HandType::Rocket {
        return true;
    }

    if candidate.hand_type == HandType::Bomb {
        return match reference.hand_type {
            HandType::Bomb => candidate.power > reference.power,
            HandType::Rocket => false,
            _ => true,
        };
    }

    if candidate.hand_type != reference.hand_type {
        return false;
    }

    if candidate.hand_type.is_length_sensitive() && candidate.size() != reference.size() {
        return false;
    }

    candidate.power > reference.power
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Rank, Suit};
    use crate::patterns::classify;

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    fn pair(rank: Rank) -> Hand {
        classify(&[c(Suit::Hearts, rank), c(Suit::Spades, rank)]).unwrap()
    }

    fn triple(rank: Rank) -> Hand {
        classify(&[c(Suit::Hearts, rank), c(Suit::Diamonds, rank), c(Suit::Spades, rank)]).unwrap()
    }

    fn bomb(rank: Rank) -> Hand {
        classify(&[
            c(Suit::Hearts, rank),
            c(Suit::Diamonds, rank),
            c(Suit::Clubs, rank),
            c(Suit::Spades, rank),
        ])
        .unwrap()
    }

    fn rocket() -> Hand {
        classify(&[Card::joker(Rank::BigJoker), Card::joker(Rank::SmallJoker)]).unwrap()
    }

    fn straight_from(rank: Rank) -> Hand {
        let ranks = [Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven];
        let start = ranks.iter().position(|r| *r == rank).unwrap();
        let cards: Vec<Card> = ranks[start..start + 5.min(ranks.len() - start)]
            .iter()
            .map(|r| c(Suit::Hearts, *r))
            .collect();
        classify(&cards).unwrap()
    }

    #[test]
    fn higher_pair_beats_lower_pair() {
        assert!(beats(&pair(Rank::Five), &pair(Rank::Three), false));
    }

    #[test]
    fn pair_does_not_beat_triple() {
        assert!(!beats(&pair(Rank::Five), &triple(Rank::Three), false));
    }

    #[test]
    fn bomb_beats_straight() {
        assert!(beats(&bomb(Rank::Four), &straight_from(Rank::Three), false));
    }

    #[test]
    fn lower_bomb_does_not_beat_higher_bomb() {
        assert!(!beats(&bomb(Rank::Three), &bomb(Rank::Four), false));
    }

    #[test]
    fn equal_power_does_not_beat() {
        assert!(!beats(&pair(Rank::Five), &pair(Rank::Five), false));
    }

    #[test]
    fn straight_needs_matching_size() {
        let short = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Hearts, Rank::Five),
            c(Suit::Hearts, Rank::Six),
            c(Suit::Hearts, Rank::Seven),
        ])
        .unwrap();
        let longer = classify(&[
            c(Suit::Hearts, Rank::Four),
            c(Suit::Hearts, Rank::Five),
            c(Suit::Hearts, Rank::Six),
            c(Suit::Hearts, Rank::Seven),
            c(Suit::Hearts, Rank::Eight),
            c(Suit::Hearts, Rank::Nine),
        ])
        .unwrap();
        assert!(!beats(&longer, &short, false));
    }

    #[test]
    fn rocket_beats_anything() {
        assert!(beats(&rocket(), &bomb(Rank::Ace), false));
        assert!(beats(&rocket(), &straight_from(Rank::Three), false));
    }

    #[test]
    fn nothing_beats_rocket() {
        assert!(!beats(&bomb(Rank::Ace), &rocket(), false));
    }

    #[test]
    fn free_play_accepts_anything() {
        assert!(beats(&pair(Rank::Three), &triple(Rank::King), true));
    }
}
