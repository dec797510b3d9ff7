//! Hand classification: deciding which of the 15 legal shapes (if any) a
//! multiset of cards forms.

use std::collections::HashMap;

use super::{Hand, HandType};
use crate::error::LandlordError;
use crate::models::{Card, Rank};

/// Counts of cards grouped by rank, plus the inverse index from
/// "how many cards share a rank" to "which ranks have that many" — the
/// same two maps the wire protocol's original classifier builds before
/// testing each shape's predicate.
struct Counts {
    by_rank: HashMap<Rank, usize>,
    by_count: HashMap<usize, Vec<Rank>>,
}

impl Counts {
    fn build(cards: &[Card]) -> Self {
        let mut by_rank: HashMap<Rank, usize> = HashMap::new();
        for card in cards {
            *by_rank.entry(card.rank).or_insert(0) += 1;
        }

        let mut by_count: HashMap<usize, Vec<Rank>> = HashMap::new();
        for (&rank, &count) in &by_rank {
            by_count.entry(count).or_default().push(rank);
        }
        for ranks in by_count.values_mut() {
            ranks.sort();
        }

        Self { by_rank, by_count }
    }

    fn ranks_with_count(&self, count: usize) -> &[Rank] {
        self.by_count.get(&count).map_or(&[], Vec::as_slice)
    }

    fn group_count(&self) -> usize {
        self.by_count.len()
    }
}

/// Classifies a multiset of cards as one of the 15 legal hand shapes.
///
/// Rules are tested in the order spec'd (Single, Pair, Triple,
/// TripleDouble, TripleSingle, TriplePair, FourSingle, FourTwo,
/// FourTwoPair, Straight, StraightPair, Airplane, AirplaneWithPair, Bomb,
/// Rocket) and the first structural match wins; this also resolves the
/// only case that can double-match (two consecutive triples with nothing
/// attached is a `TripleDouble`, not an `Airplane`, because `TripleDouble`
/// is checked first).
///
/// # Errors
///
/// Returns [`LandlordError::InvalidHand`] if no rule matches.
pub fn classify(cards: &[Card]) -> Result<Hand, LandlordError> {
    if cards.is_empty() {
        return Err(LandlordError::InvalidHand("empty play".into()));
    }

    let counts = Counts::build(cards);
    let make = |hand_type: HandType, power: u32| Hand {
        cards: cards.to_vec(),
        hand_type,
        power,
    };

    if let Some(power) = check_single(cards, &counts) {
        return Ok(make(HandType::Single, power));
    }
    if let Some(power) = check_pair(&counts) {
        return Ok(make(HandType::Pair, power));
    }
    if let Some(power) = check_triple(cards, &counts) {
        return Ok(make(HandType::Triple, power));
    }
    if let Some(power) = check_triple_double(&counts) {
        return Ok(make(HandType::TripleDouble, power));
    }
    if let Some(power) = check_triple_single(cards, &counts) {
        return Ok(make(HandType::TripleSingle, power));
    }
    if let Some(power) = check_triple_pair(cards, &counts) {
        return Ok(make(HandType::TriplePair, power));
    }
    if let Some(power) = check_four_single(cards, &counts) {
        return Ok(make(HandType::FourSingle, power));
    }
    if let Some(power) = check_four_two(cards, &counts) {
        return Ok(make(HandType::FourTwo, power));
    }
    if let Some(power) = check_four_two_pair(&counts) {
        return Ok(make(HandType::FourTwoPair, power));
    }
    if let Some(power) = check_straight(cards, &counts) {
        return Ok(make(HandType::Straight, power));
    }
    if let Some(power) = check_straight_pair(cards, &counts) {
        return Ok(make(HandType::StraightPair, power));
    }
    if let Some(power) = check_airplane(cards, &counts) {
        return Ok(make(HandType::Airplane, power));
    }
    if let Some(power) = check_airplane_with_pair(cards, &counts) {
        return Ok(make(HandType::AirplaneWithPair, power));
    }
    if let Some(power) = check_bomb(cards, &counts) {
        return Ok(make(HandType::Bomb, power));
    }
    if let Some(power) = check_rocket(cards) {
        return Ok(make(HandType::Rocket, power));
    }

    Err(LandlordError::InvalidHand(format!(
        "no matching hand shape for {} card(s)",
        cards.len()
    )))
}

fn check_single(cards: &[Card], _counts: &Counts) -> Option<u32> {
    (cards.len() == 1).then(|| cards[0].power())
}

fn check_pair(counts: &Counts) -> Option<u32> {
    let pairs = counts.ranks_with_count(2);
    (counts.group_count() == 1 && pairs.len() == 1).then(|| pairs[0].power())
}

fn check_triple(cards: &[Card], counts: &Counts) -> Option<u32> {
    let triples = counts.ranks_with_count(3);
    (cards.len() == 3 && counts.group_count() == 1 && triples.len() == 1)
        .then(|| triples[0].power())
}

fn check_triple_double(counts: &Counts) -> Option<u32> {
    let triples = counts.ranks_with_count(3);
    (counts.group_count() == 1 && triples.len() == 2).then(|| triples[0].power())
}

fn check_triple_single(cards: &[Card], counts: &Counts) -> Option<u32> {
    let triples = counts.ranks_with_count(3);
    let singles = counts.ranks_with_count(1);
    (cards.len() == 4 && counts.group_count() == 2 && triples.len() == 1 && singles.len() == 1)
        .then(|| triples[0].power())
}

fn check_triple_pair(cards: &[Card], counts: &Counts) -> Option<u32> {
    let triples = counts.ranks_with_count(3);
    let pairs = counts.ranks_with_count(2);
    (cards.len() == 5 && counts.group_count() == 2 && triples.len() == 1 && pairs.len() == 1)
        .then(|| triples[0].power())
}

fn check_four_single(cards: &[Card], counts: &Counts) -> Option<u32> {
    let quads = counts.ranks_with_count(4);
    let singles = counts.ranks_with_count(1);
    (cards.len() == 5 && counts.group_count() == 2 && quads.len() == 1 && singles.len() == 1)
        .then(|| quads[0].power())
}

fn check_four_two(cards: &[Card], counts: &Counts) -> Option<u32> {
    let quads = counts.ranks_with_count(4);
    (quads.len() == 1 && cards.len() >= 4 && cards.len() - 4 == 2).then(|| quads[0].power())
}

fn check_four_two_pair(counts: &Counts) -> Option<u32> {
    let quads = counts.ranks_with_count(4);
    let pairs = counts.ranks_with_count(2);
    (counts.group_count() == 2 && quads.len() == 1 && pairs.len() == 2).then(|| quads[0].power())
}

fn check_straight(cards: &[Card], counts: &Counts) -> Option<u32> {
    let singles = counts.ranks_with_count(1);
    (counts.group_count() == 1 && singles.len() >= 5 && is_consecutive(singles))
        .then(|| singles[0].power())
}

fn check_straight_pair(cards: &[Card], counts: &Counts) -> Option<u32> {
    let pairs = counts.ranks_with_count(2);
    (counts.group_count() == 1 && pairs.len() >= 3 && is_consecutive(pairs))
        .then(|| pairs[0].power())
}

fn check_airplane(cards: &[Card], counts: &Counts) -> Option<u32> {
    let triples = counts.ranks_with_count(3);
    if triples.len() >= 2
        && triples.len() == cards.len() - triples.len() * 3
        && is_consecutive(triples)
    {
        return Some(triples[0].power());
    }

    // Surplus-triple special case: N-1 triples form the consecutive
    // engine, and the Nth triple's 3 cards serve as attachments (one per
    // engine triple) instead of a genuine single for each. When both the
    // high slice (drop the lowest triple) and the low slice (drop the
    // highest) are consecutive, the high slice wins — matches the
    // original classifier's fixed try-high-then-low order.
    if triples.len() >= 3 && triples.len() - 1 == cards.len() - triples.len() * 3 + 3 {
        let engine_high = &triples[1..];
        if is_consecutive(engine_high) {
            return Some(engine_high[0].power());
        }
        let engine_low = &triples[..triples.len() - 1];
        if is_consecutive(engine_low) {
            return Some(engine_low[0].power());
        }
    }

    None
}

fn check_airplane_with_pair(cards: &[Card], counts: &Counts) -> Option<u32> {
    let triples = counts.ranks_with_count(3);
    let pairs = counts.ranks_with_count(2);

    if counts.group_count() == 2
        && triples.len() >= 2
        && pairs.len() == triples.len()
        && is_consecutive(triples)
    {
        return Some(triples[0].power());
    }

    // Surplus-quad special case: a fourth-of-a-kind stands in for two of
    // the carried pairs, so no lone singles may appear anywhere.
    let singles = counts.ranks_with_count(1);
    if singles.is_empty()
        && triples.len() >= 2
        && (cards.len() - triples.len() * 3) % 2 == 0
        && (cards.len() - triples.len() * 3) / 2 == triples.len()
        && is_consecutive(triples)
    {
        return Some(triples[0].power());
    }

    None
}

fn check_bomb(cards: &[Card], counts: &Counts) -> Option<u32> {
    let quads = counts.ranks_with_count(4);
    (cards.len() == 4 && counts.group_count() == 1 && quads.len() == 1).then(|| quads[0].power())
}

fn check_rocket(cards: &[Card]) -> Option<u32> {
    (cards.len() == 2
        && cards.iter().any(|c| c.rank == Rank::SmallJoker)
        && cards.iter().any(|c| c.rank == Rank::BigJoker))
    .then_some(Rank::BigJoker.power())
}

/// True if the given ranks, once sorted, form a run of consecutive
/// powers. `Two` and the jokers can never satisfy this: their powers
/// (20, 99, 100) leave a gap after `Ace` (14) that no ordinary rank fills.
fn is_consecutive(ranks: &[Rank]) -> bool {
    if ranks.len() <= 1 {
        return true;
    }
    let mut sorted = ranks.to_vec();
    sorted.sort();
    sorted
        .windows(2)
        .all(|pair| pair[1].power() == pair[0].power() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Rank, Suit};

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn single() {
        let hand = classify(&[c(Suit::Hearts, Rank::Three)]).unwrap();
        assert_eq!(hand.hand_type, HandType::Single);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn pair() {
        let hand = classify(&[c(Suit::Hearts, Rank::Three), c(Suit::Spades, Rank::Three)]).unwrap();
        assert_eq!(hand.hand_type, HandType::Pair);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn airplane_no_attachment() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Spades, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Four),
            c(Suit::Clubs, Rank::Four),
        ])
        .unwrap();
        // Two bare consecutive triples: TripleDouble takes precedence over Airplane.
        assert_eq!(hand.hand_type, HandType::TripleDouble);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn airplane_with_singles() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Spades, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Four),
            c(Suit::Diamonds, Rank::Four),
            c(Suit::Hearts, Rank::Five),
            c(Suit::Spades, Rank::Five),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::Airplane);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn airplane_with_pair() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Spades, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Four),
            c(Suit::Diamonds, Rank::Four),
            c(Suit::Hearts, Rank::Five),
            c(Suit::Spades, Rank::Five),
            c(Suit::Diamonds, Rank::Six),
            c(Suit::Spades, Rank::Six),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::AirplaneWithPair);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn airplane_surplus_triple_drops_lowest() {
        // 3,4,5,6,7 triples with one single of 8: 15 triple-cards + 1 single = 16 cards.
        // Both {4,5,6,7} and {3,4,5,6} are consecutive engines; the high one wins.
        let mut cards = Vec::new();
        for rank in [Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven] {
            cards.push(c(Suit::Hearts, rank));
            cards.push(c(Suit::Diamonds, rank));
            cards.push(c(Suit::Spades, rank));
        }
        cards.push(c(Suit::Hearts, Rank::Eight));
        let hand = classify(&cards).unwrap();
        assert_eq!(hand.hand_type, HandType::Airplane);
        assert_eq!(hand.power, 4);
    }

    #[test]
    fn airplane_four_triples_no_extra_still_picks_high_engine() {
        // 3,4,5,6 as four bare triples (12 cards): the normal branch needs
        // triples.len() == extra (4 == 0, false), so this falls into the
        // surplus branch with one triple's worth of "extra" being zero —
        // the original source's test() asserts power 4 here too.
        let mut cards = Vec::new();
        for rank in [Rank::Three, Rank::Four, Rank::Five, Rank::Six] {
            cards.push(c(Suit::Hearts, rank));
            cards.push(c(Suit::Diamonds, rank));
            cards.push(c(Suit::Spades, rank));
        }
        let hand = classify(&cards).unwrap();
        assert_eq!(hand.hand_type, HandType::Airplane);
        assert_eq!(hand.power, 4);
    }

    #[test]
    fn airplane_extra_cards_can_be_pairs_not_just_singles() {
        // 3,4,5,6 triples (12 cards) plus pairs of 7 and 8 (4 cards) = 16 cards.
        // Airplane's extra-card count check doesn't care about the shape of
        // the leftover cards, only that their count matches triples.len();
        // it wins over AirplaneWithPair because it's tried first.
        let mut cards = Vec::new();
        for rank in [Rank::Three, Rank::Four, Rank::Five, Rank::Six] {
            cards.push(c(Suit::Hearts, rank));
            cards.push(c(Suit::Diamonds, rank));
            cards.push(c(Suit::Spades, rank));
        }
        cards.push(c(Suit::Hearts, Rank::Seven));
        cards.push(c(Suit::Diamonds, Rank::Seven));
        cards.push(c(Suit::Hearts, Rank::Eight));
        cards.push(c(Suit::Diamonds, Rank::Eight));
        let hand = classify(&cards).unwrap();
        assert_eq!(hand.hand_type, HandType::Airplane);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn airplane_with_pair_quads_count_as_two_pairs_each() {
        // 3,4,5,6 triples (12 cards) plus quads of 7 and 8 (8 cards) = 20 cards.
        // Each quad stands in for two of the carried pairs a four-triple
        // airplane needs, with no lone singles anywhere.
        let mut cards = Vec::new();
        for rank in [Rank::Three, Rank::Four, Rank::Five, Rank::Six] {
            cards.push(c(Suit::Hearts, rank));
            cards.push(c(Suit::Diamonds, rank));
            cards.push(c(Suit::Spades, rank));
        }
        for rank in [Rank::Seven, Rank::Eight] {
            cards.push(c(Suit::Hearts, rank));
            cards.push(c(Suit::Diamonds, rank));
            cards.push(c(Suit::Spades, rank));
            cards.push(c(Suit::Clubs, rank));
        }
        let hand = classify(&cards).unwrap();
        assert_eq!(hand.hand_type, HandType::AirplaneWithPair);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn bomb() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Clubs, Rank::Three),
            c(Suit::Spades, Rank::Three),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::Bomb);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn rocket() {
        let hand = classify(&[
            Card::joker(Rank::BigJoker),
            Card::joker(Rank::SmallJoker),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::Rocket);
        assert_eq!(hand.power, 100);
    }

    #[test]
    fn invalid_mixed_pair_and_extra_single() {
        // ♥3 ♥4 ♥5 ♥5 ♠3 ♠3 - not a valid StraightPair (5 has only 2 copies here
        // but 3 has three copies, breaking the "all pairs" shape).
        let cards = [
            c(Suit::Hearts, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Five),
            c(Suit::Hearts, Rank::Five),
            c(Suit::Spades, Rank::Three),
            c(Suit::Spades, Rank::Three),
        ];
        assert!(classify(&cards).is_err());
    }

    #[test]
    fn four_two_accepts_any_two_kickers() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Clubs, Rank::Three),
            c(Suit::Spades, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Five),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::FourTwo);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn four_two_with_pair_kicker() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Clubs, Rank::Three),
            c(Suit::Spades, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Four),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::FourTwo);
    }

    #[test]
    fn four_two_pair() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Clubs, Rank::Three),
            c(Suit::Spades, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Four),
            c(Suit::Diamonds, Rank::Five),
            c(Suit::Spades, Rank::Five),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::FourTwoPair);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn straight() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Hearts, Rank::Four),
            c(Suit::Spades, Rank::Five),
            c(Suit::Spades, Rank::Six),
            c(Suit::Spades, Rank::Seven),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::Straight);
        assert_eq!(hand.power, 3);
    }

    #[test]
    fn straight_cannot_include_two_or_jokers() {
        let cards = [
            c(Suit::Hearts, Rank::Jack),
            c(Suit::Hearts, Rank::Queen),
            c(Suit::Spades, Rank::King),
            c(Suit::Spades, Rank::Ace),
            c(Suit::Spades, Rank::Two),
        ];
        assert!(classify(&cards).is_err());
    }

    #[test]
    fn rocket_kicker_on_triple_single_is_legal() {
        let hand = classify(&[
            c(Suit::Hearts, Rank::Three),
            c(Suit::Diamonds, Rank::Three),
            c(Suit::Spades, Rank::Three),
            Card::joker(Rank::BigJoker),
        ])
        .unwrap();
        assert_eq!(hand.hand_type, HandType::TripleSingle);
        assert_eq!(hand.power, 3);
    }
}
