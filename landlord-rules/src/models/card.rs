//! Card-related data structures.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Card suit, ordered `♥ < ◆ < ♣ < ♠` as the comparator's tie-break rule requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Suit {
    /// Hearts (红桃) - lowest suit
    Hearts = 1,
    /// Diamonds (方块)
    Diamonds = 2,
    /// Clubs (梅花)
    Clubs = 3,
    /// Spades (黑桃) - highest suit
    Spades = 4,
}

impl Suit {
    /// All four suits, in ascending tie-break order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Returns the single-character glyph used on the wire and in display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Hearts => "♥",
            Self::Diamonds => "◆",
            Self::Clubs => "♣",
            Self::Spades => "♠",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Card rank. The numeric discriminant IS the comparison power, matching
/// the wire protocol's `POWERS` table: 3..14 for `3`..`A`, 20 for `2`, and
/// the two jokers above everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Rank {
    /// Three - lowest rank
    Three = 3,
    /// Four
    Four = 4,
    /// Five
    Five = 5,
    /// Six
    Six = 6,
    /// Seven
    Seven = 7,
    /// Eight
    Eight = 8,
    /// Nine
    Nine = 9,
    /// Ten
    Ten = 10,
    /// Jack
    Jack = 11,
    /// Queen
    Queen = 12,
    /// King
    King = 13,
    /// Ace
    Ace = 14,
    /// Two - outranks everything but the jokers
    Two = 20,
    /// 小王 - small joker
    SmallJoker = 99,
    /// 大王 - big joker, the highest card in the deck
    BigJoker = 100,
}

impl Rank {
    /// The 13 ordinary ranks dealt four-per-suit, in ascending order.
    pub const ORDINARY: [Rank; 13] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Two,
    ];

    /// Returns the comparison power of this rank (equal to its discriminant).
    #[must_use]
    pub const fn power(self) -> u32 {
        self as u32
    }

    /// True for the two jokers, which carry no suit and never form runs.
    #[must_use]
    pub const fn is_joker(self) -> bool {
        matches!(self, Self::SmallJoker | Self::BigJoker)
    }

    /// True for ranks that may appear in a Straight or StraightPair run —
    /// excludes `2` and both jokers per spec.
    #[must_use]
    pub const fn is_sequenceable(self) -> bool {
        !self.is_joker() && self.power() != Self::Two.power()
    }

    fn wire_str(self) -> &'static str {
        match self {
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
            Self::Two => "2",
            Self::SmallJoker => "小王",
            Self::BigJoker => "大王",
        }
    }

    /// Parses the rank portion of a card token (everything after the suit
    /// glyph, or the whole token for jokers).
    pub fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "3" => Self::Three,
            "4" => Self::Four,
            "5" => Self::Five,
            "6" => Self::Six,
            "7" => Self::Seven,
            "8" => Self::Eight,
            "9" => Self::Nine,
            "10" => Self::Ten,
            "J" => Self::Jack,
            "Q" => Self::Queen,
            "K" => Self::King,
            "A" => Self::Ace,
            "2" => Self::Two,
            "小王" => Self::SmallJoker,
            "大王" => Self::BigJoker,
            _ => return None,
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_str())
    }
}

/// A playing card: an ordinary `(suit, rank)` pair, or a suitless joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Card {
    /// The card's rank.
    pub rank: Rank,
    /// The card's suit, `None` for the two jokers.
    pub suit: Option<Suit>,
}

impl Card {
    /// Creates an ordinary suited card.
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            rank,
            suit: Some(suit),
        }
    }

    /// Creates a joker card. `rank` must be `SmallJoker` or `BigJoker`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is not a joker rank.
    #[must_use]
    pub const fn joker(rank: Rank) -> Self {
        assert!(rank.is_joker());
        Self { rank, suit: None }
    }

    /// Returns this card's comparison power.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.rank.power()
    }

    /// Returns the wire name: `suit ++ rank`, or the bare joker word.
    #[must_use]
    pub fn name(&self) -> String {
        match self.suit {
            Some(suit) => format!("{suit}{}", self.rank),
            None => self.rank.to_string(),
        }
    }

    /// Parses a single card token: `<suit><rank>` for ordinary cards, or
    /// the bare joker word `小王`/`大王`.
    pub fn parse(token: &str) -> Option<Self> {
        for suit in Suit::ALL {
            if let Some(rest) = token.strip_prefix(suit.symbol()) {
                return Rank::parse(rest).map(|rank| Self::new(suit, rank));
            }
        }
        let rank = Rank::parse(token)?;
        rank.is_joker().then(|| Self::joker(rank))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank).then(self.suit.cmp(&other.suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Number of seats a round is dealt to.
pub const SEAT_COUNT: usize = 3;
/// Cards dealt to each seat before the kitty is set aside.
pub const HAND_SIZE: usize = 17;
/// Cards left over after dealing, given to the landlord.
pub const KITTY_SIZE: usize = 3;

/// A 54-card deck: the standard 52 plus both jokers.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a fresh, unshuffled 54-card deck.
    #[must_use]
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(54);
        for suit in Suit::ALL {
            for rank in Rank::ORDINARY {
                cards.push(Card::new(suit, rank));
            }
        }
        cards.push(Card::joker(Rank::SmallJoker));
        cards.push(Card::joker(Rank::BigJoker));
        Self { cards }
    }

    /// Shuffles the deck uniformly at random.
    pub fn shuffle(&mut self) {
        use rand::seq::SliceRandom;
        use rand::thread_rng;

        self.cards.shuffle(&mut thread_rng());
    }

    /// Deals `HAND_SIZE` cards to each of `SEAT_COUNT` seats, round-robin
    /// starting from seat 0, draining the deck as it goes.
    ///
    /// # Panics
    ///
    /// Panics if the deck does not hold enough cards (54, fresh and
    /// unshuffled or not).
    #[must_use]
    pub fn deal_hands(&mut self) -> [Vec<Card>; SEAT_COUNT] {
        assert!(
            self.cards.len() >= SEAT_COUNT * HAND_SIZE,
            "deck underflow: {} cards remaining",
            self.cards.len()
        );

        let mut hands: [Vec<Card>; SEAT_COUNT] = Default::default();
        for hand in &mut hands {
            hand.reserve(HAND_SIZE);
        }
        for _ in 0..HAND_SIZE {
            for hand in &mut hands {
                hand.push(self.cards.pop().expect("checked above"));
            }
        }
        for hand in &mut hands {
            hand.sort_by(|a, b| b.cmp(a));
        }
        hands
    }

    /// Returns and empties whatever remains in the deck — the kitty, once
    /// `deal_hands` has run.
    #[must_use]
    pub fn kitty(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// Number of cards remaining in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if the deck has been fully dealt out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
