//! Hand types and the classified `Hand` value.

use crate::models::Card;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the 15 legal hand shapes a play can take.
///
/// Unlike card/rank ordering, hand types have no single linear strength
/// order among themselves — see [`crate::compare::beats`] for the actual
/// comparison rules (same-type-same-size, or bomb/rocket overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandType {
    /// 单牌 - one card
    Single,
    /// 对子 - two of the same rank
    Pair,
    /// 三张 - three of the same rank
    Triple,
    /// 三顺 - two distinct triples, nothing else
    TripleDouble,
    /// 三带一 - one triple plus one single
    TripleSingle,
    /// 三带二 - one triple plus one pair
    TriplePair,
    /// 四带一 - one quadruple plus one single
    FourSingle,
    /// 四带二 - one quadruple plus exactly two extra cards
    FourTwo,
    /// 四带两对 - one quadruple plus two distinct pairs
    FourTwoPair,
    /// 顺子 - five or more consecutive singles, no `2`/jokers
    Straight,
    /// 连对 - three or more consecutive pairs, no `2`/jokers
    StraightPair,
    /// 飞机 - two or more consecutive triples, optional single attachments
    Airplane,
    /// 飞机带对子 - two or more consecutive triples with attached pairs
    AirplaneWithPair,
    /// 炸弹 - four of the same rank
    Bomb,
    /// 火箭 - both jokers
    Rocket,
}

impl HandType {
    /// True for the shapes where `beats` additionally requires equal card
    /// count between candidate and reference (spec.md §4.3).
    #[must_use]
    pub const fn is_length_sensitive(self) -> bool {
        matches!(
            self,
            Self::Straight | Self::StraightPair | Self::Airplane | Self::AirplaneWithPair
        )
    }
}

/// A legally classified play: the cards laid down, their recognized
/// [`HandType`], and the comparison power.
///
/// `Hand` only exists for legal card multisets — [`crate::recognizer::classify`]
/// is the sole constructor and returns an error for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hand {
    /// The cards that make up this play, as given (not necessarily sorted).
    pub cards: Vec<Card>,
    /// The recognized shape.
    pub hand_type: HandType,
    /// Comparison power: same-type plays with higher power beat lower ones.
    pub power: u32,
}

impl Hand {
    /// Number of cards in this play.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cards.len()
    }
}
