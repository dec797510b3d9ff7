//! Per-round game state (spec.md §4.5): bidding, landlord selection, and the
//! turn loop's free-play/follow-play rules.
//!
//! This module is the pure state machine — it owns no sockets. The room
//! actor ([`crate::room`]) drives it one event at a time and turns the
//! results into [`crate::protocol::StateUpdate`] broadcasts.

use landlord_rules::{beats, classify, Card, Deck, Hand};

use crate::error::{Result, ServerError};

/// The record of the most recently accepted play (spec.md §3 `LastPlay`).
/// Its absence means the next mover is in free play (invariant I4).
#[derive(Debug, Clone)]
pub struct LastPlay {
    /// Seat index that made this play.
    pub seat: usize,
    /// The classified hand that was laid down.
    pub hand: Hand,
}

/// Outcome of recording one seat's bid.
#[derive(Debug)]
pub enum BidOutcome {
    /// Not a valid `0`..`3` digit; the same seat is re-prompted.
    Invalid,
    /// Bidding continues with the next seat.
    Continue {
        /// The next seat to prompt.
        next: usize,
    },
    /// All three seats bid `0`; the hands are discarded and redealt.
    Redeal,
    /// Bidding is over: `landlord` won it, outright at `3` or by having the
    /// highest bid once all three seats answered.
    LandlordDecided {
        /// The winning seat.
        landlord: usize,
    },
}

/// The bidding phase of a round: deals the hands, then walks seat 0→1→2
/// collecting bids until a landlord is decided or all three pass.
#[derive(Debug)]
pub struct Bidding {
    /// Each seat's dealt hand, sorted descending.
    pub hands: [Vec<Card>; 3],
    /// The kitty, revealed to everyone once a landlord is chosen.
    kitty: Vec<Card>,
    /// Seat currently being prompted.
    pub current: usize,
    /// Highest bid seen so far this pass, and who made it.
    max_bid: u8,
    max_bidder: usize,
    /// Each seat's bid this pass, for the `name:N分` display annotation.
    bids: [Option<u8>; 3],
}

impl Bidding {
    /// Deals a fresh shuffled deck: 17 cards to each seat, 3 held back as
    /// the kitty (spec.md §4.1).
    #[must_use]
    pub fn deal() -> Self {
        let mut deck = Deck::new();
        deck.shuffle();
        let hands = deck.deal_hands();
        let kitty = deck.kitty();
        Self {
            hands,
            kitty,
            current: 0,
            max_bid: 0,
            max_bidder: 0,
            bids: [None; 3],
        }
    }

    /// Each seat's bid this pass, for displaying `"name:N分"` while bidding
    /// is still in progress; `None` for a seat not yet prompted.
    #[must_use]
    pub fn bids(&self) -> &[Option<u8>; 3] {
        &self.bids
    }

    /// Parses and records a bid from `seat`. Only `seat == self.current` may
    /// call this meaningfully; the room actor enforces that upstream.
    pub fn record_bid(&mut self, seat: usize, raw: &str) -> BidOutcome {
        let Ok(bid) = raw.parse::<u8>() else {
            return BidOutcome::Invalid;
        };
        if bid > 3 {
            return BidOutcome::Invalid;
        }
        self.bids[seat] = Some(bid);

        if bid > self.max_bid {
            self.max_bid = bid;
            self.max_bidder = seat;
        }

        if bid == 3 {
            return BidOutcome::LandlordDecided { landlord: self.max_bidder };
        }

        if seat == 2 {
            return if self.max_bid == 0 {
                BidOutcome::Redeal
            } else {
                BidOutcome::LandlordDecided { landlord: self.max_bidder }
            };
        }

        self.current = seat + 1;
        BidOutcome::Continue { next: self.current }
    }

    /// Consumes the bidding phase, handing the kitty to the winning seat and
    /// returning the now-public kitty cards for broadcast.
    #[must_use]
    pub fn into_kitty(self) -> Vec<Card> {
        self.kitty
    }
}

/// Outcome of one accepted or rejected turn.
#[derive(Debug)]
pub enum PlayOutcome {
    /// `seat` passed during follow-play; turn advances, no cards changed.
    Passed,
    /// `seat` played `hand`; `won` is true if their hand is now empty.
    Played { hand: Hand, won: bool },
}

/// The turn-loop phase of a round, once a landlord has been decided.
#[derive(Debug)]
pub struct Round {
    /// Each seat's current hand, sorted descending.
    pub hands: [Vec<Card>; 3],
    /// The landlord's seat index.
    pub landlord: usize,
    /// Seat whose turn it is.
    pub current: usize,
    /// The table's last accepted play, or `None` in free play.
    pub last_play: Option<LastPlay>,
    /// Whether the current seat is playing free (no reference to follow).
    pub is_free: bool,
}

impl Round {
    /// Starts the turn loop at the landlord's seat.
    #[must_use]
    pub fn new(hands: [Vec<Card>; 3], landlord: usize) -> Self {
        Self {
            hands,
            landlord,
            current: landlord,
            last_play: None,
            is_free: true,
        }
    }

    /// Call at the start of every turn: if the table has come back around to
    /// the last player who played (or nobody has played yet), this turn is
    /// free play and any prior last-play record is cleared (spec.md §4.5
    /// step 2, invariant I4).
    pub fn begin_turn(&mut self) {
        self.is_free = match &self.last_play {
            Some(last) => last.seat == self.current,
            None => true,
        };
        if self.is_free {
            self.last_play = None;
        }
    }

    /// Card counts for every seat, for the `card_count_list` broadcast.
    #[must_use]
    pub fn card_counts(&self) -> Vec<usize> {
        self.hands.iter().map(Vec::len).collect()
    }

    /// Processes `cards` as the current seat's play: verifies the seat
    /// actually holds them, classifies the shape, and — unless this is free
    /// play — checks it beats [`Self::last_play`].
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PlayerInput`] for any rule violation; the
    /// current seat does not advance and should be re-prompted.
    pub fn apply_play(&mut self, seat: usize, cards: Vec<Card>) -> Result<PlayOutcome> {
        let hand = classify(&cards).map_err(|e| ServerError::PlayerInput(e.to_string()))?;

        if !self.is_free {
            let reference = self
                .last_play
                .as_ref()
                .ok_or_else(|| ServerError::Fatal("follow-play with no last play on record".into()))?;
            if !beats(&hand, &reference.hand, false) {
                return Err(ServerError::PlayerInput("play does not beat the table".into()));
            }
        }

        remove_cards(&mut self.hands[seat], &cards)?;

        let won = self.hands[seat].is_empty();
        self.last_play = Some(LastPlay { seat, hand: hand.clone() });
        Ok(PlayOutcome::Played { hand, won })
    }

    /// Advances `current` to the next seat, round-robin.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.hands.len();
    }
}

/// Removes `played` from `hand` (a seat's held cards), failing if the seat
/// doesn't actually hold every card named.
fn remove_cards(hand: &mut Vec<Card>, played: &[Card]) -> Result<()> {
    let mut remaining = hand.clone();
    for card in played {
        let Some(pos) = remaining.iter().position(|c| c == card) else {
            return Err(ServerError::PlayerInput(format!(
                "you don't have enough of {}",
                card.name()
            )));
        };
        remaining.remove(pos);
    }
    *hand = remaining;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landlord_rules::{Rank, Suit};

    fn empty_hands() -> [Vec<Card>; 3] {
        Default::default()
    }

    #[test]
    fn bidding_all_zero_triggers_redeal() {
        let mut bidding = Bidding::deal();
        assert!(matches!(bidding.record_bid(0, "0"), BidOutcome::Continue { next: 1 }));
        assert!(matches!(bidding.record_bid(1, "0"), BidOutcome::Continue { next: 2 }));
        assert!(matches!(bidding.record_bid(2, "0"), BidOutcome::Redeal));
    }

    #[test]
    fn bidding_three_ends_immediately() {
        let mut bidding = Bidding::deal();
        assert!(matches!(bidding.record_bid(0, "1"), BidOutcome::Continue { next: 1 }));
        match bidding.record_bid(1, "3") {
            BidOutcome::LandlordDecided { landlord } => assert_eq!(landlord, 1),
            other => panic!("expected LandlordDecided, got {other:?}"),
        }
    }

    #[test]
    fn bidding_highest_of_three_wins() {
        let mut bidding = Bidding::deal();
        bidding.record_bid(0, "1");
        bidding.record_bid(1, "2");
        match bidding.record_bid(2, "1") {
            BidOutcome::LandlordDecided { landlord } => assert_eq!(landlord, 1),
            other => panic!("expected LandlordDecided, got {other:?}"),
        }
    }

    #[test]
    fn bidding_rejects_non_numeric_and_out_of_range() {
        let mut bidding = Bidding::deal();
        assert!(matches!(bidding.record_bid(0, "abc"), BidOutcome::Invalid));
        assert!(matches!(bidding.record_bid(0, "4"), BidOutcome::Invalid));
    }

    #[test]
    fn round_begin_turn_clears_last_play_on_return_to_sender() {
        let mut hands = empty_hands();
        hands[0] = vec![Card::new(Suit::Hearts, Rank::Three)];
        hands[1] = vec![Card::new(Suit::Hearts, Rank::Four)];
        let mut round = Round::new(hands, 0);
        round.begin_turn();
        assert!(round.is_free);

        round.apply_play(0, vec![Card::new(Suit::Hearts, Rank::Three)]).unwrap();
        round.advance();
        round.begin_turn();
        assert!(!round.is_free);

        round.advance();
        round.advance();
        round.begin_turn();
        assert!(round.is_free);
        assert!(round.last_play.is_none());
    }

    #[test]
    fn round_rejects_play_the_seat_does_not_hold() {
        let mut hands = empty_hands();
        hands[0] = vec![Card::new(Suit::Hearts, Rank::Three)];
        let mut round = Round::new(hands, 0);
        round.begin_turn();
        let err = round
            .apply_play(0, vec![Card::new(Suit::Spades, Rank::King)])
            .unwrap_err();
        assert!(matches!(err, ServerError::PlayerInput(_)));
    }

    #[test]
    fn round_follow_play_must_beat_reference() {
        let mut hands = empty_hands();
        hands[0] = vec![Card::new(Suit::Hearts, Rank::Three)];
        hands[1] = vec![Card::new(Suit::Spades, Rank::Three)];
        let mut round = Round::new(hands, 0);
        round.begin_turn();
        round.apply_play(0, vec![Card::new(Suit::Hearts, Rank::Three)]).unwrap();
        round.advance();
        round.begin_turn();
        assert!(!round.is_free);
        let err = round
            .apply_play(1, vec![Card::new(Suit::Spades, Rank::Three)])
            .unwrap_err();
        assert!(matches!(err, ServerError::PlayerInput(_)));
    }

    #[test]
    fn round_detects_win_on_empty_hand() {
        let mut hands = empty_hands();
        hands[0] = vec![Card::new(Suit::Hearts, Rank::Three)];
        let mut round = Round::new(hands, 0);
        round.begin_turn();
        match round.apply_play(0, vec![Card::new(Suit::Hearts, Rank::Three)]).unwrap() {
            PlayOutcome::Played { won, .. } => assert!(won),
            PlayOutcome::Passed => panic!("expected Played"),
        }
    }
}
