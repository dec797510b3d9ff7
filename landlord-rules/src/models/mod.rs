//! Core data models for the landlord game.
//!
//! This module contains the fundamental data structures:
//! - [`Card`]: A playing card with suit and rank
//! - [`Rank`]: Card rank (Three through Two, plus the two jokers)
//! - [`Suit`]: Card suit (Diamonds through Spades)
//! - [`Deck`]: The 54-card deck, its shuffle and deal

pub mod card;

pub use card::{Card, Rank, Suit, Deck, SEAT_COUNT, HAND_SIZE, KITTY_SIZE};
