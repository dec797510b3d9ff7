//! Error types for the landlord-rules library.

use thiserror::Error;

/// Main error type for the landlord-rules library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LandlordError {
    /// The classifier was given a card multiset that matches none of the
    /// 15 legal hand shapes.
    #[error("invalid hand: {0}")]
    InvalidHand(String),

    /// Reserved for future deck-size/rule variants; unused by the
    /// standard 54-card three-seat game.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for the landlord-rules library.
pub type Result<T> = std::result::Result<T, LandlordError>;
