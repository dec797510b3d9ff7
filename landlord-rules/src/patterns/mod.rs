//! Hand classification and the types it produces.
//!
//! This module contains:
//! - Hand types and the classified play value ([`HandType`], [`Hand`])
//! - The classifier itself ([`classify`])

mod pattern;
mod recognizer;

pub use pattern::{Hand, HandType};
pub use recognizer::classify;
