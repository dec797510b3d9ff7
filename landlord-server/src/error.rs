//! Error categories for the room/session layer (spec.md §7).

use thiserror::Error;

/// The four error categories the room actor distinguishes when handling a
/// player command or a connection fault.
#[derive(Error, Debug)]
pub enum ServerError {
    /// A single player's command was malformed or illegal: wrong bid range,
    /// unparseable hand, a play that doesn't beat the table, `pass` during
    /// free play. Reported to the offending seat only; the room keeps running.
    #[error("player input error: {0}")]
    PlayerInput(String),

    /// A fourth join attempt on an already-seated room.
    #[error("room is full")]
    RoomFull,

    /// A send/recv failed on a session's socket. The seat is dropped and the
    /// current round ends for the survivors.
    #[error("socket error: {0}")]
    Socket(#[from] std::io::Error),

    /// An invariant the room cannot recover from (deck underflow, an
    /// unreachable classifier branch). Logged; terminates the room's round.
    #[error("fatal room error: {0}")]
    Fatal(String),
}

/// Result type alias used throughout the server crate.
pub type Result<T> = std::result::Result<T, ServerError>;
