//! # Landlord Server
//!
//! The networked core of a three-seat Dou Dizhu table: TCP intake, room
//! routing by name, and the per-room actor that drives bidding and the
//! turn loop over [`landlord_rules`].
//!
//! ## Module structure
//!
//! - [`error`]: the four error categories a room can hit (spec.md §7)
//! - [`protocol`]: wire frames and the client command grammar (spec.md §6)
//! - [`session`]: per-connection writer/heartbeat/reader tasks (spec.md §4.4)
//! - [`game`]: the pure bidding/turn-loop state machine (spec.md §4.5)
//! - [`room`]: the room actor and the process-wide room registry
//! - [`listener`]: the TCP accept loop and intake handshake (spec.md §6)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod game;
pub mod listener;
pub mod protocol;
pub mod room;
pub mod session;

pub use error::{Result, ServerError};
pub use room::RoomRegistry;

/// The port the listener binds, per spec.md §6.
pub const DEFAULT_PORT: u16 = 9999;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
