//! One TCP connection (spec.md §4.4): line-delimited JSON out, plain-text
//! commands in, a 5s heartbeat, and the fan-in back to the owning room.
//!
//! A connection is three cooperating tasks once handed off by the listener:
//! a writer task that owns the socket's write half exclusively (so the
//! heartbeat and the room's broadcasts never interleave a partial frame), a
//! heartbeat task that paces an empty frame onto the writer's queue every
//! 5s, and a reader task that turns each line into a [`RoomCommand`] for the
//! room actor to process.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use crate::protocol::ServerFrame;
use crate::room::RoomCommand;

/// A queued instruction for a session's writer task: either a frame to
/// write, or an explicit order to close the socket right away (used for a
/// rejected joiner, spec.md §7 RoomFull: "close their socket").
enum WriterMsg {
    Frame(String),
    Close,
}

/// Handle used to queue outbound frames for a session's writer task. Cloned
/// freely: the heartbeat task and the room actor both hold a copy.
#[derive(Clone)]
pub struct SessionWriter {
    tx: mpsc::UnboundedSender<WriterMsg>,
}

impl SessionWriter {
    /// Queues a frame for writing. Fails only once the writer task has
    /// exited (socket closed), mirroring the original's `ConnectionError`
    /// catch around `socket.send`.
    pub fn send(&self, frame: ServerFrame) -> Result<(), ()> {
        self.tx.send(WriterMsg::Frame(frame.to_line())).map_err(|_| ())
    }

    /// Orders the writer task to flush its queue, shut down the socket, and
    /// exit — without waiting for every other clone (e.g. a still-running
    /// heartbeat) to be dropped first. Used to actually disconnect a
    /// rejected joiner instead of merely letting a borrowed clone go out of
    /// scope.
    pub fn close(&self) {
        let _ = self.tx.send(WriterMsg::Close);
    }
}

/// Spawns the task that owns `write_half` exclusively and serializes every
/// queued frame onto the socket in arrival order. Exits (and shuts down the
/// socket's write half) once every [`SessionWriter`] clone has been dropped,
/// or as soon as a [`WriterMsg::Close`] is queued, whichever comes first.
pub fn spawn_writer(write_half: OwnedWriteHalf) -> SessionWriter {
    let (tx, mut rx) = mpsc::unbounded_channel::<WriterMsg>();
    tokio::spawn(async move {
        let mut write_half = write_half;
        while let Some(msg) = rx.recv().await {
            match msg {
                WriterMsg::Frame(line) => {
                    if write_half.write_all(line.as_bytes()).await.is_err() {
                        break;
                    }
                }
                WriterMsg::Close => break,
            }
        }
        let _ = write_half.shutdown().await;
    });
    SessionWriter { tx }
}

/// Spawns the per-session heartbeat: an empty state frame every 5s, until
/// the writer's queue is gone (socket closed).
pub fn spawn_heartbeat(writer: SessionWriter, player_name: String) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(5));
        loop {
            ticker.tick().await;
            if writer.send(ServerFrame::heartbeat(player_name.clone())).is_err() {
                break;
            }
        }
    });
}

/// Spawns the reader loop for a seated session: reads one line at a time
/// and forwards it to the room as [`RoomCommand::PlayerLine`]; on EOF or a
/// read error, forwards [`RoomCommand::SeatClosed`] once and exits.
///
/// `reader` is the `BufReader` left over from the listener's intake
/// handshake, so any bytes already buffered past the two handshake lines
/// are not lost.
pub fn spawn_reader(
    mut reader: BufReader<OwnedReadHalf>,
    token: u64,
    room_tx: mpsc::UnboundedSender<RoomCommand>,
) {
    tokio::spawn(async move {
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) => break, // EOF: peer closed the connection
                Ok(_) => {
                    let trimmed = line.trim().to_string();
                    if room_tx.send(RoomCommand::PlayerLine { token, line: trimmed }).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = room_tx.send(RoomCommand::SeatClosed { token });
    });
}
