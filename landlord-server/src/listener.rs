//! The TCP accept loop and intake handshake (spec.md §6, §7 RoomFull).

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::room::{JoinOutcome, RoomCommand, RoomRegistry};
use crate::session::{spawn_heartbeat, spawn_reader, spawn_writer};

/// Binds `addr` and accepts connections forever, spawning one task per
/// connection to run the intake handshake and route into a room.
///
/// # Errors
///
/// Returns an error only if the bind itself fails (spec.md §6 exit codes:
/// "non-zero on bind failure").
pub async fn serve(addr: impl ToSocketAddrs) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener).await
}

/// Accepts connections on an already-bound listener. Split out from
/// [`serve`] so tests can bind an ephemeral port (`127.0.0.1:0`) and learn
/// its address before handing the listener off.
pub async fn serve_on(listener: TcpListener) -> std::io::Result<()> {
    let registry = RoomRegistry::new();
    tracing::info!("listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, registry).await {
                tracing::warn!(%peer, %err, "connection intake failed");
            }
        });
    }
}

/// Reads the two-line `room_name\nplayer_name` handshake, spawns the
/// session's writer/heartbeat, and hands the connection to its room.
///
/// The original reads a fixed 20 bytes, which can truncate a multi-byte
/// name near the 10-char limit (spec.md §9 REDESIGN (a)); this reads two
/// full lines instead, however long, and never drops whatever the client
/// sent after them — those bytes stay buffered for the session's reader.
async fn handle_connection(stream: TcpStream, registry: RoomRegistry) -> std::io::Result<()> {
    stream.set_nodelay(true).ok();
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut room_name = String::new();
    reader.read_line(&mut room_name).await?;
    let mut player_name = String::new();
    reader.read_line(&mut player_name).await?;
    let room_name = room_name.trim().to_string();
    let player_name = player_name.trim().to_string();

    let writer = spawn_writer(write_half);
    spawn_heartbeat(writer.clone(), player_name.clone());

    let room_tx = registry.get_or_create(&room_name).await;
    let (ack_tx, ack_rx) = tokio::sync::oneshot::channel();
    if room_tx
        .send(RoomCommand::Join {
            player_name,
            writer,
            ack: ack_tx,
        })
        .is_err()
    {
        return Ok(()); // room actor is gone; the socket closes as the task ends
    }

    match ack_rx.await {
        Ok(JoinOutcome::Seated { token }) => {
            spawn_reader(reader, token, room_tx);
        }
        // The room already closed the writer half (see `JoinOutcome::Rejected`);
        // dropping `reader` here drops the read half, so the socket fully closes.
        Ok(JoinOutcome::Rejected) | Err(_) => {}
    }
    Ok(())
}
