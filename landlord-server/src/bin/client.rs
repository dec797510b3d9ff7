//! A minimal terminal client for manual/integration testing of the wire
//! protocol (spec.md §6). Optional positional arg: `host` (default
//! `127.0.0.1`). Prompts for room name and player name on stdin, then prints
//! every server frame it receives while forwarding each stdin line as a
//! command.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use landlord_server::DEFAULT_PORT;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let host = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{host}:{DEFAULT_PORT}");

    let mut room_name = String::new();
    let mut player_name = String::new();
    print!("room name: ");
    std::io::stdout().flush().ok();
    std::io::stdin().read_line(&mut room_name)?;
    print!("player name: ");
    std::io::stdout().flush().ok();
    std::io::stdin().read_line(&mut player_name)?;

    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    write_half
        .write_all(format!("{}\n{}\n", room_name.trim(), player_name.trim()).as_bytes())
        .await?;

    let mut server_lines = BufReader::new(read_half).lines();
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = server_lines.next_line() => {
                match line? {
                    Some(line) => println!("{line}"),
                    None => {
                        println!("server closed the connection");
                        break;
                    }
                }
            }
            line = stdin_lines.next_line() => {
                match line? {
                    Some(line) => {
                        write_half.write_all(line.as_bytes()).await?;
                        write_half.write_all(b"\n").await?;
                    }
                    None => break,
                }
            }
        }
    }
    Ok(())
}
