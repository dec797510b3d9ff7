//! The room actor (spec.md §4.5, §5): one `tokio::spawn`ed task per room,
//! holding all three seats exclusively and processing one event at a time
//! — the "serial actor" the concurrency model requires (invariant I3).
//!
//! Each seated connection's reader task forwards every line it reads as a
//! [`RoomCommand::PlayerLine`]; the room only *acts* on a line when it came
//! from the seat currently expected to speak (the bidder on turn, or the
//! mover in the turn loop), so out-of-turn chatter from a seat's always-on
//! reader loop is silently ignored rather than queued. This is the one
//! deliberate adaptation from the original's "block on the active player's
//! socket" model to an event-driven actor: every seat's socket is read
//! continuously, not just the one whose turn it is, but only the expected
//! seat's lines are ever interpreted as commands.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::{sleep, Duration};

use landlord_rules::Card;

use crate::game::{BidOutcome, Bidding, PlayOutcome, Round};
use crate::protocol::{is_pass, parse_play_tokens, PlayState, ServerFrame, StateUpdate};
use crate::session::SessionWriter;

/// Commands the room actor processes, one at a time, in arrival order.
pub enum RoomCommand {
    /// A new connection wants a seat.
    Join {
        /// Display name the client supplied at intake.
        player_name: String,
        /// The new session's writer handle, already live (heartbeat running).
        writer: SessionWriter,
        /// Resolves to the assigned seat token, or rejection.
        ack: oneshot::Sender<JoinOutcome>,
    },
    /// One line read from a seated connection.
    PlayerLine {
        /// The seat's stable token (seat *indices* shift as others leave).
        token: u64,
        /// The trimmed line.
        line: String,
    },
    /// A seated connection's reader hit EOF or an I/O error.
    SeatClosed {
        /// The seat's stable token.
        token: u64,
    },
}

/// Result of a [`RoomCommand::Join`].
pub enum JoinOutcome {
    /// Seated; the listener should start forwarding this token's lines.
    Seated {
        /// The stable token to tag this connection's `PlayerLine`s with.
        token: u64,
    },
    /// The room already has three seats. The room itself has already sent
    /// the `code=1` popup and closed the writer; the listener just needs to
    /// let its own (read-half) handle drop so the socket fully closes.
    Rejected,
}

struct Seat {
    token: u64,
    name: String,
    writer: SessionWriter,
}

/// What the room is doing right now.
enum Phase {
    WaitingForPlayers,
    Bidding(Bidding),
    Playing(Round),
}

struct Room {
    name: String,
    seats: Vec<Seat>,
    phase: Phase,
    next_token: u64,
}

/// Spawns a room's actor task and returns the command channel to reach it.
#[must_use]
pub fn spawn_room(name: String) -> mpsc::UnboundedSender<RoomCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_room(name, rx));
    tx
}

async fn run_room(name: String, mut rx: mpsc::UnboundedReceiver<RoomCommand>) {
    let mut room = Room {
        name,
        seats: Vec::with_capacity(3),
        phase: Phase::WaitingForPlayers,
        next_token: 0,
    };

    while let Some(cmd) = rx.recv().await {
        match cmd {
            RoomCommand::Join { player_name, writer, ack } => room.handle_join(player_name, writer, ack),
            RoomCommand::PlayerLine { token, line } => room.handle_line(token, &line).await,
            RoomCommand::SeatClosed { token } => room.handle_close(token),
        }
    }
    tracing::info!(room = %room.name, "room actor shutting down, channel closed");
}

impl Room {
    fn seat_index(&self, token: u64) -> Option<usize> {
        self.seats.iter().position(|s| s.token == token)
    }

    fn names(&self) -> Vec<String> {
        self.seats.iter().map(|s| s.name.clone()).collect()
    }

    fn send_to(&self, index: usize, update: StateUpdate) {
        if let Some(seat) = self.seats.get(index) {
            let _ = seat.writer.send(ServerFrame::state(seat.name.clone(), &update));
        }
    }

    fn broadcast(&self, update: &StateUpdate) {
        for seat in &self.seats {
            let _ = seat.writer.send(ServerFrame::state(seat.name.clone(), update));
        }
    }

    fn broadcast_excluding(&self, update: &StateUpdate, excluded: usize) {
        for (i, seat) in self.seats.iter().enumerate() {
            if i == excluded {
                continue;
            }
            let _ = seat.writer.send(ServerFrame::state(seat.name.clone(), update));
        }
    }

    fn handle_join(&mut self, player_name: String, writer: SessionWriter, ack: oneshot::Sender<JoinOutcome>) {
        if self.seats.len() >= 3 {
            let _ = writer.send(ServerFrame::info(player_name, "每桌最多3位玩家，玩家已经满了"));
            writer.close();
            let _ = ack.send(JoinOutcome::Rejected);
            return;
        }

        let token = self.next_token;
        self.next_token += 1;
        self.seats.push(Seat {
            token,
            name: player_name,
            writer,
        });
        let index = self.seats.len() - 1;
        let _ = ack.send(JoinOutcome::Seated { token });

        let names = self.names();
        for (i, seat) in self.seats.iter().enumerate() {
            let update = StateUpdate::message(format!("【{}】加入了房间", self.seats[index].name))
                .with_name_list(names.clone())
                .with_my_index(i);
            let _ = seat.writer.send(ServerFrame::state(seat.name.clone(), &update));
        }

        if self.seats.len() == 3 {
            self.start_round();
        }
    }

    fn handle_close(&mut self, token: u64) {
        let Some(index) = self.seat_index(token) else {
            return;
        };
        let closed = self.seats.remove(index);
        tracing::info!(room = %self.name, player = %closed.name, "seat disconnected");

        // Any in-flight round is aborted for the survivors (spec.md §4.5 Leave).
        self.phase = Phase::WaitingForPlayers;

        let names = self.names();
        for (i, seat) in self.seats.iter().enumerate() {
            let update = StateUpdate::message(format!("【{}】退出了房间", closed.name))
                .with_name_list(names.clone())
                .with_my_index(i);
            let _ = seat.writer.send(ServerFrame::state(seat.name.clone(), &update));
            let _ = seat.writer.send(ServerFrame::round_end(seat.name.clone()));
        }
    }

    async fn handle_line(&mut self, token: u64, line: &str) {
        let Some(index) = self.seat_index(token) else {
            return;
        };

        match &mut self.phase {
            Phase::WaitingForPlayers => {}
            Phase::Bidding(bidding) => {
                if index != bidding.current {
                    return;
                }
                self.handle_bid(index, line);
            }
            Phase::Playing(round) => {
                if index != round.current {
                    return;
                }
                self.handle_play(index, line).await;
            }
        }
    }

    /// Deals a fresh hand and enters bidding, looping on an all-zero result
    /// until at least one seat bids (spec.md §4.5 Bidding).
    fn start_round(&mut self) {
        let bidding = Bidding::deal();
        for (i, hand) in bidding.hands.iter().enumerate() {
            let update = StateUpdate {
                my_card_list: Some(hand.iter().map(Card::name).collect()),
                ..StateUpdate::default()
            };
            self.send_to(i, update);
        }
        self.phase = Phase::Bidding(bidding);
        self.prompt_bid(0);
    }

    fn prompt_bid(&self, seat: usize) {
        let Some(name) = self.seats.get(seat).map(|s| s.name.clone()) else {
            return;
        };
        self.broadcast_excluding(&StateUpdate::message(format!("等待【{name}】叫分")), seat);
        self.send_to(
            seat,
            StateUpdate::message("请叫分（0~3）").with_state(PlayState::Marking),
        );
    }

    fn handle_bid(&mut self, seat: usize, line: &str) {
        let Phase::Bidding(bidding) = &mut self.phase else {
            return;
        };

        match bidding.record_bid(seat, line.trim()) {
            BidOutcome::Invalid => {
                self.send_to(
                    seat,
                    StateUpdate::message("格式错误，请输入纯数字").with_state(PlayState::Marking),
                );
            }
            BidOutcome::Continue { next } => {
                let bid: u8 = line.trim().parse().unwrap_or(0);
                let names = self.bid_annotated_names(bidding);
                self.broadcast(
                    &StateUpdate::message(format!("【{}】叫 {bid} 分", self.seats[seat].name))
                        .with_name_list(names)
                        .with_state(PlayState::Wait),
                );
                self.prompt_bid(next);
            }
            BidOutcome::Redeal => {
                self.broadcast(&StateUpdate::message("全部叫分为0，重新发牌").with_state(PlayState::Wait));
                self.start_round();
            }
            BidOutcome::LandlordDecided { landlord } => self.finalize_bidding(landlord),
        }
    }

    /// Names annotated with each seat's bid so far this pass
    /// (`"name:2分"`), matching the original's running `name_list` display
    /// during bidding.
    fn bid_annotated_names(&self, bidding: &Bidding) -> Vec<String> {
        self.seats
            .iter()
            .zip(bidding.bids())
            .map(|(seat, bid)| match bid {
                Some(b) => format!("{}:{b}分", seat.name),
                None => seat.name.clone(),
            })
            .collect()
    }

    fn finalize_bidding(&mut self, landlord: usize) {
        let Phase::Bidding(bidding) = std::mem::replace(&mut self.phase, Phase::WaitingForPlayers) else {
            return;
        };
        let mut hands = bidding.hands.clone();
        let kitty = bidding.into_kitty();
        hands[landlord].extend(kitty.iter().copied());
        hands[landlord].sort_by(|a, b| b.cmp(a));

        let names: Vec<String> = self
            .seats
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let role = if i == landlord { "地主" } else { "农民" };
                format!("{}:{role}", s.name)
            })
            .collect();

        let landlord_name = self.seats[landlord].name.clone();
        self.broadcast(
            &StateUpdate::message(format!("地主是:{landlord_name}"))
                .with_name_list(names)
                .with_remain_card_list(&kitty)
                .with_state(PlayState::Wait),
        );
        self.send_to(
            landlord,
            StateUpdate {
                my_card_list: Some(hands[landlord].iter().map(Card::name).collect()),
                ..StateUpdate::default()
            },
        );

        self.phase = Phase::Playing(Round::new(hands, landlord));
        self.prompt_turn();
    }

    fn prompt_turn(&mut self) {
        let Phase::Playing(round) = &mut self.phase else {
            return;
        };
        round.begin_turn();
        let counts = round.card_counts();
        let current = round.current;
        let is_free = round.is_free;
        let name = self.seats[current].name.clone();

        self.broadcast(&StateUpdate {
            card_count_list: Some(counts),
            state: Some(PlayState::Wait),
            ..StateUpdate::default()
        });

        if is_free {
            self.broadcast(&StateUpdate::message(format!("轮到【{name}】出任意牌了")));
            self.send_to(current, StateUpdate::default().with_state(PlayState::Free));
        } else {
            self.broadcast(&StateUpdate::message(format!("轮到【{name}】出牌了")));
            self.send_to(current, StateUpdate::default().with_state(PlayState::Playing));
        }
    }

    async fn handle_play(&mut self, seat: usize, line: &str) {
        let Phase::Playing(round) = &mut self.phase else {
            return;
        };

        if is_pass(line) {
            if round.is_free {
                self.send_to(
                    seat,
                    StateUpdate::message("本次你为任意牌，必须出牌").with_state(PlayState::Free),
                );
                return;
            }
            let name = self.seats[seat].name.clone();
            self.broadcast(&StateUpdate::message(format!("【{name}】选择了不出")).with_state(PlayState::Wait));
            round.advance();
            self.prompt_turn();
            return;
        }

        let Some(cards) = parse_play_tokens(line) else {
            self.send_to(
                seat,
                StateUpdate::message("出牌格式有误").with_state(if round.is_free {
                    PlayState::Free
                } else {
                    PlayState::Playing
                }),
            );
            return;
        };

        let retry_state = if round.is_free { PlayState::Free } else { PlayState::Playing };
        match round.apply_play(seat, cards) {
            Ok(PlayOutcome::Played { hand, won }) => {
                let my_cards = round.hands[seat].iter().map(Card::name).collect();
                self.send_to(
                    seat,
                    StateUpdate {
                        my_card_list: Some(my_cards),
                        ..StateUpdate::default()
                    },
                );
                self.broadcast(&StateUpdate {
                    last_card_player_index: Some(seat),
                    last_card_list: Some(hand.cards.iter().map(Card::name).collect()),
                    last_card_type: Some(format!("{:?}", hand.hand_type)),
                    state: Some(PlayState::Wait),
                    ..StateUpdate::default()
                });

                if won {
                    let name = self.seats[seat].name.clone();
                    self.broadcast(&StateUpdate::message(format!("【{name}】胜利")).with_state(PlayState::Wait));
                    sleep(Duration::from_secs(5)).await;
                    for seat in &self.seats {
                        let _ = seat.writer.send(ServerFrame::round_end(seat.name.clone()));
                    }
                    if self.seats.len() == 3 {
                        self.start_round();
                    } else {
                        self.phase = Phase::WaitingForPlayers;
                    }
                    return;
                }

                round.advance();
                self.prompt_turn();
            }
            Ok(PlayOutcome::Passed) => unreachable!("pass is handled above apply_play"),
            Err(err) => {
                self.send_to(seat, StateUpdate::message(err.to_string()).with_state(retry_state));
            }
        }
    }
}

/// Registry of live rooms keyed by name, mirroring the original's
/// process-wide `room_map` (spec.md §9 "Globals"): written only by the
/// listener task when routing a new connection, guarded by one lock.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: std::sync::Arc<Mutex<HashMap<String, mpsc::UnboundedSender<RoomCommand>>>>,
}

impl RoomRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the command channel for `room_name`, spawning a new room
    /// actor on first use.
    pub async fn get_or_create(&self, room_name: &str) -> mpsc::UnboundedSender<RoomCommand> {
        let mut rooms = self.rooms.lock().await;
        if let Some(tx) = rooms.get(room_name) {
            if !tx.is_closed() {
                return tx.clone();
            }
        }
        let tx = spawn_room(room_name.to_string());
        rooms.insert(room_name.to_string(), tx.clone());
        tx
    }
}
