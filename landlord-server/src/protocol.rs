//! The wire protocol (spec.md §6): newline-terminated JSON frames
//! server→client, plain-text commands client→server.

use serde::{Deserialize, Serialize};

use landlord_rules::Card;

/// The `state` tag carried in a [`StateUpdate`], resolving the duplicate
/// `PLAY_STATE` declaration the original source carried (spec.md §9 note c)
/// into one canonical enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayState {
    /// Nobody at the table is being prompted right now.
    Wait,
    /// The seat is being asked to bid `0`..`3`.
    Marking,
    /// The seat's turn, and a reference hand is on the table to follow.
    Playing,
    /// The seat's turn with no reference hand: any legal shape is accepted
    /// and `pass` is rejected.
    Free,
}

impl From<PlayState> for u8 {
    fn from(state: PlayState) -> Self {
        match state {
            PlayState::Wait => 0,
            PlayState::Marking => 1,
            PlayState::Playing => 2,
            PlayState::Free => 3,
        }
    }
}

impl TryFrom<u8> for PlayState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Wait),
            1 => Ok(Self::Marking),
            2 => Ok(Self::Playing),
            3 => Ok(Self::Free),
            other => Err(format!("unknown play state tag {other}")),
        }
    }
}

/// A server→client delta update. Every field is optional; an absent field
/// means "unchanged" on the client, so the room only ever fills in the
/// fields a given event actually touched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StateUpdate {
    /// This connection's own seat index, sent once on join.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_index: Option<usize>,
    /// Every seated player's display name, annotated with bid/role where
    /// relevant (`"name:2分"`, `"name:地主"`, `"name:农民"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_list: Option<Vec<String>>,
    /// This connection's full hand, sorted descending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_card_list: Option<Vec<String>>,
    /// A human-readable line for the log/status area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_message: Option<String>,
    /// Remaining card count per seat, indexed by seat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_count_list: Option<Vec<usize>>,
    /// The seat index whose play is recorded as the table's last play.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_card_player_index: Option<usize>,
    /// The recognized [`landlord_rules::HandType`] name of the last play.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_card_type: Option<String>,
    /// The card names making up the last play.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_card_list: Option<Vec<String>>,
    /// The 3 kitty cards, revealed once bidding finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remain_card_list: Option<Vec<String>>,
    /// The current [`PlayState`] tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PlayState>,
}

impl StateUpdate {
    /// An update carrying only a status line, defaulting `state` to
    /// [`PlayState::Wait`]'s implicit "unchanged" — matches the original
    /// `Message(text)` one-argument constructor.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            top_message: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: PlayState) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn with_name_list(mut self, names: Vec<String>) -> Self {
        self.name_list = Some(names);
        self
    }

    #[must_use]
    pub fn with_my_index(mut self, index: usize) -> Self {
        self.my_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_card_count_list(mut self, counts: Vec<usize>) -> Self {
        self.card_count_list = Some(counts);
        self
    }

    #[must_use]
    pub fn with_remain_card_list(mut self, cards: &[Card]) -> Self {
        self.remain_card_list = Some(cards.iter().map(Card::name).collect());
        self
    }
}

/// A fully-serialized server→client frame: `{"code":int,"data":any,"player":str}`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerFrame {
    /// `0` = state update, `1` = info popup, `-1` = end-of-round.
    pub code: i32,
    /// The payload: a [`StateUpdate`], a bare string, or null.
    pub data: serde_json::Value,
    /// The receiving player's own display name.
    pub player: String,
}

impl ServerFrame {
    /// Builds a `code=0` state update frame.
    #[must_use]
    pub fn state(player: impl Into<String>, update: &StateUpdate) -> Self {
        Self {
            code: 0,
            data: serde_json::to_value(update).unwrap_or(serde_json::Value::Null),
            player: player.into(),
        }
    }

    /// Builds an empty `code=0` heartbeat frame.
    #[must_use]
    pub fn heartbeat(player: impl Into<String>) -> Self {
        Self::state(player, &StateUpdate::default())
    }

    /// Builds a `code=1` informational popup (used for "room is full").
    #[must_use]
    pub fn info(player: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: 1,
            data: serde_json::Value::String(message.into()),
            player: player.into(),
        }
    }

    /// Builds a `code=-1` end-of-round signal.
    #[must_use]
    pub fn round_end(player: impl Into<String>) -> Self {
        Self {
            code: -1,
            data: serde_json::Value::Null,
            player: player.into(),
        }
    }

    /// Serializes this frame to a newline-terminated JSON line, ready to
    /// write straight to the socket.
    #[must_use]
    pub fn to_line(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        line.push('\n');
        line
    }
}

/// Parses a client command line into a list of cards. Per spec.md §4.6, the
/// line must end with the later protocol revision's trailing two-digit
/// type-code annotation; the server always reclassifies authoritatively via
/// [`landlord_rules::classify`], so the annotation's *value* is discarded
/// once stripped, but its *presence* is mandatory: "If the annotation is
/// missing or non-numeric the server treats the input as malformed."
///
/// Returns `None` if the line has no trailing two-digit numeric token, or if
/// the remaining tokens don't all parse as cards.
#[must_use]
pub fn parse_play_tokens(line: &str) -> Option<Vec<Card>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (last, rest) = tokens.split_last()?;
    if rest.is_empty() || last.len() != 2 || !last.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    try_parse_all(rest)
}

fn try_parse_all(tokens: &[&str]) -> Option<Vec<Card>> {
    tokens.iter().map(|tok| Card::parse(tok)).collect()
}

/// True if `line`, once trimmed, is a pass/no-play command in either
/// language (spec.md §4.5 step 4).
#[must_use]
pub fn is_pass(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "不出" || trimmed.eq_ignore_ascii_case("pass")
}

#[cfg(test)]
mod tests {
    use super::*;
    use landlord_rules::{Rank, Suit};

    #[test]
    fn parse_play_tokens_with_trailing_type_code_annotation() {
        let cards = parse_play_tokens("♥3 ♠3 01").unwrap();
        assert_eq!(cards, vec![Card::new(Suit::Hearts, Rank::Three), Card::new(Suit::Spades, Rank::Three)]);
    }

    #[test]
    fn parse_play_tokens_rejects_missing_annotation() {
        assert!(parse_play_tokens("♥3 ♠3").is_none());
    }

    #[test]
    fn parse_play_tokens_rejects_non_numeric_annotation() {
        assert!(parse_play_tokens("♥3 ♠3 xx").is_none());
    }

    #[test]
    fn parse_play_tokens_rejects_annotation_with_no_cards() {
        assert!(parse_play_tokens("01").is_none());
    }

    #[test]
    fn parse_play_tokens_rejects_garbage() {
        assert!(parse_play_tokens("not a card 01").is_none());
    }

    #[test]
    fn is_pass_recognizes_both_languages() {
        assert!(is_pass("不出"));
        assert!(is_pass("pass"));
        assert!(is_pass("PASS"));
        assert!(!is_pass("♥3"));
    }

    #[test]
    fn state_update_skips_absent_fields() {
        let update = StateUpdate::default().with_my_index(1);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"my_index": 1}));
    }
}
