use crate::render::Rendered;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Callback data attached to the turn prompt buttons
pub const CALLBACK_SHOW_WORD: &str = "show_word";
pub const CALLBACK_CHANGE_WORD: &str = "change_word";
pub const CALLBACK_PASS_TURN: &str = "pass_turn";

/// Events the transport feeds into a chat's session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum InboundEvent {
    /// `/start`: greet the chat, no game change
    Greet { user_id: UserId },
    /// `/play`: become the leader if nobody is
    RequestStart { user_id: UserId },
    ShowWordRequest { user_id: UserId },
    ChangeWordRequest { user_id: UserId },
    PassTurnRequest { user_id: UserId },
    /// Plain chat text, either a guess or the leader talking
    IncomingText {
        user_id: UserId,
        text: String,
        message_ref: MessageRef,
    },
}

impl InboundEvent {
    /// Map a button press to an event
    pub fn from_callback(user_id: UserId, data: &str) -> Option<Self> {
        match data {
            CALLBACK_SHOW_WORD => Some(Self::ShowWordRequest { user_id }),
            CALLBACK_CHANGE_WORD => Some(Self::ChangeWordRequest { user_id }),
            CALLBACK_PASS_TURN => Some(Self::PassTurnRequest { user_id }),
            _ => None,
        }
    }

    /// Map a bot command to an event. Accepts `/play@botname` forms.
    pub fn from_command(user_id: UserId, command: &str) -> Option<Self> {
        let name = command
            .split_whitespace()
            .next()?
            .split('@')
            .next()
            .unwrap_or_default();

        match name {
            "/start" => Some(Self::Greet { user_id }),
            "/play" => Some(Self::RequestStart { user_id }),
            _ => None,
        }
    }

    /// Buttons only the current leader may press
    pub fn is_leader_control(&self) -> bool {
        matches!(
            self,
            Self::ShowWordRequest { .. }
                | Self::ChangeWordRequest { .. }
                | Self::PassTurnRequest { .. }
        )
    }

    pub fn user_id(&self) -> UserId {
        match self {
            Self::Greet { user_id }
            | Self::RequestStart { user_id }
            | Self::ShowWordRequest { user_id }
            | Self::ChangeWordRequest { user_id }
            | Self::PassTurnRequest { user_id }
            | Self::IncomingText { user_id, .. } => *user_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    GameInProgress,
    NotLeader,
    NoGameInProgress,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameInProgress => "game already in progress",
            Self::NotLeader => "not leader",
            Self::NoGameInProgress => "no game in progress",
        }
    }
}

/// Side effects a session asks the transport to perform, in order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum OutboundAction {
    Greeting,
    /// Post the "leader is explaining" message with the three controls.
    /// The transport must remember `prompt_ref` to honor a later `RetractPrompt`.
    ShowTurnPrompt {
        leader_id: UserId,
        prompt_ref: MessageRef,
    },
    /// Private to `user_id`
    RevealWord {
        user_id: UserId,
        word: String,
        changed: bool,
    },
    RetractPrompt { prompt_ref: MessageRef },
    RetractMessage { message_ref: MessageRef },
    /// Private to `user_id`, the leader who just passed
    PassAcknowledged { user_id: UserId },
    AnnouncePassed { user_id: UserId },
    AnnounceGuessCorrect {
        user_id: UserId,
        word: String,
        phrase: String,
    },
    /// Private to `user_id`
    Rejected {
        user_id: UserId,
        reason: RejectReason,
    },
    Rebroadcast { user_id: UserId, text: String },
}

/// Messages a transport bridge sends over the socket.
///
/// `user_name` is the acting user's display name, used for mentions in the
/// rendered text. Without it mentions fall back to the numeric id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    Event {
        chat_id: ChatId,
        event: InboundEvent,
        #[serde(default)]
        user_name: Option<String>,
    },
    Callback {
        chat_id: ChatId,
        user_id: UserId,
        data: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    Command {
        chat_id: ChatId,
        user_id: UserId,
        command: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    ResetChat {
        chat_id: ChatId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
    },
    Action {
        chat_id: ChatId,
        action: OutboundAction,
        rendered: Rendered,
    },
    ChatReset {
        chat_id: ChatId,
        existed: bool,
    },
    Error {
        code: String,
        msg: String,
    },
}
