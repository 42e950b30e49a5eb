use super::guess;
use crate::catalog::{Word, WordSource};
use crate::protocol::{InboundEvent, OutboundAction, RejectReason};
use crate::types::*;

/// The turn currently being explained
#[derive(Debug, Clone)]
struct ActiveTurn {
    leader_id: UserId,
    word: Word,
    prompt_ref: MessageRef,
}

#[derive(Debug, Clone)]
enum Turn {
    Idle,
    AwaitingGuess(ActiveTurn),
}

/// Per-chat game state machine.
///
/// Leader, word and prompt reference only exist while a turn is running, so
/// the "leader set iff awaiting a guess" invariant holds by construction.
/// Every call to [`GameSession::apply`] evaluates guards, mutates state and
/// builds the action list in one go; the caller holds the chat's lock for the
/// whole call.
#[derive(Debug, Clone)]
pub struct GameSession {
    chat_id: ChatId,
    turn: Turn,
}

impl GameSession {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            turn: Turn::Idle,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn phase(&self) -> Phase {
        match self.turn {
            Turn::Idle => Phase::Idle,
            Turn::AwaitingGuess(_) => Phase::AwaitingGuess,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let active = match &self.turn {
            Turn::Idle => None,
            Turn::AwaitingGuess(t) => Some(t),
        };

        SessionSnapshot {
            chat_id: self.chat_id,
            phase: self.phase(),
            leader_id: active.map(|t| t.leader_id),
            secret_word: active.map(|t| t.word.text.clone()),
            prompt_ref: active.map(|t| t.prompt_ref.clone()),
        }
    }

    /// Drop any running turn without announcing anything
    pub fn reset(&mut self) {
        self.turn = Turn::Idle;
    }

    /// Apply one inbound event and return the actions it produced, in order
    pub fn apply(&mut self, event: InboundEvent, words: &dyn WordSource) -> Vec<OutboundAction> {
        match event {
            InboundEvent::Greet { .. } => vec![OutboundAction::Greeting],
            InboundEvent::RequestStart { user_id } => self.request_start(user_id, words),
            InboundEvent::ShowWordRequest { user_id } => self.show_word(user_id),
            InboundEvent::ChangeWordRequest { user_id } => self.change_word(user_id, words),
            InboundEvent::PassTurnRequest { user_id } => self.pass_turn(user_id),
            InboundEvent::IncomingText {
                user_id,
                text,
                message_ref,
            } => self.incoming_text(user_id, text, message_ref, words),
        }
    }

    fn request_start(&mut self, user_id: UserId, words: &dyn WordSource) -> Vec<OutboundAction> {
        if let Turn::AwaitingGuess(_) = self.turn {
            return vec![OutboundAction::Rejected {
                user_id,
                reason: RejectReason::GameInProgress,
            }];
        }

        match words.select_random() {
            Ok(word) => vec![self.arm(user_id, word)],
            Err(e) => {
                tracing::warn!(chat_id = self.chat_id, "Cannot start turn: {}", e);
                Vec::new()
            }
        }
    }

    fn show_word(&mut self, user_id: UserId) -> Vec<OutboundAction> {
        match self.leader_turn(user_id) {
            Ok(turn) => vec![OutboundAction::RevealWord {
                user_id,
                word: turn.word.text.clone(),
                changed: false,
            }],
            Err(reason) => vec![OutboundAction::Rejected { user_id, reason }],
        }
    }

    fn change_word(&mut self, user_id: UserId, words: &dyn WordSource) -> Vec<OutboundAction> {
        let chat_id = self.chat_id;
        let turn = match self.leader_turn(user_id) {
            Ok(turn) => turn,
            Err(reason) => return vec![OutboundAction::Rejected { user_id, reason }],
        };

        match words.select_random_excluding(turn.word.index) {
            Ok(word) => {
                tracing::debug!(chat_id, leader_id = user_id, "Leader changed word");
                turn.word = word;
                vec![OutboundAction::RevealWord {
                    user_id,
                    word: turn.word.text.clone(),
                    changed: true,
                }]
            }
            Err(e) => {
                // Keep the current word rather than leave the turn without one
                tracing::warn!(chat_id, "Cannot change word: {}", e);
                Vec::new()
            }
        }
    }

    fn pass_turn(&mut self, user_id: UserId) -> Vec<OutboundAction> {
        if let Err(reason) = self.leader_turn(user_id) {
            return vec![OutboundAction::Rejected { user_id, reason }];
        }

        let Turn::AwaitingGuess(turn) = std::mem::replace(&mut self.turn, Turn::Idle) else {
            return Vec::new();
        };

        tracing::info!(chat_id = self.chat_id, leader_id = user_id, "Leader passed turn");
        vec![
            OutboundAction::RetractPrompt {
                prompt_ref: turn.prompt_ref,
            },
            OutboundAction::PassAcknowledged { user_id },
            OutboundAction::AnnouncePassed { user_id },
        ]
    }

    fn incoming_text(
        &mut self,
        user_id: UserId,
        text: String,
        message_ref: MessageRef,
        words: &dyn WordSource,
    ) -> Vec<OutboundAction> {
        let Turn::AwaitingGuess(turn) = &self.turn else {
            return Vec::new();
        };

        if turn.leader_id == user_id {
            // The leader may not write in plain sight; repost it attributed
            return vec![
                OutboundAction::RetractMessage { message_ref },
                OutboundAction::Rebroadcast { user_id, text },
            ];
        }

        if !guess::is_match(&text, &turn.word.text) {
            return Vec::new();
        }

        let Turn::AwaitingGuess(guessed) = std::mem::replace(&mut self.turn, Turn::Idle) else {
            return Vec::new();
        };

        tracing::info!(
            chat_id = self.chat_id,
            winner = user_id,
            previous_leader = guessed.leader_id,
            "Word guessed"
        );

        let mut actions = vec![
            OutboundAction::RetractPrompt {
                prompt_ref: guessed.prompt_ref,
            },
            OutboundAction::AnnounceGuessCorrect {
                user_id,
                word: guessed.word.text,
                phrase: words.pick_celebration_phrase(),
            },
        ];

        match words.select_random() {
            Ok(word) => actions.push(self.arm(user_id, word)),
            Err(e) => {
                tracing::warn!(
                    chat_id = self.chat_id,
                    "Anomalous state: no word for new leader ({}), chat left idle",
                    e
                );
            }
        }

        actions
    }

    /// Start a turn for `leader_id` with `word` and return its prompt action
    fn arm(&mut self, leader_id: UserId, word: Word) -> OutboundAction {
        let prompt_ref = ulid::Ulid::new().to_string();

        tracing::info!(chat_id = self.chat_id, leader_id, "Turn started");
        self.turn = Turn::AwaitingGuess(ActiveTurn {
            leader_id,
            word,
            prompt_ref: prompt_ref.clone(),
        });

        OutboundAction::ShowTurnPrompt {
            leader_id,
            prompt_ref,
        }
    }

    fn leader_turn(&mut self, user_id: UserId) -> Result<&mut ActiveTurn, RejectReason> {
        match &mut self.turn {
            // An idle chat has no leader, so nobody may press the buttons
            Turn::Idle => Err(RejectReason::NotLeader),
            Turn::AwaitingGuess(turn) if turn.leader_id == user_id => Ok(turn),
            Turn::AwaitingGuess(_) => Err(RejectReason::NotLeader),
        }
    }
}
