mod guess;
mod session;
#[cfg(test)]
pub(crate) mod test_support;

pub use guess::{is_match, normalize};
pub use session::GameSession;

use crate::catalog::WordSource;
use crate::protocol::{InboundEvent, OutboundAction, RejectReason};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Slot holding one chat's session behind its own lock
type SessionSlot = Arc<Mutex<GameSession>>;

/// Owns every chat's session and routes events to them.
///
/// The map lock is only held to find or create a slot. Events for one chat
/// are serialized by that chat's mutex; different chats never wait on each
/// other beyond the map lookup.
#[derive(Clone)]
pub struct GameRegistry {
    sessions: Arc<RwLock<HashMap<ChatId, SessionSlot>>>,
    words: Arc<dyn WordSource>,
}

impl GameRegistry {
    pub fn new(words: Arc<dyn WordSource>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            words,
        }
    }

    /// Apply `event` to the chat's session, creating it on first contact.
    /// Leader buttons in a chat that has never been seen are turned away
    /// without creating a session.
    pub async fn dispatch(&self, chat_id: ChatId, event: InboundEvent) -> Vec<OutboundAction> {
        if event.is_leader_control() && !self.sessions.read().await.contains_key(&chat_id) {
            return vec![OutboundAction::Rejected {
                user_id: event.user_id(),
                reason: RejectReason::NoGameInProgress,
            }];
        }

        let slot = self.slot(chat_id).await;
        let mut session = slot.lock().await;

        tracing::debug!(chat_id, user_id = event.user_id(), "Dispatching {:?}", event);
        session.apply(event, self.words.as_ref())
    }

    /// Current state of a chat, if it has ever been seen
    pub async fn snapshot(&self, chat_id: ChatId) -> Option<SessionSnapshot> {
        let slot = self.sessions.read().await.get(&chat_id).cloned()?;
        let session = slot.lock().await;
        Some(session.snapshot())
    }

    /// Put a chat back to idle. Returns false if the chat was never seen.
    pub async fn reset(&self, chat_id: ChatId) -> bool {
        let slot = self.sessions.read().await.get(&chat_id).cloned();
        match slot {
            Some(slot) => {
                slot.lock().await.reset();
                tracing::info!(chat_id, "Chat reset");
                true
            }
            None => false,
        }
    }

    pub async fn chat_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn slot(&self, chat_id: ChatId) -> SessionSlot {
        if let Some(slot) = self.sessions.read().await.get(&chat_id) {
            return slot.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(chat_id)
            .or_insert_with(|| {
                tracing::info!(chat_id, "New chat session");
                Arc::new(Mutex::new(GameSession::new(chat_id)))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FixedWords;
    use super::*;

    fn registry(words: FixedWords) -> GameRegistry {
        GameRegistry::new(Arc::new(words))
    }

    fn guess(user_id: UserId, text: &str) -> InboundEvent {
        InboundEvent::IncomingText {
            user_id,
            text: text.to_string(),
            message_ref: format!("m{}", user_id),
        }
    }

    #[tokio::test]
    async fn test_unknown_chat_created_lazily() {
        let registry = registry(FixedWords::new(&["кот"], &[0]));
        assert!(registry.snapshot(1).await.is_none());

        let actions = registry
            .dispatch(1, InboundEvent::Greet { user_id: 10 })
            .await;
        assert_eq!(actions, vec![OutboundAction::Greeting]);
        assert_eq!(registry.chat_count().await, 1);
        assert_eq!(registry.snapshot(1).await.unwrap().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let registry = registry(FixedWords::new(&["яблоко", "стол"], &[0, 1]));

        registry
            .dispatch(1, InboundEvent::RequestStart { user_id: 10 })
            .await;
        registry
            .dispatch(2, InboundEvent::RequestStart { user_id: 20 })
            .await;

        let one = registry.snapshot(1).await.unwrap();
        let two = registry.snapshot(2).await.unwrap();
        assert_eq!(one.leader_id, Some(10));
        assert_eq!(one.secret_word.as_deref(), Some("яблоко"));
        assert_eq!(two.leader_id, Some(20));
        assert_eq!(two.secret_word.as_deref(), Some("стол"));

        // A correct guess in chat 2's word does nothing in chat 1
        assert!(registry.dispatch(1, guess(30, "стол")).await.is_empty());
    }

    #[tokio::test]
    async fn test_buttons_in_unseen_chat_not_started() {
        let registry = registry(FixedWords::new(&["кот"], &[0]));

        let actions = registry
            .dispatch(1, InboundEvent::ShowWordRequest { user_id: 20 })
            .await;
        assert_eq!(
            actions,
            vec![OutboundAction::Rejected {
                user_id: 20,
                reason: RejectReason::NoGameInProgress
            }]
        );
        assert_eq!(registry.chat_count().await, 0);
    }

    #[tokio::test]
    async fn test_buttons_in_idle_chat_not_leader() {
        let registry = registry(FixedWords::new(&["кот"], &[0]));
        registry
            .dispatch(1, InboundEvent::RequestStart { user_id: 10 })
            .await;
        registry
            .dispatch(1, InboundEvent::PassTurnRequest { user_id: 10 })
            .await;

        let actions = registry
            .dispatch(1, InboundEvent::ShowWordRequest { user_id: 20 })
            .await;
        assert_eq!(
            actions,
            vec![OutboundAction::Rejected {
                user_id: 20,
                reason: RejectReason::NotLeader
            }]
        );
    }

    #[tokio::test]
    async fn test_reset() {
        let registry = registry(FixedWords::new(&["кот"], &[0]));
        assert!(!registry.reset(1).await);

        registry
            .dispatch(1, InboundEvent::RequestStart { user_id: 10 })
            .await;
        assert!(registry.reset(1).await);

        let snap = registry.snapshot(1).await.unwrap();
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.leader_id.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_simultaneous_guesses_have_one_winner() {
        let registry = registry(FixedWords::new(&["кот", "стол"], &[0, 1]));
        registry
            .dispatch(1, InboundEvent::RequestStart { user_id: 10 })
            .await;

        let handles: Vec<_> = (100..150)
            .map(|user_id| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.dispatch(1, guess(user_id, "Кот!")).await })
            })
            .collect();

        let mut winners = Vec::new();
        for handle in handles {
            for action in handle.await.unwrap() {
                if let OutboundAction::AnnounceGuessCorrect { user_id, .. } = action {
                    winners.push(user_id);
                }
            }
        }

        assert_eq!(winners.len(), 1);
        let snap = registry.snapshot(1).await.unwrap();
        assert_eq!(snap.leader_id, Some(winners[0]));
        assert_eq!(snap.secret_word.as_deref(), Some("стол"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_chats_in_parallel() {
        let registry = registry(FixedWords::new(&["кот"], &[]));

        let handles: Vec<_> = (0..64)
            .map(|chat_id| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .dispatch(chat_id, InboundEvent::RequestStart { user_id: chat_id + 1000 })
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().len(), 1);
        }

        assert_eq!(registry.chat_count().await, 64);
        for chat_id in 0..64 {
            let snap = registry.snapshot(chat_id).await.unwrap();
            assert_eq!(snap.leader_id, Some(chat_id + 1000));
        }
    }
}
