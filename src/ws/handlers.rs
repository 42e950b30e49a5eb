//! Transport message dispatch
//!
//! Turns a bridge's `ClientMessage` into an inbound event, runs it through the
//! registry and wraps every resulting action for the wire.

use crate::protocol::{ClientMessage, InboundEvent, ServerMessage};
use crate::render::{render, Actor};
use crate::state::GameRegistry;
use crate::types::ChatId;
use std::sync::Arc;

fn error(code: &str, msg: String) -> Vec<ServerMessage> {
    vec![ServerMessage::Error {
        code: code.to_string(),
        msg,
    }]
}

/// Dispatch one event and wrap its actions, rendering mentions of the actor
/// with `user_name` when the bridge supplied one
async fn run(
    state: &GameRegistry,
    chat_id: ChatId,
    event: InboundEvent,
    user_name: Option<String>,
) -> Vec<ServerMessage> {
    let user_id = event.user_id();
    let actions = state.dispatch(chat_id, event).await;
    let actor = user_name.as_deref().map(|name| Actor { user_id, name });

    actions
        .into_iter()
        .map(|action| ServerMessage::Action {
            chat_id,
            rendered: render(&action, actor),
            action,
        })
        .collect()
}

/// Handle a bridge message and return the replies, in order
pub async fn handle_message(msg: ClientMessage, state: &Arc<GameRegistry>) -> Vec<ServerMessage> {
    match msg {
        ClientMessage::Event {
            chat_id,
            event,
            user_name,
        } => run(state, chat_id, event, user_name).await,

        ClientMessage::Callback {
            chat_id,
            user_id,
            data,
            user_name,
        } => match InboundEvent::from_callback(user_id, &data) {
            Some(event) => run(state, chat_id, event, user_name).await,
            None => {
                tracing::warn!(chat_id, user_id, "Unknown callback data: {}", data);
                error("UNKNOWN_CALLBACK", format!("Unknown callback data: {}", data))
            }
        },

        ClientMessage::Command {
            chat_id,
            user_id,
            command,
            user_name,
        } => match InboundEvent::from_command(user_id, &command) {
            Some(event) => run(state, chat_id, event, user_name).await,
            None => error("UNKNOWN_COMMAND", format!("Unknown command: {}", command)),
        },

        ClientMessage::ResetChat { chat_id } => {
            let existed = state.reset(chat_id).await;
            vec![ServerMessage::ChatReset { chat_id, existed }]
        }
    }
}
