pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::GameRegistry;

pub const PROTOCOL_VERSION: &str = "1.0";

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GameRegistry>>,
) -> impl IntoResponse {
    tracing::info!("Bridge connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serve one bridge connection until it closes
async fn handle_socket(socket: WebSocket, state: Arc<GameRegistry>) {
    let (mut sender, mut receiver) = socket.split();

    let welcome = ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        server_now: chrono::Utc::now().to_rfc3339(),
    };

    if let Ok(msg) = serde_json::to_string(&welcome) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message");
            return;
        }
    }

    while let Some(ws_msg) = receiver.next().await {
        match ws_msg {
            Ok(Message::Text(text)) => {
                tracing::debug!("Received message: {}", text.as_str());

                let replies = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => handlers::handle_message(client_msg, &state).await,
                    Err(e) => {
                        tracing::error!("Failed to parse client message: {}", e);
                        vec![ServerMessage::Error {
                            code: "PARSE_ERROR".to_string(),
                            msg: format!("Invalid message format: {}", e),
                        }]
                    }
                };

                for reply in replies {
                    let json = match serde_json::to_string(&reply) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize reply: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        tracing::error!("Failed to send reply");
                        return;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket closed");
                break;
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    tracing::info!("Bridge connection closed");
}
