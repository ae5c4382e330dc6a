//! # Chat Handlers
//!
//! A persistent WebSocket channel plus a REST catch-up query. Each client is
//! authenticated once at connect time from a `token` query parameter; every
//! event on that connection then acts as the connected identity.
//!
//! Fan-out goes through the in-process broadcast hub. Delivery is at-most-once
//! and unordered beyond insertion order: a lagging subscriber drops events and
//! an offline receiver sees nothing until it queries persisted messages.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use bazaar_core::{
    errors::{BazaarError, BazaarResult},
    models::chat::{ChatMessageResponse, ClientEvent, MessageStatus, ServerEvent},
    principal::Principal,
};
use bazaar_db::models::DbChatMessage;
use bazaar_db::repositories::chat as chat_repo;
use uuid::Uuid;

use crate::{
    middleware::{auth, auth::AuthPrincipal, error_handling::AppError},
    AddressedEvent, ApiState,
};

#[derive(Debug, Deserialize)]
pub struct ChatTokenQuery {
    pub token: String,
}

/// Upgrades the connection after resolving the token. Authentication happens
/// exactly once; the socket then speaks for that account until it closes.
pub async fn chat_socket(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ChatTokenQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let principal = auth::resolve_token(&state.db_pool, &query.token).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, principal, socket)))
}

async fn handle_socket(state: Arc<ApiState>, principal: Principal, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.chat_tx.subscribe();
    let account_id = principal.account_id;

    tracing::debug!("Chat socket connected: account_id={}", account_id);

    // Outbound: forward hub events addressed to this account
    let mut send_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(addressed) => {
                    if addressed.recipient != account_id {
                        continue;
                    }
                    let payload = match serde_json::to_string(&addressed.event) {
                        Ok(payload) => payload,
                        Err(err) => {
                            tracing::warn!("Failed to encode chat event: {}", err);
                            continue;
                        }
                    };
                    if sink.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                // Lagging receivers drop events; delivery is best effort
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Chat socket for {} lagged, {} events dropped",
                        account_id,
                        skipped
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Inbound: apply client events as the connected identity
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            let Message::Text(text) = message else {
                continue;
            };

            match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    if let Err(err) = handle_client_event(&recv_state, principal, event).await {
                        tracing::warn!("Chat event from {} rejected: {}", account_id, err);
                    }
                }
                Err(err) => {
                    tracing::debug!("Ignoring malformed chat event: {}", err);
                }
            }
        }
    });

    // Either side closing tears the connection down
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!("Chat socket closed: account_id={}", account_id);
}

async fn handle_client_event(
    state: &ApiState,
    principal: Principal,
    event: ClientEvent,
) -> BazaarResult<()> {
    match event {
        ClientEvent::SendMessage { to, body } => {
            if body.trim().is_empty() {
                return Err(BazaarError::Validation(
                    "Message body must not be empty".to_string(),
                ));
            }

            let recipient_exists =
                bazaar_db::repositories::account::get_account_by_id(&state.db_pool, to)
                    .await
                    .map_err(BazaarError::Database)?
                    .is_some();

            if !recipient_exists {
                return Err(BazaarError::NotFound(format!(
                    "Account with ID {} not found",
                    to
                )));
            }

            let message =
                chat_repo::create_message(&state.db_pool, principal.account_id, to, &body)
                    .await
                    .map_err(BazaarError::Database)?;

            publish(
                state,
                to,
                ServerEvent::ReceiveMessage {
                    message: message_response(message),
                },
            );

            Ok(())
        }
        ClientEvent::UpdateMessageStatus { message_id, status } => {
            let status = MessageStatus::from_str(&status)?;
            if status == MessageStatus::Sent {
                return Err(BazaarError::Validation(
                    "A message cannot be moved back to sent".to_string(),
                ));
            }

            let message = chat_repo::get_message_by_id(&state.db_pool, message_id)
                .await
                .map_err(BazaarError::Database)?
                .ok_or_else(|| {
                    BazaarError::NotFound(format!("Message with ID {} not found", message_id))
                })?;

            // Only the receiving side may acknowledge a message
            if message.recipient_id != principal.account_id {
                return Err(BazaarError::Authorization(
                    "Only the recipient may update a message's status".to_string(),
                ));
            }

            let updated =
                chat_repo::update_message_status(&state.db_pool, message_id, status.as_str())
                    .await
                    .map_err(BazaarError::Database)?
                    .ok_or_else(|| {
                        BazaarError::NotFound(format!(
                            "Message with ID {} not found",
                            message_id
                        ))
                    })?;

            // The sender learns about the acknowledgement, if connected
            publish(
                state,
                updated.sender_id,
                ServerEvent::MessageStatusUpdated {
                    message_id: updated.id,
                    status: updated.status,
                },
            );

            Ok(())
        }
    }
}

/// Best-effort publish into the hub. A send error just means nobody is
/// connected right now.
fn publish(state: &ApiState, recipient: Uuid, event: ServerEvent) {
    let _ = state.chat_tx.send(AddressedEvent { recipient, event });
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    /// Admin-only: view another account's thread instead of the caller's.
    pub participant: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<ChatMessageResponse>>, AppError> {
    let account_id = match query.participant {
        Some(participant) => {
            principal.require_admin()?;
            participant
        }
        None => principal.account_id,
    };

    let messages = chat_repo::get_messages_for_account(&state.db_pool, account_id)
        .await
        .map_err(BazaarError::Database)?;

    Ok(Json(messages.into_iter().map(message_response).collect()))
}

fn message_response(message: DbChatMessage) -> ChatMessageResponse {
    ChatMessageResponse {
        id: message.id,
        sender_id: message.sender_id,
        recipient_id: message.recipient_id,
        body: message.body,
        status: message.status,
        created_at: message.created_at,
    }
}
