//! Chat assistant routes

use axum::{routing::post, Router};

use crate::handlers::chat;
use crate::state::AppState;

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat/message", post(chat::send_message))
}
