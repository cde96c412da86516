pub mod categories;
pub mod products;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::models::Message;

pub async fn root() -> (StatusCode, Json<Message>) {
    (StatusCode::OK, Json(Message::new("API E-commerce - Magasin")))
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "catalog-service" })))
}
