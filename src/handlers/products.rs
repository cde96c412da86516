use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{Message, NewProduct, Product},
    AppState,
};

/// Status for a successful create. Existing consumers expect 200, not 201.
const CREATED_STATUS: StatusCode = StatusCode::OK;

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Product>>)> {
    let start = Instant::now();
    let products = state
        .store
        .list()
        .await
        .map_err(AppError::internal("Erreur base de données"))?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok((StatusCode::OK, Json(products)))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    if let Some(field) = payload.field_with_nul() {
        return Err(AppError::BadRequest(format!("{} must not contain NUL characters", field)));
    }

    let product = Product::new(payload);

    let start = Instant::now();
    state
        .store
        .insert(&product)
        .await
        .map_err(AppError::internal("Erreur lors de l'ajout"))?;

    info!(
        id = %product.id,
        name = %product.name,
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    Ok((CREATED_STATUS, Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .store
        .find(&id)
        .await
        .map_err(AppError::internal("Erreur base de données"))?
        .ok_or_else(AppError::product_not_found)?;

    info!(id = %id, "Fetched product");

    Ok((StatusCode::OK, Json(product)))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let deleted = state
        .store
        .delete(&id)
        .await
        .map_err(AppError::internal("Erreur lors de la suppression"))?;

    if !deleted {
        return Err(AppError::product_not_found());
    }

    info!(id = %id, "Deleted product");

    Ok((StatusCode::OK, Json(Message::new("Produit supprimé avec succès"))))
}
