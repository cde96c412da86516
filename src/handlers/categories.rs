use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    models::CategoryList,
    AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<CategoryList>)> {
    let categories = state
        .store
        .categories()
        .await
        .map_err(AppError::internal("Erreur base de données"))?;

    debug!(count = categories.len(), "Listed categories");

    Ok((StatusCode::OK, Json(CategoryList { categories })))
}
