// src/handlers/historial.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::historial::{HistorialQuery, HistorialResponse},
};

// GET /api/historial
#[utoipa::path(
    get,
    path = "/api/historial",
    tag = "Historial",
    params(HistorialQuery),
    responses(
        (status = 200, description = "Página de movimentos de estoque", body = HistorialResponse),
        (status = 400, description = "Intervalo de datas inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_historial(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<HistorialQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let historial = app_state.historial_service
        .list(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(historial))
}
