use crate::error::{AppError, Result};
use crate::types::SymbolSignal;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Full ordered snapshot: one row per universe symbol, in universe order.
async fn results(State(state): State<AppState>) -> Json<Vec<SymbolSignal>> {
    Json(state.cache.snapshot())
}

/// The ordered symbol universe.
async fn symbols(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.cache.symbols().to_vec())
}

/// Current signal for one symbol.
async fn symbol_result(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SymbolSignal>> {
    state
        .cache
        .get(&symbol)
        .map(|signal| Json(SymbolSignal { symbol, signal }))
        .ok_or_else(|| AppError::NotFound("symbol not in universe".to_string()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/results", get(results))
        .route("/api/results/:symbol", get(symbol_result))
        .route("/api/symbols", get(symbols))
}
