use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::ApiContext;
use shared::{
    domain::{Bod, BodId, Club, ClubId},
    error::{ApiError, ErrorCode},
    protocol::{BodUpdate, NewBod, NewClub},
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, normalize_database_url};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/bods", get(http_list_bods).post(http_create_bod))
        .route("/bods/:bod_id", get(http_get_bod).patch(http_update_bod))
        .route("/clubs", get(http_list_clubs).post(http_create_club))
        .route("/clubs/:club_id", get(http_get_club))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state.api.storage.health_check().await.map_err(|e| {
        reject(ApiError::internal(format!("storage unavailable: {e}")))
    })?;
    Ok("ok")
}

async fn http_list_bods(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Bod>>> {
    let bods = server_api::list_bods(&state.api).await.map_err(reject)?;
    Ok(Json(bods))
}

async fn http_get_bod(
    State(state): State<Arc<AppState>>,
    Path(bod_id): Path<i64>,
) -> ApiResult<Json<Bod>> {
    let bod = server_api::get_bod(&state.api, BodId(bod_id))
        .await
        .map_err(reject)?;
    Ok(Json(bod))
}

async fn http_create_bod(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewBod>,
) -> ApiResult<(StatusCode, Json<Bod>)> {
    let bod = server_api::create_bod(&state.api, req)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(bod)))
}

async fn http_update_bod(
    State(state): State<Arc<AppState>>,
    Path(bod_id): Path<i64>,
    Json(req): Json<BodUpdate>,
) -> ApiResult<Json<Bod>> {
    let bod = server_api::update_bod(&state.api, BodId(bod_id), req)
        .await
        .map_err(reject)?;
    Ok(Json(bod))
}

async fn http_list_clubs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Club>>> {
    let clubs = server_api::list_clubs(&state.api).await.map_err(reject)?;
    Ok(Json(clubs))
}

async fn http_get_club(
    State(state): State<Arc<AppState>>,
    Path(club_id): Path<i64>,
) -> ApiResult<Json<Club>> {
    let club = server_api::get_club(&state.api, ClubId(club_id))
        .await
        .map_err(reject)?;
    Ok(Json(club))
}

async fn http_create_club(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewClub>,
) -> ApiResult<(StatusCode, Json<Club>)> {
    let club = server_api::create_club(&state.api, req)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(club)))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    if matches!(err.code, ErrorCode::Internal) {
        error!(message = %err.message, "request failed");
    }
    (status_for(err.code), Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
