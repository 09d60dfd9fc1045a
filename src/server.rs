use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::{any::Any as PanicPayload, net::SocketAddr, sync::Arc};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::api::{ApiError, ApiRankRequest, ApiRankResponse, HealthResponse};
use crate::service::RankService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<RankService>,
}

impl AppState {
    pub fn new(service: Arc<RankService>) -> Self {
        Self { service }
    }
}

pub fn router(state: AppState) -> Router {
    // Wide open for local front-end development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(health))
        .route("/api/rank", post(rank_handler))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let message = if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else {
        "unexpected failure".to_string()
    };
    error!(error = %message, "rank request panicked");
    ApiError::internal(message).into_response()
}

pub async fn serve(host: &str, port: u16, state: AppState) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    info!(%addr, "creator-rank listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn rank_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiRankRequest>,
) -> Result<Json<ApiRankResponse>, ApiError> {
    match state.service.rank(request.handle()).await {
        Ok(outcome) => Ok(Json(ApiRankResponse::from(outcome))),
        Err(err) => {
            warn!(error = %err, "rank request rejected");
            Err(ApiError::from(err))
        }
    }
}
