use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::service::{RankError, RankOutcome};
use crate::DataSource;

#[derive(Debug, Deserialize)]
pub struct ApiRankRequest {
    #[serde(default)]
    pub handle: Option<String>,
}

impl ApiRankRequest {
    pub fn handle(&self) -> &str {
        self.handle.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiRankResponse {
    pub handle: String,
    pub followers: u64,
    pub following: u64,
    pub tweets: u64,
    pub impressions: u64,
    pub score: f64,
    pub global_rank: u64,
    pub total_users: u64,
    pub data_source: DataSource,
    pub source: Option<String>,
}

impl From<RankOutcome> for ApiRankResponse {
    fn from(outcome: RankOutcome) -> Self {
        Self {
            handle: outcome.handle,
            followers: outcome.stats.followers,
            following: outcome.stats.following,
            tweets: outcome.stats.posts,
            impressions: outcome.stats.impressions,
            score: outcome.score,
            global_rank: outcome.global_rank,
            total_users: outcome.total_users,
            data_source: outcome.data_source,
            source: outcome.source,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("Error processing request: {}", message),
        }
    }
}

impl From<RankError> for ApiError {
    fn from(err: RankError) -> Self {
        match err {
            RankError::InvalidHandle(err) => Self {
                status: StatusCode::BAD_REQUEST,
                detail: err.to_string(),
            },
            RankError::Internal(message) => Self::internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorBody { detail: self.detail })).into_response()
    }
}
