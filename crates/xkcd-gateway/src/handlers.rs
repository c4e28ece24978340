//! HTTP handlers for the public surface (design §4.3, §6, §10.7).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use xkcd_types::error::DomainError;

use crate::auth::Authenticator;
use crate::clients::Clients;
use crate::error::{status_to_domain, ApiError};

#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<Clients>,
    pub authenticator: Arc<Authenticator>,
}

const DEFAULT_LIMIT: i32 = 10;

fn parse_limit(raw: Option<&String>) -> Result<i32, DomainError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(s) => s
            .parse::<i32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| DomainError::BadRequest("limit must be a positive integer".to_string())),
    }
}

fn require_phrase(params: &HashMap<String, String>) -> Result<String, DomainError> {
    params
        .get("phrase")
        .cloned()
        .ok_or_else(|| DomainError::BadRequest("missing required query parameter: phrase".to_string()))
}

#[derive(Serialize)]
struct Comic {
    id: i64,
    url: String,
}

#[derive(Serialize)]
struct SearchResponseBody {
    comics: Vec<Comic>,
    total: i64,
}

pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    let (ingester, searcher, normalizer) = tokio::join!(
        state.clients.ping_ingester(),
        state.clients.ping_searcher(),
        state.clients.ping_normalizer(),
    );

    let status_of = |res: Result<(), tonic::Status>| match res {
        Ok(()) => "ok".to_string(),
        Err(err) => format!("error: {err}"),
    };

    let mut report = HashMap::new();
    report.insert("ingester", status_of(ingester));
    report.insert("searcher", status_of(searcher));
    report.insert("normalizer", status_of(normalizer));
    Json(report)
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let phrase = require_phrase(&params)?;
    let limit = parse_limit(params.get("limit"))?;

    let (comics, total) = state
        .clients
        .search(phrase, limit)
        .await
        .map_err(status_to_domain)?;

    let body = SearchResponseBody {
        comics: comics.into_iter().map(|(id, url)| Comic { id, url }).collect(),
        total,
    };
    Ok(Json(body).into_response())
}

pub async fn isearch(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let phrase = require_phrase(&params)?;
    let limit = parse_limit(params.get("limit"))?;

    let (comics, total) = state
        .clients
        .isearch(phrase, limit)
        .await
        .map_err(status_to_domain)?;

    let body = SearchResponseBody {
        comics: comics.into_iter().map(|(id, url)| Comic { id, url }).collect(),
        total,
    };
    Ok(Json(body).into_response())
}

pub async fn db_update(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.clients.update().await.map_err(status_to_domain)?;
    Ok(StatusCode::OK.into_response())
}

#[derive(Serialize)]
struct StatsBody {
    words_total: i64,
    words_unique: i64,
    comics_fetched: i64,
    comics_total: i64,
}

pub async fn db_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let stats = state.clients.stats().await.map_err(status_to_domain)?;
    Ok(Json(StatsBody {
        words_total: stats.words_total,
        words_unique: stats.words_unique,
        comics_fetched: stats.comics_fetched,
        comics_total: stats.comics_total,
    })
    .into_response())
}

#[derive(Serialize)]
struct StatusBody {
    status: String,
}

pub async fn db_status(State(state): State<AppState>) -> Result<Response, ApiError> {
    let status = state.clients.status().await.map_err(status_to_domain)?;
    let status = match status {
        xkcd_proto::update::Status::Running => "running",
        _ => "idle",
    };
    Ok(Json(StatusBody { status: status.to_string() }).into_response())
}

pub async fn db_drop(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.clients.drop_corpus().await.map_err(status_to_domain)?;
    Ok(StatusCode::OK.into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    name: String,
    password: String,
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Response, ApiError> {
    let token = state.authenticator.login(&req.name, &req.password)?;
    Ok(token.into_response())
}
