use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::billing::{self, SeatCounter, Subscription, SubscriptionCheck, SubscriptionProduct, SubscriptionUpdate};
use crate::demo::{self, DemoSeed};
use crate::devex::{self, RateChange};
use crate::engine::IngestionSummary;
use crate::metrics::{self, DashboardSummary, MonthlyMetrics, WeeklyReport};
use crate::models::{RawRow, Upload};
use crate::server::auth::AuthenticatedUser;
use crate::server::{AppError, AppState};
use crate::types::DevexRate;

const DEFAULT_FILENAME: &str = "unknown.csv";
const DEFAULT_TOP_ITEMS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ProcessCsvRequest {
    #[serde(rename = "csvData")]
    pub csv_data: Vec<Value>,
    #[serde(default)]
    pub filename: Option<String>
}

#[derive(Debug, Serialize)]
pub struct ProcessCsvResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub summary: IngestionSummary
}

pub async fn process_csv(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    payload: Result<Json<ProcessCsvRequest>, JsonRejection>
) -> Result<Json<ProcessCsvResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected CSV payload from user {user_id}: {rejection}");

        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
            _ => AppError::InvalidCsvData
        }
    })?;

    if state.config.require_subscription {
        let check = billing::check_subscription(&*state.storage, user_id, Utc::now());

        if !check.gate().can_upload() {
            return Err(AppError::SubscriptionRequired);
        }
    }

    let filename = request.filename
        .filter(|filename| !filename.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let rows: Vec<RawRow> = request.csv_data.into_iter().map(RawRow::from).collect();

    info!("Processing {} rows from '{filename}' for user {user_id}", rows.len());

    let coordinator = state.coordinator.clone();
    let summary = spawn_blocking(move || coordinator.process(user_id, &filename, &rows))
        .await
        .map_err(|error| AppError::Internal(error.to_string()))??;

    Ok(Json(ProcessCsvResponse {
        message: "CSV processed successfully",
        summary
    }))
}

pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>
) -> Json<Vec<Upload>> {
    Json(state.storage.uploads_for_user(user_id))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub top: Option<usize>
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub monthly: Vec<MonthlyMetrics>
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Query(query): Query<DashboardQuery>
) -> Json<DashboardResponse> {
    let transactions = state.storage.transactions_for_user(user_id);

    Json(DashboardResponse {
        summary: metrics::summarize(&transactions, query.top.unwrap_or(DEFAULT_TOP_ITEMS)),
        monthly: metrics::monthly_rollup(&transactions)
    })
}

pub async fn weekly_report(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>
) -> Json<WeeklyReport> {
    let transactions = state.storage.transactions_for_user(user_id);

    Json(metrics::weekly_report(&transactions, Utc::now().date_naive()))
}

pub async fn check_subscription(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>
) -> Json<SubscriptionCheck> {
    Json(billing::check_subscription(&*state.storage, user_id, Utc::now()))
}

#[derive(Debug, Serialize)]
pub struct SeedDemoResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub seed: DemoSeed
}

pub async fn seed_demo(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>
) -> Result<Json<SeedDemoResponse>, AppError> {
    let seed = demo::seed_demo(&*state.storage, user_id, state.config.marketplace_cut, Utc::now(), &mut rand::thread_rng())?;

    Ok(Json(SeedDemoResponse {
        success: true,
        message: "Demo data created successfully",
        seed
    }))
}

pub async fn seat_counter(State(state): State<Arc<AppState>>) -> Json<SeatCounter> {
    Json(billing::seat_counter(&*state.storage, state.config.early_bird_seats))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct DevexRateRequest {
    pub rate: DevexRate
}

pub async fn update_devex_rate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DevexRateRequest>, JsonRejection>
) -> Result<Json<RateChange>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    Ok(Json(devex::update_rate(&*state.storage, request.rate, Utc::now())?))
}

pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscriptionUpdate>, JsonRejection>
) -> Result<Json<Subscription>, AppError> {
    let Json(update) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let existing = state.storage.subscription_for_user(update.user_id);
    let subscription = update.apply(existing, Utc::now());

    info!("Subscription for user {} is now {:?} on '{}'", subscription.user_id, subscription.status, subscription.product_id);

    state.storage.save_subscription(subscription.clone());

    Ok(Json(subscription))
}

pub async fn save_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscriptionProduct>, JsonRejection>
) -> Result<Json<SubscriptionProduct>, AppError> {
    let Json(product) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    state.storage.save_product(product.clone());

    Ok(Json(product))
}

pub async fn purge_demo(State(state): State<Arc<AppState>>) -> Json<Value> {
    let purged = demo::purge_expired_demo(&*state.storage, Utc::now());

    Json(json!({ "purged": purged }))
}
