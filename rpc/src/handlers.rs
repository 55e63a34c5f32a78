//! RPC request/response types and axum handlers.
//!
//! Caller identities arrive as plain strings and are validated here. Bodies,
//! query strings and path segments go through the [`crate::extract`]
//! wrappers, so malformed input of any kind is a 400 with the usual error
//! body.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use surety_node::{AirlineStatus, ProposalView, RegistryStatus};
use surety_registry::{AdmissionOutcome, FundingReceipt};
use surety_types::{AccountAddress, FundAmount};

use crate::error::RpcError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::pagination::{PaginationMeta, PaginationParams};
use crate::server::RpcState;

fn parse_address(raw: &str) -> Result<AccountAddress, RpcError> {
    Ok(AccountAddress::parse(raw)?)
}

fn parse_amount(raw: &str) -> Result<FundAmount, RpcError> {
    raw.trim()
        .parse::<u128>()
        .map(FundAmount::new)
        .map_err(|e| RpcError::InvalidRequest(format!("invalid amount {raw:?}: {e}")))
}

// ── Status ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationalResponse {
    pub operational: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub operational: bool,
    pub caller: String,
}

pub async fn get_status(State(state): State<Arc<RpcState>>) -> Json<RegistryStatus> {
    Json(state.service.registry_status().await)
}

pub async fn set_status(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<SetStatusRequest>,
) -> Result<Json<OperationalResponse>, RpcError> {
    let caller = parse_address(&req.caller)?;
    state
        .service
        .set_operating_status(req.operational, &caller)
        .await?;
    Ok(Json(OperationalResponse {
        operational: state.service.is_operational().await,
    }))
}

// ── Caller allowlist ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CallerRequest {
    pub app: String,
    pub caller: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallerResponse {
    pub app: AccountAddress,
    pub authorized: bool,
}

pub async fn authorize_caller(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<CallerRequest>,
) -> Result<Json<CallerResponse>, RpcError> {
    let app = parse_address(&req.app)?;
    let caller = parse_address(&req.caller)?;
    state.service.authorize_caller(&app, &caller).await?;
    Ok(Json(CallerResponse {
        app,
        authorized: true,
    }))
}

pub async fn deauthorize_caller(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<CallerRequest>,
) -> Result<Json<CallerResponse>, RpcError> {
    let app = parse_address(&req.app)?;
    let caller = parse_address(&req.caller)?;
    state.service.deauthorize_caller(&app, &caller).await?;
    Ok(Json(CallerResponse {
        app,
        authorized: false,
    }))
}

// ── Funding ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FundRequest {
    /// The contributing airline.
    pub airline: String,
    /// Raw amount as a decimal string (1 unit = 10^18 raw).
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FundResponse {
    pub airline: AccountAddress,
    #[serde(with = "surety_types::amount::decimal")]
    pub amount: FundAmount,
    #[serde(with = "surety_types::amount::decimal")]
    pub contributed: FundAmount,
    pub first_funding: bool,
}

pub async fn fund(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<FundRequest>,
) -> Result<Json<FundResponse>, RpcError> {
    let airline = parse_address(&req.airline)?;
    let amount = parse_amount(&req.amount)?;
    let FundingReceipt {
        amount,
        contributed,
        first_funding,
    } = state.service.fund(&airline, amount).await?;
    Ok(Json(FundResponse {
        airline,
        amount,
        contributed,
        first_funding,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EscrowResponse {
    #[serde(with = "surety_types::amount::decimal")]
    pub total_escrowed: FundAmount,
}

pub async fn escrow(State(state): State<Arc<RpcState>>) -> Json<EscrowResponse> {
    Json(EscrowResponse {
        total_escrowed: state.service.total_escrowed().await,
    })
}

// ── Admission ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub candidate: String,
    /// The registered, funded airline making the call.
    pub sponsor: String,
}

pub async fn register(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<AdmissionOutcome>, RpcError> {
    let candidate = parse_address(&req.candidate)?;
    let sponsor = parse_address(&req.sponsor)?;
    let outcome = state
        .service
        .register_candidate(&candidate, &sponsor)
        .await?;
    Ok(Json(outcome))
}

pub async fn airline(
    State(state): State<Arc<RpcState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<AirlineStatus>, RpcError> {
    let airline = parse_address(&id)?;
    Ok(Json(state.service.airline(&airline).await))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub registered_count: u64,
}

pub async fn airline_count(State(state): State<Arc<RpcState>>) -> Json<CountResponse> {
    Json(CountResponse {
        registered_count: state.service.registered_count().await,
    })
}

#[derive(Debug, Serialize)]
pub struct ProposalsResponse {
    pub proposals: Vec<ProposalView>,
    #[serde(flatten)]
    pub pagination: PaginationMeta,
}

pub async fn proposals(
    State(state): State<Arc<RpcState>>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Json<ProposalsResponse> {
    let all = state.service.pending_proposals().await;
    let (proposals, pagination) = params.page(all, |p| p.sequence);
    Json(ProposalsResponse {
        proposals,
        pagination,
    })
}

// ── Metrics ──────────────────────────────────────────────────────────────

pub async fn metrics(State(state): State<Arc<RpcState>>) -> Result<impl IntoResponse, RpcError> {
    if !state.enable_metrics {
        return Err(RpcError::MetricsDisabled);
    }
    let text = state.service.metrics_text()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    ))
}
