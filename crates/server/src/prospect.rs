//! Lead-prospecting routes.
//!
//! - `POST   /api/v1/prospect`            — generate companies for a sector
//! - `POST   /api/v1/leads`               — save a company as a lead
//! - `GET    /api/v1/leads?owner_id=`     — list an owner's leads
//! - `PATCH  /api/v1/leads/{id}/status`   — move a lead through the pipeline
//! - `PATCH  /api/v1/leads/{id}/notes`    — replace a lead's notes
//! - `DELETE /api/v1/leads/{id}`          — remove a lead
//! - `POST   /api/v1/leads/export`        — download a result set as CSV

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{delete, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use troquey_agent::{CompanySource, LlmError, ProspectError};
use troquey_core::domain::lead::{Company, LeadId, LeadStatus, SavedLead};
use troquey_core::export::{companies_csv, export_filename};
use troquey_db::repositories::{LeadRepository, RepositoryError};

use crate::advisor::ApiError;

#[derive(Clone)]
pub struct ProspectState {
    pub companies: Arc<dyn CompanySource>,
    pub leads: Arc<dyn LeadRepository>,
}

#[derive(Debug, Deserialize)]
pub struct ProspectRequest {
    pub sector: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProspectResponse {
    pub companies: Vec<Company>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLeadRequest {
    pub owner_id: String,
    pub company: Company,
}

#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub sector: String,
    pub companies: Vec<Company>,
}

pub fn router(state: ProspectState) -> Router {
    Router::new()
        .route("/api/v1/prospect", post(search_companies))
        .route("/api/v1/leads", post(save_lead).get(list_leads))
        .route("/api/v1/leads/{id}/status", patch(update_lead_status))
        .route("/api/v1/leads/{id}/notes", patch(update_lead_notes))
        .route("/api/v1/leads/{id}", delete(delete_lead))
        .route("/api/v1/leads/export", post(export_leads))
        .with_state(state)
}

pub async fn search_companies(
    State(state): State<ProspectState>,
    Json(request): Json<ProspectRequest>,
) -> Result<Json<ProspectResponse>, (StatusCode, Json<ApiError>)> {
    let sector = request.sector.trim();
    if sector.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Setor é obrigatório"));
    }

    let companies = state
        .companies
        .search(sector, request.location.as_deref().map(str::trim).filter(|l| !l.is_empty()))
        .await
        .map_err(prospect_error_response)?;

    info!(
        event_name = "prospect.search.completed",
        sector,
        company_count = companies.len(),
        "prospect search completed"
    );

    Ok(Json(ProspectResponse { companies }))
}

pub async fn save_lead(
    State(state): State<ProspectState>,
    Json(request): Json<SaveLeadRequest>,
) -> Result<(StatusCode, Json<SavedLead>), (StatusCode, Json<ApiError>)> {
    let owner_id = request.owner_id.trim();
    if owner_id.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "owner_id é obrigatório"));
    }

    let lead = SavedLead::from_company(
        LeadId(format!("lead-{}", Uuid::new_v4())),
        owner_id,
        &request.company,
    );

    state.leads.save(lead.clone()).await.map_err(lead_error_response)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn list_leads(
    State(state): State<ProspectState>,
    Query(params): Query<LeadListQuery>,
) -> Result<Json<Vec<SavedLead>>, (StatusCode, Json<ApiError>)> {
    state.leads.list_for_owner(&params.owner_id).await.map(Json).map_err(lead_error_response)
}

pub async fn update_lead_status(
    State(state): State<ProspectState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    state
        .leads
        .update_status(&LeadId(id), request.status)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(lead_error_response)
}

pub async fn update_lead_notes(
    State(state): State<ProspectState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    state
        .leads
        .update_notes(&LeadId(id), &request.notes)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(lead_error_response)
}

pub async fn delete_lead(
    State(state): State<ProspectState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    state
        .leads
        .delete(&LeadId(id))
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(lead_error_response)
}

pub async fn export_leads(
    Json(request): Json<ExportRequest>,
) -> Result<(HeaderMap, String), (StatusCode, Json<ApiError>)> {
    let sector = request.sector.trim();
    if sector.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Setor é obrigatório"));
    }

    let csv = companies_csv(&request.companies);
    let filename = export_filename(sector, Utc::now().date_naive());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{filename}\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    Ok((headers, csv))
}

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { error: message.into() }))
}

/// Keep the original gateway contract: 429 and 402 pass through with their
/// consumer-facing messages, everything else is a bad gateway.
fn prospect_error_response(error: ProspectError) -> (StatusCode, Json<ApiError>) {
    match error {
        ProspectError::Llm(LlmError::RateLimited) => api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Limite de requisições excedido. Tente novamente em alguns minutos.",
        ),
        ProspectError::Llm(LlmError::CreditsExhausted) => api_error(
            StatusCode::PAYMENT_REQUIRED,
            "Créditos esgotados. Por favor, adicione créditos à sua conta.",
        ),
        error => {
            warn!(event_name = "prospect.search.failed", error = %error, "prospect search failed");
            api_error(StatusCode::BAD_GATEWAY, "Erro ao buscar empresas")
        }
    }
}

fn lead_error_response(error: RepositoryError) -> (StatusCode, Json<ApiError>) {
    match error {
        RepositoryError::NotFound(detail) => api_error(StatusCode::NOT_FOUND, detail),
        error => {
            warn!(event_name = "prospect.leads.persistence_failed", error = %error, "lead operation failed");
            api_error(StatusCode::SERVICE_UNAVAILABLE, "não foi possível acessar os leads")
        }
    }
}
