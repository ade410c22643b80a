//! `/api/volunteers` routes.

use crate::domain::error::ApiError;
use crate::extract::{parse_id, ApiJson, ApiPath, Caller};
use crate::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use dh_05_volunteer_workflow::{RequestDetails, StatusChange, WorkflowError};
use hub_telemetry::{REQUEST_TRANSITIONS, VOLUNTEER_REQUESTS};
use serde::{Deserialize, Serialize};
use shared_types::{DonationId, ParseEnumError, RequestId, RequestStatus, VolunteerRequest};

#[derive(Debug, Serialize)]
pub struct RequestList {
    pub requests: Vec<VolunteerRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub donation_id: Option<String>,
    #[serde(flatten)]
    pub details: RequestDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestStatusBody {
    pub status: Option<String>,
    pub collection_date: Option<DateTime<Utc>>,
    pub beneficiary_count: Option<i64>,
}

impl RequestStatusBody {
    fn into_change(self) -> Result<StatusChange, ApiError> {
        let status: RequestStatus = self
            .status
            .as_deref()
            .ok_or_else(|| ApiError::validation("status is required"))?
            .parse()
            .map_err(|e: ParseEnumError| ApiError::validation(e.to_string()))?;
        Ok(StatusChange {
            status,
            collection_date: self.collection_date,
            beneficiary_count: self.beneficiary_count,
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    Caller(volunteer): Caller,
    ApiJson(body): ApiJson<CreateRequestBody>,
) -> Result<(StatusCode, Json<VolunteerRequest>), ApiError> {
    let raw = body
        .donation_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("donationId is required"))?;
    let donation: DonationId = parse_id(raw, "donation")?;

    match state
        .workflow
        .create(donation, &volunteer, body.details, state.deadline())
        .await
    {
        Ok(request) => {
            VOLUNTEER_REQUESTS.with_label_values(&["created"]).inc();
            Ok((StatusCode::CREATED, Json(request)))
        }
        Err(err) => {
            let outcome = match err {
                WorkflowError::DuplicateRequest { .. } => "duplicate",
                _ => "rejected",
            };
            VOLUNTEER_REQUESTS.with_label_values(&[outcome]).inc();
            Err(err.into())
        }
    }
}

pub async fn my_requests(
    State(state): State<AppState>,
    Caller(volunteer): Caller,
) -> Result<Json<RequestList>, ApiError> {
    let requests = state
        .workflow
        .list_for_volunteer(volunteer.id, state.deadline())
        .await?;
    Ok(Json(RequestList { requests }))
}

pub async fn incoming_requests(
    State(state): State<AppState>,
    Caller(donor): Caller,
) -> Result<Json<RequestList>, ApiError> {
    let requests = state
        .workflow
        .list_for_donor(donor.id, state.deadline())
        .await?;
    Ok(Json(RequestList { requests }))
}

pub async fn get_one(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(raw_id): ApiPath<String>,
) -> Result<Json<VolunteerRequest>, ApiError> {
    let id: RequestId = parse_id(&raw_id, "request")?;
    Ok(Json(state.workflow.get(id, &actor, state.deadline()).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(raw_id): ApiPath<String>,
    ApiJson(body): ApiJson<RequestStatusBody>,
) -> Result<Json<VolunteerRequest>, ApiError> {
    let id: RequestId = parse_id(&raw_id, "request")?;
    let change = body.into_change()?;
    let to = change.status;

    let request = state
        .workflow
        .update_status(id, change, &actor, state.deadline())
        .await?;
    REQUEST_TRANSITIONS.with_label_values(&[to.as_str()]).inc();
    Ok(Json(request))
}
