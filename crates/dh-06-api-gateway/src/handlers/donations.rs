//! `/api/donations` routes.

use crate::domain::error::ApiError;
use crate::extract::{parse_id, ApiJson, ApiPath, ApiQuery, Caller};
use crate::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dh_01_entity_store::NearbyDonation;
use dh_03_donation_lifecycle::{DonationFilter, NewDonation};
use dh_04_matching_query::NearbyParams;
use hub_telemetry::{DONATIONS_CREATED, DONATION_TRANSITIONS, NEARBY_QUERIES};
use serde::{Deserialize, Serialize};
use shared_types::{Donation, DonationId, DonationStatus};

#[derive(Debug, Serialize)]
pub struct DonationList<T> {
    pub donations: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Raw text so a bad number becomes a named validation error.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    pub lon: Option<String>,
    pub lat: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusBody {
    pub status: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Caller(donor): Caller,
    ApiJson(fields): ApiJson<NewDonation>,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    let donation = state
        .lifecycle
        .create(&donor, fields, state.deadline())
        .await?;
    DONATIONS_CREATED.inc();
    Ok((StatusCode::CREATED, Json(donation)))
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<DonationList<Donation>>, ApiError> {
    let filter = DonationFilter::parse(params.status.as_deref(), params.category.as_deref())?;
    let donations = state.lifecycle.list(filter, state.deadline()).await?;
    Ok(Json(DonationList { donations }))
}

pub async fn nearby(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> Result<Json<DonationList<NearbyDonation>>, ApiError> {
    let params = NearbyParams::parse(
        query.lon.as_deref(),
        query.lat.as_deref(),
        query.radius.as_deref(),
    )?;
    let donations = state
        .matching
        .find_nearby_params(params, state.deadline())
        .await?;
    NEARBY_QUERIES.inc();
    Ok(Json(DonationList { donations }))
}

pub async fn mine(
    State(state): State<AppState>,
    Caller(donor): Caller,
) -> Result<Json<DonationList<Donation>>, ApiError> {
    let donations = state
        .lifecycle
        .list_for_donor(donor.id, state.deadline())
        .await?;
    Ok(Json(DonationList { donations }))
}

pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(raw_id): ApiPath<String>,
) -> Result<Json<Donation>, ApiError> {
    let id: DonationId = parse_id(&raw_id, "donation")?;
    Ok(Json(state.lifecycle.get(id, state.deadline()).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(raw_id): ApiPath<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Donation>, ApiError> {
    let id: DonationId = parse_id(&raw_id, "donation")?;
    let to: DonationStatus = body
        .status
        .as_deref()
        .ok_or_else(|| ApiError::validation("status is required"))?
        .parse()
        .map_err(|e: shared_types::ParseEnumError| ApiError::validation(e.to_string()))?;

    let donation = state
        .lifecycle
        .transition(id, to, &actor, state.deadline())
        .await?;
    DONATION_TRANSITIONS.with_label_values(&[to.as_str()]).inc();
    Ok(Json(donation))
}
