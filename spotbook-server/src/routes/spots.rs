use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use spotbook_core::{spot_calendar, Booking, ImageDraft, Spot, SpotDraft, SpotId, UserId};
use tracing::info;

use crate::{
    auth::CurrentUser,
    error::{ApiError, Id, Payload},
    routes::views::{SpotDetail, SpotSummary},
    state::SharedState,
};

const SPOT_NOT_FOUND: &str = "Spot couldn't be found";

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_SIZE: u32 = 20;
const MAX_PRICE: f64 = 10_000_000.0;

/// Raw listing filters. Anything unparseable or out of range falls back to
/// the widest value instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    page: Option<String>,
    size: Option<String>,
    min_lat: Option<String>,
    max_lat: Option<String>,
    min_lng: Option<String>,
    max_lng: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filters {
    pub page: u32,
    pub size: u32,
    pub lat: (f64, f64),
    pub lng: (f64, f64),
    pub price: (f64, f64),
}

fn number(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn count(raw: &Option<String>, default: u32) -> u32 {
    raw.as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

impl From<&ListQuery> for Filters {
    fn from(query: &ListQuery) -> Self {
        let lower = |raw: &Option<String>, floor: f64| {
            number(raw).filter(|value| *value >= floor).unwrap_or(floor)
        };
        let upper = |raw: &Option<String>, ceiling: f64| {
            number(raw)
                .filter(|value| *value <= ceiling)
                .unwrap_or(ceiling)
        };

        Self {
            page: count(&query.page, DEFAULT_PAGE),
            size: count(&query.size, DEFAULT_SIZE),
            lat: (lower(&query.min_lat, -90.0), upper(&query.max_lat, 90.0)),
            lng: (lower(&query.min_lng, -180.0), upper(&query.max_lng, 180.0)),
            price: (
                lower(&query.min_price, 0.0),
                number(&query.max_price)
                    .filter(|value| *value >= 0.0)
                    .unwrap_or(MAX_PRICE),
            ),
        }
    }
}

impl Filters {
    pub fn matches(&self, spot: &Spot) -> bool {
        let within = |(low, high): (f64, f64), value: f64| low <= value && value <= high;

        within(self.lat, spot.lat) && within(self.lng, spot.lng) && within(self.price, spot.price)
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1) * self.size as usize
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let filters = Filters::from(&query);
    let tables = state.store.read().await;

    let spots = tables
        .spots()
        .filter(|spot| filters.matches(spot))
        .skip(filters.offset())
        .take(filters.size as usize)
        .map(|spot| SpotSummary::new(&tables, spot))
        .collect::<Vec<_>>();

    Json(json!({
        "Spots": spots,
        "page": filters.page,
        "size": filters.size,
    }))
}

pub async fn current(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    let tables = state.store.read().await;

    let spots = tables
        .spots()
        .filter(|spot| spot.owner_id == user.id)
        .map(|spot| SpotSummary::new(&tables, spot))
        .collect::<Vec<_>>();

    Json(json!({ "Spots": spots }))
}

pub async fn detail(
    State(state): State<SharedState>,
    Id(spot_id): Id<SpotId>,
) -> Result<Json<Value>, ApiError> {
    let tables = state.store.read().await;
    let spot = tables
        .spot(spot_id)
        .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;

    Ok(Json(json!(SpotDetail::new(&tables, spot))))
}

pub async fn create(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Payload(draft): Payload<SpotDraft>,
) -> Result<(StatusCode, Json<Spot>), ApiError> {
    draft.validate()?;

    let spot = state
        .store
        .write()
        .await
        .insert_spot(user.id, &draft, Utc::now());

    info!(spot_id = spot.id, owner_id = user.id, "spot created");

    Ok((StatusCode::CREATED, Json(spot)))
}

async fn owned_spot(state: &SharedState, spot_id: SpotId, user_id: UserId) -> Result<(), ApiError> {
    let tables = state.store.read().await;
    let spot = tables
        .spot(spot_id)
        .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;

    if spot.owner_id != user_id {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    Ok(())
}

pub async fn update(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(spot_id): Id<SpotId>,
    Payload(draft): Payload<SpotDraft>,
) -> Result<Json<Spot>, ApiError> {
    owned_spot(&state, spot_id, user.id).await?;
    draft.validate()?;

    let spot = state
        .store
        .write()
        .await
        .update_spot(spot_id, &draft, Utc::now())
        .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;

    state.calendars.invalidate(&spot_id).await;

    Ok(Json(spot))
}

pub async fn remove(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(spot_id): Id<SpotId>,
) -> Result<Json<Value>, ApiError> {
    owned_spot(&state, spot_id, user.id).await?;

    {
        let _guard = state.spot_locks.acquire(spot_id).await;
        state
            .store
            .write()
            .await
            .delete_spot(spot_id)
            .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;
        state.calendars.invalidate(&spot_id).await;
    }
    state.spot_locks.forget(spot_id).await;

    info!(spot_id, "spot deleted");

    Ok(Json(json!({ "message": "Successfully deleted" })))
}

pub async fn add_image(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(spot_id): Id<SpotId>,
    Payload(draft): Payload<ImageDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    owned_spot(&state, spot_id, user.id).await?;
    draft.validate()?;

    let image = state
        .store
        .write()
        .await
        .insert_spot_image(spot_id, &draft);

    Ok((StatusCode::CREATED, Json(json!(image))))
}

/// Occupancy as iCalendar. Rendering runs under the spot lock so a booking
/// write cannot slip in between rendering and caching.
pub async fn calendar(
    State(state): State<SharedState>,
    Id(spot_id): Id<SpotId>,
) -> Result<Response, ApiError> {
    if let Some(ics) = state.calendars.get(&spot_id).await {
        return Ok(ics_response(&ics));
    }

    if state.store.read().await.spot(spot_id).is_none() {
        return Err(ApiError::NotFound(SPOT_NOT_FOUND));
    }

    let _guard = state.spot_locks.acquire(spot_id).await;

    let rendered = {
        let tables = state.store.read().await;
        let spot = tables
            .spot(spot_id)
            .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;
        let bookings = tables
            .bookings_for_spot(spot_id)
            .into_iter()
            .cloned()
            .collect::<Vec<Booking>>();

        spot_calendar(spot, &bookings).to_string()
    };

    let ics = Arc::clone(&state.calendars).insert(spot_id, rendered).await;

    Ok(ics_response(&ics))
}

fn ics_response(ics: &str) -> Response {
    ([(CONTENT_TYPE, "text/calendar")], ics.to_string()).into_response()
}
