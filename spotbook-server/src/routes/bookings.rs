use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use spotbook_core::{Booking, BookingDraft, BookingId, SpotId, UserSummary};

use crate::{
    auth::CurrentUser,
    error::{ApiError, Id, Payload},
    reservations,
    routes::views::{GuestBooking, HostBooking, OccupiedDates, SpotBrief},
    state::SharedState,
};

pub async fn create(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(spot_id): Id<SpotId>,
    Payload(draft): Payload<BookingDraft>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = reservations::create(&state, &user, spot_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// The owner sees who is staying; everyone else only sees occupied dates.
pub async fn for_spot(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(spot_id): Id<SpotId>,
) -> Result<Json<Value>, ApiError> {
    let tables = state.store.read().await;
    let spot = tables
        .spot(spot_id)
        .ok_or(ApiError::NotFound("Spot couldn't be found"))?;
    let bookings = tables.bookings_for_spot(spot_id);

    let body = if spot.owner_id == user.id {
        let bookings = bookings
            .into_iter()
            .map(|booking| HostBooking {
                booking,
                user: tables.user(booking.user_id).map(UserSummary::from),
            })
            .collect::<Vec<_>>();
        json!({ "Bookings": bookings })
    } else {
        let bookings = bookings
            .into_iter()
            .map(OccupiedDates::from)
            .collect::<Vec<_>>();
        json!({ "Bookings": bookings })
    };

    Ok(Json(body))
}

pub async fn current(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    let tables = state.store.read().await;

    let bookings = tables
        .bookings_by_user(user.id)
        .into_iter()
        .map(|booking| GuestBooking {
            booking,
            spot: tables
                .spot(booking.spot_id)
                .map(|spot| SpotBrief::new(&tables, spot)),
        })
        .collect::<Vec<_>>();

    Json(json!({ "Bookings": bookings }))
}

pub async fn update(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(booking_id): Id<BookingId>,
    Payload(draft): Payload<BookingDraft>,
) -> Result<Json<Booking>, ApiError> {
    let booking = reservations::update(&state, &user, booking_id, &draft).await?;
    Ok(Json(booking))
}

pub async fn remove(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(booking_id): Id<BookingId>,
) -> Result<Json<Value>, ApiError> {
    reservations::delete(&state, &user, booking_id).await?;
    Ok(Json(json!({ "message": "Successfully deleted" })))
}
