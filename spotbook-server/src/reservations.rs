//! Booking writes. Each one runs under the spot's lock so the availability
//! check and the write it guards happen as a unit.

use chrono::Utc;
use spotbook_core::{
    check_availability, validate_dates, validate_new_dates, Booking, BookingDraft, BookingError,
    BookingId, SpotId, User, UserId,
};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

use crate::{error::ApiError, state::AppState};

const SPOT_NOT_FOUND: &str = "Spot couldn't be found";
const BOOKING_NOT_FOUND: &str = "Booking couldn't be found";

fn log_rejection(err: &BookingError, spot_id: SpotId, user_id: UserId) {
    match err {
        BookingError::Validation(errors) => {
            info!(spot_id, user_id, %errors, "booking rejected")
        }
        BookingError::Conflict(_) => warn!(spot_id, user_id, "booking conflicts with existing stay"),
    }
}

pub async fn create(
    state: &AppState,
    user: &User,
    spot_id: SpotId,
    draft: &BookingDraft,
) -> Result<Booking, ApiError> {
    let range = validate_dates(&draft.start_date, &draft.end_date, state.clock.today())
        .inspect_err(|err| log_rejection(err, spot_id, user.id))?;

    let owner_id = state
        .store
        .read()
        .await
        .spot(spot_id)
        .map(|spot| spot.owner_id)
        .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;

    if owner_id == user.id {
        return Err(ApiError::Forbidden("You cannot book your own spot"));
    }

    let _guard = state.spot_locks.acquire(spot_id).await;

    {
        let tables = state.store.read().await;
        check_availability(range, tables.bookings_for_spot(spot_id), None)
            .inspect_err(|err| log_rejection(err, spot_id, user.id))?;
    }

    let booking = state
        .store
        .write()
        .await
        .insert_booking(spot_id, user.id, range, Utc::now())
        .ok_or(ApiError::NotFound(SPOT_NOT_FOUND))?;

    state.calendars.invalidate(&spot_id).await;

    info!(
        booking_id = booking.id,
        spot_id,
        user_id = user.id,
        range = ?range,
        "booking created"
    );

    Ok(booking)
}

/// Takes the lock of the booking's spot and returns the booking as it
/// stands under that lock.
async fn locked_booking(
    state: &AppState,
    booking_id: BookingId,
) -> Result<(OwnedMutexGuard<()>, Booking), ApiError> {
    let spot_id = state
        .store
        .read()
        .await
        .booking(booking_id)
        .map(|booking| booking.spot_id)
        .ok_or(ApiError::NotFound(BOOKING_NOT_FOUND))?;

    let guard = state.spot_locks.acquire(spot_id).await;

    let booking = state
        .store
        .read()
        .await
        .booking(booking_id)
        .cloned()
        .ok_or(ApiError::NotFound(BOOKING_NOT_FOUND))?;

    Ok((guard, booking))
}

pub async fn update(
    state: &AppState,
    user: &User,
    booking_id: BookingId,
    draft: &BookingDraft,
) -> Result<Booking, ApiError> {
    let today = state.clock.today();
    let (_guard, existing) = locked_booking(state, booking_id).await?;

    if existing.user_id != user.id {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    if existing.has_ended(today) {
        return Err(ApiError::BadRequest("Past bookings can't be modified"));
    }

    let spot_id = existing.spot_id;
    let range = validate_new_dates(&draft.start_date, &draft.end_date, today, existing.range())
        .inspect_err(|err| log_rejection(err, spot_id, user.id))?;

    {
        let tables = state.store.read().await;
        check_availability(range, tables.bookings_for_spot(spot_id), Some(booking_id))
            .inspect_err(|err| log_rejection(err, spot_id, user.id))?;
    }

    let booking = state
        .store
        .write()
        .await
        .update_booking(booking_id, range, Utc::now())
        .ok_or(ApiError::NotFound(BOOKING_NOT_FOUND))?;

    state.calendars.invalidate(&spot_id).await;

    info!(booking_id, spot_id, range = ?range, "booking updated");

    Ok(booking)
}

/// The guest or the spot's owner may cancel, as long as the stay has not
/// begun.
pub async fn delete(state: &AppState, user: &User, booking_id: BookingId) -> Result<(), ApiError> {
    let (_guard, booking) = locked_booking(state, booking_id).await?;

    let owner_id = state
        .store
        .read()
        .await
        .spot(booking.spot_id)
        .map(|spot| spot.owner_id);

    if booking.user_id != user.id && owner_id != Some(user.id) {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    if booking.has_started(state.clock.today()) {
        return Err(ApiError::Forbidden(
            "Bookings that have been started can't be deleted",
        ));
    }

    state
        .store
        .write()
        .await
        .delete_booking(booking_id)
        .ok_or(ApiError::NotFound(BOOKING_NOT_FOUND))?;

    state.calendars.invalidate(&booking.spot_id).await;

    info!(booking_id, spot_id = booking.spot_id, "booking deleted");

    Ok(())
}
