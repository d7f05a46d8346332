use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::SharedState;

mod bookings;
mod images;
mod reviews;
mod session;
mod spots;
mod users;
mod views;

pub fn api() -> Router<SharedState> {
    Router::new()
        .route(
            "/session",
            get(session::restore)
                .post(session::login)
                .delete(session::logout),
        )
        .route("/users", post(users::signup))
        .route("/spots", get(spots::list).post(spots::create))
        .route("/spots/current", get(spots::current))
        .route(
            "/spots/:spot_id",
            get(spots::detail).put(spots::update).delete(spots::remove),
        )
        .route("/spots/:spot_id/images", post(spots::add_image))
        .route("/spots/:spot_id/calendar.ics", get(spots::calendar))
        .route(
            "/spots/:spot_id/reviews",
            get(reviews::for_spot).post(reviews::create),
        )
        .route(
            "/spots/:spot_id/bookings",
            get(bookings::for_spot).post(bookings::create),
        )
        .route("/bookings/current", get(bookings::current))
        .route(
            "/bookings/:booking_id",
            put(bookings::update).delete(bookings::remove),
        )
        .route("/reviews/current", get(reviews::current))
        .route(
            "/reviews/:review_id",
            put(reviews::update).delete(reviews::remove),
        )
        .route("/reviews/:review_id/images", post(reviews::add_image))
        .route("/spot-images/:image_id", delete(images::remove_spot_image))
        .route("/review-images/:image_id", delete(images::remove_review_image))
}
