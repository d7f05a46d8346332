//! Response shapes. They borrow from the store while a read guard is held
//! and are serialized before it is released.

use chrono::NaiveDate;
use serde::Serialize;
use spotbook_core::{Booking, Review, ReviewImage, Spot, SpotId, SpotImage, UserId, UserSummary};

use crate::store::Tables;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSummary<'a> {
    #[serde(flatten)]
    pub spot: &'a Spot,
    pub avg_rating: Option<f64>,
    pub preview_image: Option<&'a str>,
}

impl<'a> SpotSummary<'a> {
    pub fn new(tables: &'a Tables, spot: &'a Spot) -> Self {
        Self {
            spot,
            avg_rating: tables.avg_rating(spot.id),
            preview_image: tables.preview_image(spot.id),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotDetail<'a> {
    #[serde(flatten)]
    pub spot: &'a Spot,
    pub num_reviews: usize,
    pub avg_star_rating: Option<f64>,
    #[serde(rename = "SpotImages")]
    pub spot_images: Vec<&'a SpotImage>,
    #[serde(rename = "Owner")]
    pub owner: Option<UserSummary>,
}

impl<'a> SpotDetail<'a> {
    pub fn new(tables: &'a Tables, spot: &'a Spot) -> Self {
        Self {
            spot,
            num_reviews: tables.num_reviews(spot.id),
            avg_star_rating: tables.avg_rating(spot.id),
            spot_images: tables.spot_images(spot.id),
            owner: tables.user(spot.owner_id).map(UserSummary::from),
        }
    }
}

/// The trimmed spot embedded in a user's bookings and reviews.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotBrief<'a> {
    pub id: SpotId,
    pub owner_id: UserId,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub name: &'a str,
    pub price: f64,
    pub preview_image: Option<&'a str>,
}

impl<'a> SpotBrief<'a> {
    pub fn new(tables: &'a Tables, spot: &'a Spot) -> Self {
        Self {
            id: spot.id,
            owner_id: spot.owner_id,
            address: &spot.address,
            city: &spot.city,
            state: &spot.state,
            country: &spot.country,
            lat: spot.lat,
            lng: spot.lng,
            name: &spot.name,
            price: spot.price,
            preview_image: tables.preview_image(spot.id),
        }
    }
}

#[derive(Serialize)]
pub struct ReviewView<'a> {
    #[serde(flatten)]
    pub review: &'a Review,
    #[serde(rename = "User")]
    pub user: Option<UserSummary>,
    #[serde(rename = "Spot", skip_serializing_if = "Option::is_none")]
    pub spot: Option<SpotBrief<'a>>,
    #[serde(rename = "ReviewImages")]
    pub review_images: Vec<&'a ReviewImage>,
}

impl<'a> ReviewView<'a> {
    pub fn new(tables: &'a Tables, review: &'a Review, with_spot: bool) -> Self {
        let spot = with_spot
            .then(|| tables.spot(review.spot_id))
            .flatten()
            .map(|spot| SpotBrief::new(tables, spot));

        Self {
            review,
            user: tables.user(review.user_id).map(UserSummary::from),
            spot,
            review_images: tables.review_images(review.id),
        }
    }
}

/// A booking as seen by its guest.
#[derive(Serialize)]
pub struct GuestBooking<'a> {
    #[serde(flatten)]
    pub booking: &'a Booking,
    #[serde(rename = "Spot")]
    pub spot: Option<SpotBrief<'a>>,
}

/// A booking as seen by the spot's owner.
#[derive(Serialize)]
pub struct HostBooking<'a> {
    #[serde(flatten)]
    pub booking: &'a Booking,
    #[serde(rename = "User")]
    pub user: Option<UserSummary>,
}

/// A booking as seen by anyone else: only the occupied dates.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedDates {
    pub spot_id: SpotId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Booking> for OccupiedDates {
    fn from(booking: &Booking) -> Self {
        Self {
            spot_id: booking.spot_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
        }
    }
}
