use chrono::{DateTime, NaiveDate, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::range::DateRange;

pub type UserId = u32;
pub type SpotId = u32;
pub type SpotImageId = u32;
pub type ReviewId = u32;
pub type ReviewImageId = u32;
pub type BookingId = u32;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

/// The public face of a user attached to spots, reviews and bookings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UserSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Spot {
    pub id: SpotId,
    pub owner_id: UserId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SpotImage {
    pub id: SpotImageId,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub spot_id: SpotId,
    pub url: String,
    pub preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub spot_id: SpotId,
    pub review: String,
    pub stars: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ReviewImage {
    pub id: ReviewImageId,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub review_id: ReviewId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Booking {
    pub id: BookingId,
    pub spot_id: SpotId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn has_started(&self, today: NaiveDate) -> bool {
        self.start_date <= today
    }

    /// A booking stays editable through its check-out day.
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}
