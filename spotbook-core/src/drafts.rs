//! Request payloads and the rule chains that guard them.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::validate::{looks_like_email, present, run_checks, Check, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SpotDraft {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
}

const SPOT_CHECKS: &[Check<SpotDraft>] = &[
    Check::new("address", "Street address is required", |s| present(&s.address)),
    Check::new("city", "City is required", |s| present(&s.city)),
    Check::new("state", "State is required", |s| present(&s.state)),
    Check::new("country", "Country is required", |s| present(&s.country)),
    Check::new("lat", "Latitude is required", |s| s.lat.is_some()),
    Check::new("lat", "Latitude must be within -90 and 90", |s| {
        s.lat.is_some_and(|lat| (-90.0..=90.0).contains(&lat))
    }),
    Check::new("lng", "Longitude is required", |s| s.lng.is_some()),
    Check::new("lng", "Longitude must be within -180 and 180", |s| {
        s.lng.is_some_and(|lng| (-180.0..=180.0).contains(&lng))
    }),
    Check::new("name", "Name is required", |s| present(&s.name)),
    Check::new("name", "Name must be less than 50 characters", |s| {
        s.name.trim().chars().count() < 50
    }),
    Check::new("description", "Description is required", |s| {
        present(&s.description)
    }),
    Check::new("price", "Price per day is required", |s| s.price.is_some()),
    Check::new("price", "Price per day must be a positive number", |s| {
        s.price.is_some_and(|price| price.is_finite() && price >= 0.0)
    }),
];

impl SpotDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_checks(self, SPOT_CHECKS)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReviewDraft {
    pub review: String,
    pub stars: Option<f64>,
}

const REVIEW_CHECKS: &[Check<ReviewDraft>] = &[
    Check::new("review", "Review text is required", |r| present(&r.review)),
    Check::new("stars", "Stars must be an integer from 1 to 5", |r| {
        r.stars
            .is_some_and(|stars| stars.fract() == 0.0 && (1.0..=5.0).contains(&stars))
    }),
];

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_checks(self, REVIEW_CHECKS)
    }

    /// Only meaningful after `validate` succeeded.
    pub fn stars(&self) -> u8 {
        self.stars.map_or(0, |stars| stars as u8)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SignupDraft {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

const SIGNUP_CHECKS: &[Check<SignupDraft>] = &[
    Check::new("email", "Invalid email", |u| looks_like_email(u.email.trim())),
    Check::new("username", "Username is required", |u| present(&u.username)),
    Check::new(
        "username",
        "Please provide a username with at least 4 characters.",
        |u| u.username.trim().chars().count() >= 4,
    ),
    Check::new("username", "Username cannot be an email.", |u| {
        !looks_like_email(u.username.trim())
    }),
    Check::new("password", "Password is required", |u| present(&u.password)),
    Check::new("password", "Password must be 6 characters or more.", |u| {
        u.password.chars().count() >= 6
    }),
    Check::new("firstName", "First Name is required", |u| {
        present(&u.first_name)
    }),
    Check::new("lastName", "Last Name is required", |u| present(&u.last_name)),
];

impl SignupDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_checks(self, SIGNUP_CHECKS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoginDraft {
    pub credential: String,
    pub password: String,
}

const LOGIN_CHECKS: &[Check<LoginDraft>] = &[
    Check::new("credential", "Email or username is required", |l| {
        present(&l.credential)
    }),
    Check::new("password", "Password is required", |l| present(&l.password)),
];

impl LoginDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_checks(self, LOGIN_CHECKS)
    }
}

/// Dates stay as strings until `booking::validate_dates` has looked at them,
/// so a malformed date is a field error rather than a rejected payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct BookingDraft {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImageDraft {
    pub url: String,
    pub preview: bool,
}

const IMAGE_CHECKS: &[Check<ImageDraft>] = &[Check::new("url", "Image url is required", |i| {
    present(&i.url)
})];

impl ImageDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        run_checks(self, IMAGE_CHECKS)
    }
}
