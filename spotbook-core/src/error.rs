use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::validate::ValidationErrors;

pub const CONFLICT_MESSAGE: &str = "Sorry, this spot is already booked for the specified dates";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Bad Request")]
    Validation(ValidationErrors),

    #[error("{}", CONFLICT_MESSAGE)]
    Conflict(ConflictErrors),
}

/// Which side of the requested stay collides with an existing booking. A
/// request that swallows a booking whole is reported on both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ConflictErrors {
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "startDate",
            skip_serializing_if = "std::ops::Not::not",
            serialize_with = "start_message"
        )
    )]
    pub start: bool,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "endDate",
            skip_serializing_if = "std::ops::Not::not",
            serialize_with = "end_message"
        )
    )]
    pub end: bool,
}

pub const START_CONFLICT_MESSAGE: &str = "Start date conflicts with an existing booking";
pub const END_CONFLICT_MESSAGE: &str = "End date conflicts with an existing booking";

#[cfg(feature = "serde")]
fn start_message<S: serde::Serializer>(_: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(START_CONFLICT_MESSAGE)
}

#[cfg(feature = "serde")]
fn end_message<S: serde::Serializer>(_: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(END_CONFLICT_MESSAGE)
}

impl ConflictErrors {
    pub fn merge(self, other: ConflictErrors) -> Self {
        Self {
            start: self.start || other.start,
            end: self.end || other.end,
        }
    }
}

impl From<ValidationErrors> for BookingError {
    fn from(errors: ValidationErrors) -> Self {
        BookingError::Validation(errors)
    }
}
