mod booking;
mod drafts;
mod error;
mod range;
mod structs;
mod validate;

#[cfg(feature = "ics")]
mod ics;

pub use booking::{
    check_availability, parse_date, validate_dates, validate_new_dates, Clock, FixedClock,
    SystemClock,
};
pub use drafts::{BookingDraft, ImageDraft, LoginDraft, ReviewDraft, SignupDraft, SpotDraft};
pub use error::{
    BookingError, ConflictErrors, CONFLICT_MESSAGE, END_CONFLICT_MESSAGE, START_CONFLICT_MESSAGE,
};
pub use range::{has_conflict, DateRange};
pub use structs::{
    Booking, BookingId, Review, ReviewId, ReviewImage, ReviewImageId, Spot, SpotId, SpotImage,
    SpotImageId, User, UserId, UserSummary,
};
pub use validate::{looks_like_email, present, run_checks, Check, ValidationErrors};

#[cfg(feature = "ics")]
pub use ics::{booking_event, spot_calendar};
