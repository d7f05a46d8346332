use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{BookingError, ConflictErrors};
use crate::range::DateRange;
use crate::structs::{Booking, BookingId};
use crate::validate::ValidationErrors;

/// Source of "today" for the past-date rule.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, of which only the
/// calendar date is kept.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

pub fn validate_dates(start: &str, end: &str, today: NaiveDate) -> Result<DateRange, BookingError> {
    validate_range(start, end, |start| start >= today)
}

/// Like [`validate_dates`], but a start date left unchanged is exempt from
/// the past-date rule, so a stay in progress can keep its dates or be
/// extended.
pub fn validate_new_dates(
    start: &str,
    end: &str,
    today: NaiveDate,
    current: DateRange,
) -> Result<DateRange, BookingError> {
    validate_range(start, end, |start| start >= today || start == current.start)
}

fn validate_range(
    start: &str,
    end: &str,
    start_allowed: impl Fn(NaiveDate) -> bool,
) -> Result<DateRange, BookingError> {
    let mut errors = ValidationErrors::new();

    let start = match start.trim() {
        "" => {
            errors.add("startDate", "Start date is required");
            None
        }
        raw => parse_date(raw).or_else(|| {
            errors.add("startDate", "Start date must be a valid date");
            None
        }),
    };

    let end = match end.trim() {
        "" => {
            errors.add("endDate", "End date is required");
            None
        }
        raw => parse_date(raw).or_else(|| {
            errors.add("endDate", "End date must be a valid date");
            None
        }),
    };

    let (Some(start), Some(end)) = (start, end) else {
        return Err(errors.into());
    };

    if !start_allowed(start) {
        errors.add("startDate", "startDate cannot be in the past");
    }

    if end <= start {
        errors.add("endDate", "endDate cannot be on or before startDate");
    }

    errors.into_result()?;
    Ok(DateRange::new(start, end))
}

/// Rejects `candidate` if it overlaps any booking in `existing` other than
/// `exclude`.
pub fn check_availability<'a, I>(
    candidate: DateRange,
    existing: I,
    exclude: Option<BookingId>,
) -> Result<(), BookingError>
where
    I: IntoIterator<Item = &'a Booking>,
{
    let conflict = existing
        .into_iter()
        .filter(|booking| Some(booking.id) != exclude)
        .map(Booking::range)
        .filter(|range| candidate.overlaps(*range))
        .fold(None, |acc: Option<ConflictErrors>, range| {
            Some(acc.unwrap_or_default().merge(describe_conflict(candidate, range)))
        });

    match conflict {
        Some(errors) => Err(BookingError::Conflict(errors)),
        None => Ok(()),
    }
}

fn describe_conflict(candidate: DateRange, existing: DateRange) -> ConflictErrors {
    let start = existing.contains(candidate.start);
    let end = existing.start < candidate.end && candidate.end <= existing.end;

    if start || end {
        ConflictErrors { start, end }
    } else {
        ConflictErrors {
            start: true,
            end: true,
        }
    }
}
