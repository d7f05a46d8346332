use std::fmt::{self, Debug, Formatter};

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A stay of consecutive nights. `start` is the check-in day and `end` the
/// check-out day, so the range is half-open: a guest leaving on the 5th does
/// not collide with a guest arriving on the 5th.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DateRange {
    /// Inclusive.
    pub start: NaiveDate,

    /// Exclusive.
    pub end: NaiveDate,
}

impl Debug for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    pub fn nights(self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        (self.start <= date) && (date < self.end)
    }

    pub fn overlaps(self, other: DateRange) -> bool {
        (self.start < other.end) && (other.start < self.end)
    }
}

pub fn has_conflict<I>(candidate: DateRange, existing: I) -> bool
where
    I: IntoIterator<Item = DateRange>,
{
    existing.into_iter().any(|range| candidate.overlaps(range))
}
