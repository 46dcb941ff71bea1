use std::{
    fmt::{Debug, Display, Formatter},
    iter,
    num::NonZeroU32,
};

use chrono::{Days, NaiveDate};

use crate::error::Error;

/// Calendar date range, inclusive on both ends.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl Debug for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl DateRange {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Number of calendar days covered, always at least one.
    #[must_use]
    pub fn n_days(self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Split the range into consecutive sub-windows of at most `max_days` days each.
    ///
    /// The sub-windows cover the range exactly: no gaps, no overlaps.
    pub fn windows(self, max_days: NonZeroU32) -> impl Iterator<Item = Self> {
        let span = Days::new(u64::from(max_days.get()) - 1);
        let mut next_start = Some(self.start);
        iter::from_fn(move || {
            let start = next_start.filter(|start| *start <= self.end)?;
            let end = start.checked_add_days(span).map_or(self.end, |end| end.min(self.end));
            next_start = end.succ_opt();
            Some(Self { start, end })
        })
    }

    /// Deterministic artifact file name: `YYYY-MM-DD.json` for a single day,
    /// `YYYY-MM-DD_YYYY-MM-DD.json` otherwise.
    #[must_use]
    pub fn file_name(self) -> String {
        if self.start == self.end {
            format!("{}.json", self.start.format("%Y-%m-%d"))
        } else {
            format!("{}_{}.json", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
        }
    }
}
