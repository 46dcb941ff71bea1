use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Time of day, the date is dropped so that different days fall into the same bucket.
#[must_use]
pub fn time_of_day(timestamp: NaiveDateTime) -> NaiveTime {
    timestamp.time()
}

/// Time of day truncated to the whole hour.
#[must_use]
pub fn hour_of_day(timestamp: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(timestamp.hour(), 0, 0).unwrap_or_default()
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Bucket {
    #[default]
    TimeOfDay,
    Hour,
}

impl Bucket {
    #[must_use]
    pub fn key(self, timestamp: NaiveDateTime) -> NaiveTime {
        match self {
            Self::TimeOfDay => time_of_day(timestamp),
            Self::Hour => hour_of_day(timestamp),
        }
    }
}
