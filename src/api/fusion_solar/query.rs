use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_with::serde_as;

use crate::prelude::*;

/// Query of the daily energy balance view, exactly as the dashboard sends it.
#[serde_as]
#[derive(Serialize)]
pub struct EnergyBalanceQuery<'a> {
    #[serde(rename = "stationDn")]
    station_dn: &'a str,

    /// `2` is the daily view with the five-minute resolution.
    #[serde(rename = "timeDim")]
    time_dimension: u8,

    /// Offset in hours, always with the decimal part: `7.0`.
    #[serde(rename = "timeZone")]
    utc_offset_hours: String,

    #[serde(rename = "timeZoneStr")]
    time_zone: &'a str,

    /// Local midnight of the requested day.
    #[serde_as(as = "serde_with::TimestampMilliSeconds<i64>")]
    #[serde(rename = "queryTime")]
    query_time: DateTime<Utc>,

    #[serde(rename = "dateStr")]
    date: String,

    /// Cache buster.
    #[serde_as(as = "serde_with::TimestampMilliSeconds<i64>")]
    #[serde(rename = "_")]
    requested_at: DateTime<Utc>,
}

impl<'a> EnergyBalanceQuery<'a> {
    pub const DAILY: u8 = 2;

    pub fn try_new(
        station_dn: &'a str,
        utc_offset: FixedOffset,
        time_zone: &'a str,
        date: NaiveDate,
    ) -> Result<Self, Error> {
        let local_midnight = date
            .and_time(NaiveTime::MIN)
            .and_local_timezone(utc_offset)
            .single()
            .ok_or_else(|| Error::Configuration(format!("no local midnight on {date}")))?;
        Ok(Self {
            station_dn,
            time_dimension: Self::DAILY,
            utc_offset_hours: format!("{:.1}", f64::from(utc_offset.local_minus_utc()) / 3600.0),
            time_zone,
            query_time: local_midnight.to_utc(),
            date: local_midnight.format("%Y-%m-%d %H:%M:%S").to_string(),
            requested_at: Utc::now(),
        })
    }

    pub fn to_query_string(&self) -> Result<String, Error> {
        serde_qs::to_string(self)
            .map_err(|error| Error::Configuration(format!("failed to encode the query: {error}")))
    }
}
