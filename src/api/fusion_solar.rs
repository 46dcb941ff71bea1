//! FusionSolar dashboard private API.
//!
//! There is no public contract behind this: the endpoint and its parameters are whatever the
//! dashboard's own front-end sends, so any change on the vendor side breaks us.

mod query;
mod transport;

use std::num::NonZeroU32;

use bon::Builder;
use chrono::FixedOffset;
use serde::de::IgnoredAny;

#[cfg(test)]
pub use self::transport::ScriptedTransport;
pub use self::transport::{Reply, Transport, UreqTransport};
use self::query::EnergyBalanceQuery;
use crate::{
    core::{Credential, DateRange},
    error::UpstreamError,
    prelude::*,
};

pub const DEFAULT_ENDPOINT: &str =
    "https://sg5.fusionsolar.huawei.com/rest/pvms/web/station/v3/overview/energy-balance";

/// The daily view (`timeDim=2`) covers exactly one day per request.
pub const WINDOW_DAYS: NonZeroU32 = NonZeroU32::MIN;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Builder)]
pub struct Api<T> {
    transport: T,

    #[builder(into)]
    endpoint: String,

    /// Station identifier, for example: `NE=50999304`.
    #[builder(into)]
    station_dn: String,

    utc_offset: FixedOffset,

    /// IANA time zone name reported alongside the offset.
    #[builder(into)]
    time_zone: String,
}

impl<T: Transport> Api<T> {
    /// Fetch the raw energy balance JSON of the window.
    ///
    /// The body is returned untouched, it is only checked to be a JSON document.
    /// The window must span exactly [`WINDOW_DAYS`].
    #[instrument(skip_all, fields(window = %window))]
    pub fn get_energy_balance(
        &self,
        window: DateRange,
        credential: &Credential,
    ) -> Result<Vec<u8>, Error> {
        if window.n_days() != u64::from(WINDOW_DAYS.get()) {
            return Err(Error::Configuration(format!(
                "the daily view serves {WINDOW_DAYS} day per request, got {window}"
            )));
        }
        let query = EnergyBalanceQuery::try_new(
            &self.station_dn,
            self.utc_offset,
            &self.time_zone,
            window.start(),
        )?;
        let url = format!("{}?{}", self.endpoint, query.to_query_string()?);
        let origin = self.origin()?;
        let referer = format!("{origin}/");
        let headers = [
            ("Cookie", credential.as_str()),
            ("Accept", "application/json, text/plain, */*"),
            ("User-Agent", USER_AGENT),
            ("Referer", referer.as_str()),
            ("Origin", origin.as_str()),
        ];

        debug!("fetching…");
        let reply = self.transport.get(&url, &headers)?;
        if !(200..300).contains(&reply.status) {
            warn!(status = reply.status, "request failed");
            return Err(Error::from_status(reply.status));
        }
        serde_json::from_slice::<IgnoredAny>(&reply.body).map_err(UpstreamError::InvalidBody)?;
        debug!(n_bytes = reply.body.len(), "fetched");
        Ok(reply.body)
    }

    /// Scheme and authority of the endpoint, the dashboard checks them against `Origin`.
    fn origin(&self) -> Result<String, Error> {
        let uri = self
            .endpoint
            .parse::<http::Uri>()
            .map_err(|error| Error::Configuration(format!("invalid endpoint: {error}")))?;
        match (uri.scheme_str(), uri.authority()) {
            (Some(scheme), Some(authority)) => Ok(format!("{scheme}://{authority}")),
            _ => Err(Error::Configuration(format!("endpoint `{uri}` is not an absolute URL"))),
        }
    }
}

#[cfg(test)]
impl<T> Api<T> {
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}
