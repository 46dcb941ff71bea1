use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate};
use clap::{Parser, Subcommand};

use crate::{
    analyzer::Bucket,
    api::fusion_solar::{self, UreqTransport},
    core::{Credential, DateRange},
    fetcher::Fetcher,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download the energy balance for the date range, one JSON file per window.
    #[clap(name = "fetch")]
    Fetch(Box<FetchArgs>),

    /// Average the downloaded files into a daily power profile and chart it.
    #[clap(name = "analyze")]
    Analyze(Box<AnalyzeArgs>),
}

#[derive(Parser)]
pub struct FetchArgs {
    /// First day to download.
    #[clap(long)]
    pub since: NaiveDate,

    /// Last day to download, inclusive. Defaults to `--since`.
    #[clap(long)]
    pub until: Option<NaiveDate>,

    /// Session cookie copied from the browser's developer tools.
    #[clap(long, env = "FUSIONSOLAR_COOKIE", hide_env_values = true)]
    pub cookie: String,

    #[clap(long, env = "FUSIONSOLAR_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Pause between the requests.
    #[clap(long, env = "FUSIONSOLAR_DELAY", default_value = "2s")]
    pub delay: humantime::Duration,

    #[clap(flatten)]
    pub api: ApiArgs,
}

impl FetchArgs {
    pub fn date_range(&self) -> Result<DateRange, Error> {
        DateRange::try_new(self.since, self.until.unwrap_or(self.since))
    }

    pub fn credential(&self) -> Result<Credential, Error> {
        Credential::try_new(self.cookie.as_str())
    }

    pub fn new_fetcher(&self) -> Result<Fetcher<UreqTransport>, Error> {
        Ok(Fetcher::builder()
            .api(self.api.new_client()?)
            .output_dir(&self.output_dir)
            .delay(self.delay.into())
            .build())
    }
}

#[derive(Parser)]
pub struct ApiArgs {
    /// Energy balance endpoint of the dashboard region your account lives in.
    #[clap(
        long = "endpoint",
        env = "FUSIONSOLAR_ENDPOINT",
        default_value = fusion_solar::DEFAULT_ENDPOINT
    )]
    pub endpoint: String,

    /// Station identifier as seen in the dashboard URL.
    #[clap(long, env = "FUSIONSOLAR_STATION_DN", default_value = "NE=50999304")]
    pub station_dn: String,

    #[clap(
        long,
        env = "FUSIONSOLAR_UTC_OFFSET_HOURS",
        default_value = "7",
        allow_hyphen_values = true
    )]
    pub utc_offset_hours: f64,

    #[clap(long, env = "FUSIONSOLAR_TIME_ZONE", default_value = "Asia/Bangkok")]
    pub time_zone: String,

    #[clap(long, env = "FUSIONSOLAR_TIMEOUT", default_value = "30s")]
    pub timeout: humantime::Duration,
}

impl ApiArgs {
    pub fn utc_offset(&self) -> Result<FixedOffset, Error> {
        let invalid =
            || Error::Configuration(format!("invalid UTC offset: {} hours", self.utc_offset_hours));
        if !self.utc_offset_hours.is_finite() {
            return Err(invalid());
        }
        #[expect(clippy::cast_possible_truncation)]
        let seconds = (self.utc_offset_hours * 3600.0).round() as i32;
        FixedOffset::east_opt(seconds).ok_or_else(invalid)
    }

    pub fn new_client(&self) -> Result<fusion_solar::Api<UreqTransport>, Error> {
        Ok(fusion_solar::Api::builder()
            .transport(UreqTransport::new(self.timeout.into()))
            .endpoint(self.endpoint.as_str())
            .station_dn(self.station_dn.as_str())
            .utc_offset(self.utc_offset()?)
            .time_zone(self.time_zone.as_str())
            .build())
    }
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Downloaded files, or directories containing them.
    #[clap(default_value = "output")]
    pub paths: Vec<PathBuf>,

    #[clap(long, value_enum, default_value_t)]
    pub bucket: Bucket,

    /// Series to chart.
    #[clap(long, default_value = "usePower")]
    pub metric: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_verify_command() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() -> Result {
        let args = Args::try_parse_from([
            "helios",
            "fetch",
            "--since",
            "2024-01-01",
            "--until",
            "2024-01-03",
            "--cookie",
            "JSESSIONID=abc",
            "--utc-offset-hours",
            "-3.5",
        ])?;
        let Command::Fetch(args) = args.command else { bail!("expected `fetch`") };
        assert_eq!(args.date_range()?.n_days(), 3);
        assert_eq!(args.api.utc_offset()?.local_minus_utc(), -12600);
        assert_eq!(std::time::Duration::from(args.delay).as_secs(), 2);
        Ok(())
    }

    #[test]
    fn test_reversed_range() -> Result {
        let args = Args::try_parse_from([
            "helios", "fetch", "--since", "2024-01-03", "--until", "2024-01-01", "--cookie", "x",
        ])?;
        let Command::Fetch(args) = args.command else { bail!("expected `fetch`") };
        assert!(matches!(args.date_range(), Err(Error::InvalidDateRange { .. })));
        Ok(())
    }

    #[test]
    fn test_parse_analyze_defaults() -> Result {
        let args = Args::try_parse_from(["helios", "analyze"])?;
        let Command::Analyze(args) = args.command else { bail!("expected `analyze`") };
        assert_eq!(args.paths, [PathBuf::from("output")]);
        assert_eq!(args.bucket, Bucket::TimeOfDay);
        assert_eq!(args.metric, "usePower");
        Ok(())
    }
}
