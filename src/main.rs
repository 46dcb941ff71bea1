#![allow(clippy::doc_markdown)]

mod analyzer;
mod api;
mod cli;
mod core;
mod error;
mod fetcher;
mod prelude;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{AnalyzeArgs, Args, Command, FetchArgs},
    prelude::*,
    tables::build_profile_table,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Fetch(args) => fetch(&args)?,
        Command::Analyze(args) => analyze(&args)?,
    }

    info!("done!");
    Ok(())
}

#[instrument(skip_all)]
fn fetch(args: &FetchArgs) -> Result {
    let credential = args.credential()?;
    let date_range = args.date_range()?;
    let paths = args
        .new_fetcher()?
        .fetch(date_range, &credential)
        .with_context(|| format!("failed to download {date_range}"))?;
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}

#[instrument(skip_all)]
fn analyze(args: &AnalyzeArgs) -> Result {
    let report = analyzer::load(&args.paths);
    let n_failures = report.failures.len();
    let records = report.into_records();
    ensure!(!records.is_empty(), "none of the artifacts could be loaded ({n_failures} failed)");

    let profile =
        analyzer::aggregate(analyzer::flatten(&records), |timestamp| args.bucket.key(timestamp));
    ensure!(!profile.is_empty(), "the artifacts contain no measurements");
    if profile.column(&args.metric).next().is_none() {
        warn!(metric = %args.metric, available = ?profile.metrics(), "no such series");
    }
    println!("{}", build_profile_table(&profile, &args.metric));
    Ok(())
}
