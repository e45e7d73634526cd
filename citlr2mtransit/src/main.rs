// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

use chrono::NaiveDate;
use citlr_bus::{exporter, read_utils, LeRichelainBusAgencyTools, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

fn parse_date(date: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|e| format!("'{}' is not a YYYYMMDD date: {}", date, e))
}

#[derive(Debug, Parser)]
#[command(
    name = "citlr2mtransit",
    about = "Render the Le Richelain (CITLR) bus GTFS into MTransit files.",
    version
)]
struct Opt {
    /// GTFS directory or zip archive.
    input: PathBuf,

    /// Output directory.
    output: PathBuf,

    /// Prefix of every written file name.
    files_prefix: Option<String>,

    /// JSON file containing additional configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Services without any date from this one on are left out (YYYYMMDD),
    /// today by default.
    #[arg(short = 'x', long, value_parser = parse_date)]
    current_date: Option<NaiveDate>,
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|e| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            e,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter_subscriber)
        .init();
}

fn run(opt: Opt) -> Result<()> {
    info!("Launching citlr2mtransit...");

    let mut configuration = read_utils::read_config(opt.config)?;
    if let Some(files_prefix) = opt.files_prefix {
        configuration.files_prefix = files_prefix;
    }
    let reference_date = match opt.current_date.or(configuration.reference_date) {
        Some(date) => date,
        None => parse_date(&citlr_bus::CURRENT_DATE).map_err(anyhow::Error::msg)?,
    };
    configuration.reference_date = Some(reference_date);

    let mut agency = LeRichelainBusAgencyTools::new();
    exporter::export(&mut agency, opt.input, opt.output, &configuration)
}

fn main() {
    init_logger();
    if let Err(err) = run(Opt::parse()) {
        for cause in err.chain() {
            eprintln!("{cause}");
        }
        std::process::exit(1);
    }
}
