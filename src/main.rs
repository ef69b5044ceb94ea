//! `svd-view` entry point.

mod cli;

use clap::Parser;
use log::{debug, error, LevelFilter};
use std::{process, str::FromStr};

fn main() {
    let args = cli::Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default()).filter_level(log_level).init();
    debug!(args:?; "Parsed arguments");

    if let Err(err) = cli::run(&args) {
        error!("{err:?}");
        process::exit(1);
    }
}
