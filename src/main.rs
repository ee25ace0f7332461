//! memstats_poller: emit the memory statistics published on `/debug/vars` as JSON lines.
//!
//! Configuration is taken from the command line, then from the environment (`.env` is read if present),
//! then the defaults.
//!
use std::{collections::BTreeMap, io, process};
use clap::Parser;
use dotenv::dotenv;
use log::*;
use anyhow::{Context, Result};

use memstats_poller::poller::{self, PollConfig};
use memstats_poller::utility;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Opts {
    /// hostname:port of the process publishing /debug/vars [default: localhost:6060]
    #[arg(short, long)]
    addr: Option<String>,
    /// seconds between polls [default: 30]
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,
    /// number of failed polls after which to exit [default: 10]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    max_errors: Option<u32>,
    /// per request timeout in seconds [default: none]
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// write the addr, interval, max errors and timeout settings to .env
    #[arg(long)]
    write_dotenv: bool,
}

#[tokio::main]
async fn main() -> Result<()>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenv().ok();
    let options = Opts::parse();

    let mut changed_options = BTreeMap::new();
    let config = PollConfig {
        addr: utility::set_addr(&options.addr, &mut changed_options),
        interval: utility::set_interval(&options.interval, &mut changed_options),
        max_errors: utility::set_max_errors(&options.max_errors, &mut changed_options),
        timeout: utility::set_timeout(&options.timeout, &mut changed_options),
    };
    utility::dotenv_writer(options.write_dotenv, &changed_options)?;

    let client = config.build_client()
        .with_context(|| "Error creating http client")?;

    let mut stdout = io::stdout();
    let breached = poller::run(&config, &client, &mut stdout).await;

    error!("{}", breached);
    process::exit(1);
}
