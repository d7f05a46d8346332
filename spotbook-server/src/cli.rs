use std::env;
use std::net::SocketAddr;
use std::process;

use getopts::Options;
use tokio::time::Duration;

use crate::{cache, state};

pub const ADDRESS_VAR: &str = "SPOTBOOK_ADDR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub address: SocketAddr,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub session_ttl: Duration,
    pub seed: bool,
}

impl Args {
    pub fn state_config(&self) -> state::Config {
        state::Config {
            cache: cache::Config {
                enabled: self.enable_cache,
                ttl: self.cache_ttl,
            },
            session_ttl: self.session_ttl,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Args),
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: $SPOTBOOK_ADDR or 127.0.0.1:8000]",
        "SOCKET_ADDRESS",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of rendered spot calendars [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached calendars [Default: 3600]",
        "SECONDS",
    );
    opts.optopt(
        "e",
        "session-ttl",
        "Lifetime of login sessions [Default: 604800]",
        "SECONDS",
    );
    opts.optflag("s", "seed", "Load demo users, spots, reviews and bookings");
    opts
}

/// `env_address` is the value of `SPOTBOOK_ADDR`, used when `--address` is
/// absent.
pub fn try_parse(args: Vec<String>, env_address: Option<String>) -> Result<Parsed, String> {
    let opts = opts();

    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Parsed::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let address = match matches.opt_str("address").or(env_address) {
        Some(raw) => raw.parse::<SocketAddr>().map_err(|err| {
            format!("Provided value for option 'address' is invalid: {err}")
        })?,
        None => SocketAddr::from(([127, 0, 0, 1], 8000)),
    };

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = matches
        .opt_get_default("cache-ttl", 3600)
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'cache-ttl' is invalid: {err}"))?;

    let session_ttl = matches
        .opt_get_default("session-ttl", 604_800)
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'session-ttl' is invalid: {err}"))?;

    let seed = matches.opt_present("seed");

    Ok(Parsed::Run(Args {
        address,
        enable_cache,
        cache_ttl,
        session_ttl,
        seed,
    }))
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args, env::var(ADDRESS_VAR).ok()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
