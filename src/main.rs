use std::fs;
use std::path::{Path, PathBuf};

use barber_locator::config::LocatorConfig;
use barber_locator::location::{LocatorError, MatchPolicy};
use barber_locator::{Barber, BarberLocator, GeoPoint, PositionFailure, PositionState, ViewMode};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// barber-locator: resolve barber addresses and find shops near you.
///
/// Examples:
///   barber-locator resolve "123 Main St, Brooklyn, NY"
///   barber-locator resolve --longest-match "Charleston, West Virginia"
///   barber-locator nearby barbers.json --lat 34.0522 --lon -118.2437 --radius 10
///   barber-locator nearby barbers.json --all
///   barber-locator serve --port 8080
#[derive(Parser)]
#[command(name = "barber-locator", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/barber-locator/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Settle ambiguous substring matches by longest name instead of
    /// gazetteer order.
    #[arg(long, global = true)]
    longest_match: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve free-text locations to coordinates.
    Resolve {
        #[arg(required = true)]
        locations: Vec<String>,
    },

    /// Locate barbers from a JSON file relative to a position.
    Nearby {
        /// JSON array of barbers ({id, name, location, rating?, image_url?}).
        file: PathBuf,

        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Treat the position as denied/unavailable rather than pending.
        #[arg(long, conflicts_with = "lat")]
        position_unavailable: bool,

        /// Search radius in miles. Defaults to the configured radius.
        #[arg(long)]
        radius: Option<f64>,

        /// Show every resolved barber instead of only those within the radius.
        #[arg(long)]
        all: bool,
    },

    /// Print the loaded gazetteer.
    Gazetteer,

    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).unwrap_or_else(|e| fail(e));
    if cli.longest_match {
        config.match_policy = MatchPolicy::LongestMatch;
    }

    match cli.command {
        Command::Resolve { locations } => {
            let resolver = config.resolver().unwrap_or_else(|e| fail(e));
            for query in locations {
                let line = match resolver.resolve_detailed(&query) {
                    Some(r) => json!({
                        "query": query,
                        "resolved": true,
                        "latitude": r.point.latitude,
                        "longitude": r.point.longitude,
                        "rule": r.rule,
                        "matched": r.matched,
                    }),
                    None => json!({ "query": query, "resolved": false }),
                };
                println!("{}", line);
            }
        }

        Command::Nearby {
            file,
            lat,
            lon,
            position_unavailable,
            radius,
            all,
        } => {
            let barbers = read_barbers(&file).unwrap_or_else(|e| fail(e));
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => {
                    PositionState::known(GeoPoint::new(lat, lon).unwrap_or_else(|e| fail(e)))
                }
                _ if position_unavailable => PositionState::from_report(Err(PositionFailure::Denied)),
                _ => PositionState::Pending,
            };
            let mode = if all { ViewMode::ShowAll } else { ViewMode::NearbyOnly };
            let radius = radius.unwrap_or(config.default_radius_miles);

            let resolver = config.resolver().unwrap_or_else(|e| fail(e));
            let locator = BarberLocator::new(resolver, config.default_center);
            let outcome = locator.locate(&barbers, &position, mode, radius);

            if !outcome.unresolved.is_empty() {
                eprintln!("  Unresolved locations: {}", outcome.unresolved.join(", "));
            }
            match serde_json::to_string_pretty(&outcome) {
                Ok(s) => println!("{}", s),
                Err(e) => fail(e),
            }
        }

        Command::Gazetteer => {
            let gazetteer = config.gazetteer().unwrap_or_else(|e| fail(e));
            let body = json!({
                "cities": gazetteer.cities(),
                "states": gazetteer.states(),
            });
            match serde_json::to_string_pretty(&body) {
                Ok(s) => println!("{}", s),
                Err(e) => fail(e),
            }
        }

        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            if let Err(e) = barber_locator::server::start(config, &host, port).await {
                fail(e);
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<LocatorConfig, LocatorError> {
    match path {
        Some(p) => LocatorConfig::load_from(p),
        None => LocatorConfig::load(),
    }
}

fn read_barbers(path: &Path) -> Result<Vec<Barber>, LocatorError> {
    let data = fs::read_to_string(path).map_err(|source| LocatorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}
