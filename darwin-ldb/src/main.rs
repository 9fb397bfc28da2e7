//! `national-rail` - live departure boards from the command line.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use darwin_ldb::darwin::{
    BoardQuery, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, DarwinConfig, MockTransport, Session,
    Transport,
};
use darwin_ldb::render::Table;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "national-rail",
    version,
    about = "Query the National Rail Darwin live departure boards"
)]
struct Cli {
    /// Base URL of the Darwin LDB web service
    #[arg(long, global = true, env = "DARWIN_WEBSERVICE_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Darwin access token
    #[arg(long, global = true, env = "DARWIN_WEBSERVICE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Answer from `{Operation}.json` files in this directory instead of the network
    #[arg(long, global = true)]
    mock_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Table)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Departure and/or arrival board for a station
    Board {
        /// Station CRS code, e.g. MAN for Manchester Piccadilly
        station: String,

        /// Only include services travelling to this CRS code, e.g. HUD
        #[arg(long)]
        destination: Option<String>,

        /// Only include services coming from this CRS code
        #[arg(long)]
        origin: Option<String>,

        /// Maximum number of services
        #[arg(long, default_value_t = 10)]
        rows: u16,

        /// Include arrivals
        #[arg(long)]
        arrivals: bool,

        /// Leave departures out (use with --arrivals)
        #[arg(long)]
        no_departures: bool,
    },

    /// Calling points of one service, by the ID shown on a board
    Service { service_id: String },

    /// Next departure from a station towards each destination
    Next {
        /// Station CRS code
        station: String,

        /// Destination CRS codes
        #[arg(required = true)]
        destinations: Vec<String>,

        /// Earliest arrival rather than earliest departure
        #[arg(long)]
        fastest: bool,

        /// Include calling points
        #[arg(long)]
        details: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, output to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.mock_dir {
        Some(dir) => {
            let transport = MockTransport::from_dir(dir)
                .with_context(|| format!("failed to load mock responses from {}", dir.display()))?;
            let session = Session::with_transport(transport, Duration::from_secs(cli.timeout));
            run(&session, &cli).await
        }
        None => {
            let config = DarwinConfig::resolve(Some(cli.endpoint.clone()), cli.api_key.clone())?
                .with_timeout(cli.timeout);
            let session = Session::connect(config)?;
            run(&session, &cli).await
        }
    }
}

async fn run<T: Transport>(session: &Session<T>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Board {
            station,
            destination,
            origin,
            rows,
            arrivals,
            no_departures,
        } => {
            let mut query = BoardQuery::new(station.to_uppercase())
                .rows(*rows)
                .departures(!no_departures)
                .arrivals(*arrivals);
            if let Some(crs) = destination {
                query = query.destination(crs.to_uppercase());
            }
            if let Some(crs) = origin {
                query = query.origin(crs.to_uppercase());
            }

            let board = session.get_station_board(&query).await?;
            emit(cli.format, &board, || {
                Table::station_board(&board, query.is_arrivals_only())
            })
        }
        Command::Service { service_id } => {
            let details = session.get_service_details(service_id).await?;
            emit(cli.format, &details, || Table::service_details(&details))
        }
        Command::Next {
            station,
            destinations,
            fastest,
            details,
        } => {
            let station = station.to_uppercase();
            let destinations: Vec<String> = destinations.iter().map(|d| d.to_uppercase()).collect();
            let destinations: Vec<&str> = destinations.iter().map(String::as_str).collect();

            if *details {
                let board = if *fastest {
                    session
                        .get_fastest_departures_with_details(&station, &destinations)
                        .await?
                } else {
                    session
                        .get_next_departures_with_details(&station, &destinations)
                        .await?
                };
                emit(cli.format, &board, || Table::departures_with_details(&board))
            } else {
                let board = if *fastest {
                    session.get_fastest_departures(&station, &destinations).await?
                } else {
                    session.get_next_departures(&station, &destinations).await?
                };
                emit(cli.format, &board, || Table::departures(&board))
            }
        }
    }
}

/// Write `value` to stdout in the chosen format.
fn emit<S: Serialize>(format: Format, value: &S, table: impl FnOnce() -> Table) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        Format::Table => table().write_text(&mut out)?,
        Format::Csv => table().write_csv(&mut out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, value).context("failed to write JSON")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
