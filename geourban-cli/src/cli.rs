use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use geourban_core::{
    AggregateParams, Config, GeoRapidClient, GridType, OutFormat, QueryParams, ReqwestTransport,
    TopParams, VehicleType,
    client::{API_KEY_ENV, DEFAULT_HOST, HOST_ENV},
    model::{DEFAULT_LIMIT, DEFAULT_METERS, DEFAULT_SECONDS},
    services,
};
use inquire::{Password, Text};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geourban", version, about = "Urban traffic simulation services CLI")]
pub struct Cli {
    #[command(flatten)]
    pub connection: Connection,

    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Connection {
    /// RapidAPI key; overrides the configured one.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Service host, e.g. "geourban.p.rapidapi.com".
    #[arg(long, env = HOST_ENV, global = true)]
    pub host: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store host and API key in the config file.
    Configure,

    /// Aggregated movements as a traffic grid.
    Aggregate {
        /// Region code, e.g. "DEU_Berlin".
        #[arg(long)]
        region: String,

        /// Simulation timestamp, e.g. 2023-05-01T12:00:00.
        #[arg(long)]
        time: NaiveDateTime,

        #[arg(long)]
        vehicle: VehicleType,

        #[arg(long)]
        grid: GridType,

        #[arg(long, default_value_t = OutFormat::default())]
        format: OutFormat,
    },

    /// Simulated agent positions around a location and time.
    Query {
        #[arg(long)]
        time: NaiveDateTime,

        #[arg(long)]
        vehicle: VehicleType,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Time window in seconds, 1..=120.
        #[arg(long, default_value_t = DEFAULT_SECONDS)]
        seconds: u32,

        /// Search radius in meters, 1..=1000.
        #[arg(long, default_value_t = DEFAULT_METERS)]
        meters: f64,

        #[arg(long, default_value_t = OutFormat::default())]
        format: OutFormat,
    },

    /// List the available simulations.
    Simulations,

    /// Top most accumulated traffic grid cells.
    Top {
        #[arg(long)]
        region: String,

        /// Simulation date, e.g. 2023-05-01.
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        vehicle: VehicleType,

        #[arg(long)]
        grid: GridType,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        #[arg(long, default_value_t = OutFormat::default())]
        format: OutFormat,
    },
}

impl Cli {
    /// Logs go to stderr so stdout stays pure JSON.
    pub fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { connection, command, .. } = self;
        let transport = ReqwestTransport::new();

        let value = match command {
            Command::Configure => return configure(),
            Command::Aggregate { region, time, vehicle, grid, format } => {
                let params = AggregateParams::new(region, time, vehicle, grid).format(format);
                services::aggregate(&connect(connection)?, &transport, &params).await?
            }
            Command::Query { time, vehicle, lat, lon, seconds, meters, format } => {
                let params = QueryParams::new(time, vehicle, lat, lon)
                    .seconds(seconds)
                    .meters(meters)
                    .format(format);
                services::query(&connect(connection)?, &transport, &params).await?
            }
            Command::Simulations => services::simulations(&connect(connection)?, &transport).await?,
            Command::Top { region, date, vehicle, grid, limit, format } => {
                let params = TopParams::new(region, date, vehicle, grid).limit(limit).format(format);
                services::top(&connect(connection)?, &transport, &params).await?
            }
        };

        print_json(&value)
    }
}

/// Flags and env vars win over the config file.
fn connect(connection: Connection) -> anyhow::Result<GeoRapidClient> {
    let config = Config::load()?.merged(connection.host, connection.api_key);
    let client = GeoRapidClient::from_config(&config)?;
    debug!(url = client.url(), "using geourban service");
    Ok(client)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let host = Text::new("Service host:")
        .with_default(config.host.as_deref().unwrap_or(DEFAULT_HOST))
        .prompt()?;
    let api_key = Password::new("RapidAPI key:").without_confirmation().prompt()?;

    config.host = Some(host);
    config.api_key = Some(api_key);
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to format response as JSON")?;
    println!("{out}");
    Ok(())
}
