//! Navitime route CLI
//!
//! Command-line interface for searching transit routes.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use integration_navitime::{
    CoordinateDatum, CoordinateUnit, NavitimeConfig, NavitimeRouteClient, RouteClient, RouteError,
    RouteQuery, RouteQueryBuilder, RouteResponse, START_TIME_FORMAT, render, summarize,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Overrides;

/// Navitime route CLI
#[derive(Parser)]
#[command(name = "navitime-cli")]
#[command(author, version, about = "Transit route search via Navitime", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file (default: ./navitime.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search routes and print a summary of each itinerary
    ///
    /// Example: navitime-cli route 35.2746 136.2522 35.3147 136.2908
    #[command(allow_negative_numbers = true)]
    Route {
        #[command(flatten)]
        route: RouteArgs,

        /// Print the normalized response as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Print the request URL without sending it
    #[command(allow_negative_numbers = true)]
    Query {
        #[command(flatten)]
        route: RouteArgs,
    },

    /// Check that the route service is reachable
    Health {
        /// RapidAPI key
        #[arg(long, env = "NAVITIME_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Origin latitude in degrees
    origin_lat: f64,

    /// Origin longitude in degrees
    origin_lon: f64,

    /// Destination latitude in degrees
    dest_lat: f64,

    /// Destination longitude in degrees
    dest_lon: f64,

    /// Departure time, YYYY-MM-DDTHH:MM:SS (default: now)
    #[arg(short, long, value_parser = parse_departure)]
    departure: Option<NaiveDateTime>,

    /// Maximum number of itineraries
    #[arg(short, long)]
    limit: Option<u32>,

    /// Search window in minutes
    #[arg(long)]
    term: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Geodetic datum (wgs84, tokyo)
    #[arg(long, default_value = "wgs84")]
    datum: CoordinateDatum,

    /// Coordinate unit on the wire (degree, millisec)
    #[arg(long, default_value = "degree")]
    coord_unit: CoordinateUnit,

    /// RapidAPI key
    #[arg(long, env = "NAVITIME_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

impl RouteArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
            search_window_minutes: self.term,
            result_limit: self.limit,
        }
    }

    fn query(&self, config: &NavitimeConfig) -> Result<RouteQuery, RouteError> {
        let builder = RouteQueryBuilder::from_config(config)
            .origin(self.origin_lat, self.origin_lon)
            .destination(self.dest_lat, self.dest_lon)
            .datum(self.datum)
            .coordinate_unit(self.coord_unit);

        match self.departure {
            Some(departure) => builder.departure_time(departure).build(),
            None => builder.build(),
        }
    }
}

fn parse_departure(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, START_TIME_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(verbose));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// What the `route` command prints
#[derive(Debug, PartialEq, Eq)]
enum RouteOutput {
    /// Report or JSON for stdout
    Report(String),
    /// Provider rejected the request; goes to stderr
    HttpFailure(String),
}

fn route_output(
    result: Result<RouteResponse, RouteError>,
    query: &RouteQuery,
    json: bool,
) -> anyhow::Result<RouteOutput> {
    match result {
        Ok(response) if json => Ok(RouteOutput::Report(serde_json::to_string_pretty(&response)?)),
        Ok(response) => Ok(RouteOutput::Report(format!(
            "🚆 {} → {}\n\n{}",
            query.origin(),
            query.destination(),
            render(&summarize(&response))
        ))),
        Err(RouteError::Http { status, raw_body }) => {
            Ok(RouteOutput::HttpFailure(format!("❌ HTTP {status}\n{raw_body}")))
        },
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = settings::load(cli.config.as_deref())?;
    info!(base_url = %config.base_url, "Configuration loaded");

    match cli.command {
        Commands::Query { route } => {
            let config = route.overrides().apply(config);
            let query = route.query(&config)?;
            println!("{}", config.request_url(&query));
        },

        Commands::Route { route, json } => {
            let config = route.overrides().apply(config);
            let query = route.query(&config)?;
            let client = NavitimeRouteClient::new(&config)?;

            match route_output(client.execute(&query).await, &query, json)? {
                RouteOutput::Report(text) => println!("{text}"),
                RouteOutput::HttpFailure(text) => {
                    eprintln!("{text}");
                    return Ok(ExitCode::FAILURE);
                },
            }
        },

        Commands::Health { api_key } => {
            let overrides = Overrides {
                api_key,
                ..Overrides::default()
            };
            let client = NavitimeRouteClient::new(&overrides.apply(config))?;

            if client.is_healthy().await {
                println!("✅ Healthy");
            } else {
                eprintln!("❌ Unhealthy: service unreachable");
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    fn route_args(args: &[&str]) -> RouteArgs {
        let mut full = vec!["navitime-cli", "query"];
        full.extend_from_slice(args);
        match parse_args(&full).unwrap().command {
            Commands::Query { route } => route,
            _ => unreachable!("expected query"),
        }
    }

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn parse_departure_accepts_wire_format() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 17)
            .unwrap()
            .and_hms_opt(14, 18, 0)
            .unwrap();
        assert_eq!(parse_departure("2026-01-17T14:18:00"), Ok(expected));
    }

    #[test]
    fn parse_departure_rejects_other_formats() {
        assert!(parse_departure("2026-01-17 14:18").is_err());
        assert!(parse_departure("tomorrow").is_err());
    }

    #[test]
    fn route_command_parses_coordinates() {
        let cli = parse_args(&[
            "navitime-cli",
            "route",
            "35.2746",
            "136.2522",
            "35.3147",
            "136.2908",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Route { route, json } => {
                assert!(json);
                assert!((route.origin_lat - 35.2746).abs() < f64::EPSILON);
                assert!((route.dest_lon - 136.2908).abs() < f64::EPSILON);
                assert_eq!(route.datum, CoordinateDatum::Wgs84);
                assert_eq!(route.coord_unit, CoordinateUnit::Degree);
            },
            _ => unreachable!("expected route"),
        }
    }

    #[test]
    fn route_command_accepts_negative_coordinates() {
        let route = route_args(&["-33.8688", "151.2093", "-37.8136", "144.9631"]);
        assert!(route.origin_lat < 0.0);
        assert!(route.dest_lat < 0.0);
    }

    #[test]
    fn route_command_requires_four_coordinates() {
        assert!(parse_args(&["navitime-cli", "route", "35.2746", "136.2522"]).is_err());
    }

    #[test]
    fn query_builds_request_url() {
        let route = route_args(&[
            "35.2746",
            "136.2522",
            "35.3147",
            "136.2908",
            "--departure",
            "2026-01-17T14:18:00",
        ]);
        let config = route.overrides().apply(NavitimeConfig::default());
        let query = route.query(&config).unwrap();

        assert_eq!(
            config.request_url(&query),
            "https://navitime-route-totalnavi.p.rapidapi.com/route_transit?\
             start=136.2522,35.2746&goal=136.2908,35.3147&datum=wgs84&term=1440&limit=5\
             &start_time=2026-01-17T14:18:00&coord_unit=degree"
        );
    }

    #[test]
    fn flags_override_config() {
        let route = route_args(&[
            "35.2746", "136.2522", "35.3147", "136.2908", "--limit", "3", "--term", "60",
            "--datum", "tokyo",
        ]);
        let config = route.overrides().apply(NavitimeConfig::default());
        let query = route.query(&config).unwrap();

        assert_eq!(query.result_limit(), 3);
        assert_eq!(query.search_window_minutes(), 60);
        assert_eq!(query.datum(), CoordinateDatum::Tokyo);
    }

    #[test]
    fn query_rejects_out_of_range_coordinates() {
        let route = route_args(&["135.0", "35.0", "35.3147", "136.2908"]);
        let result = route.query(&NavitimeConfig::default());
        assert!(matches!(result, Err(RouteError::Validation { .. })));
    }

    #[test]
    fn invalid_datum_is_rejected() {
        let result = parse_args(&[
            "navitime-cli",
            "query",
            "35.2746",
            "136.2522",
            "35.3147",
            "136.2908",
            "--datum",
            "jgd2011",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse_args(&[
            "navitime-cli",
            "query",
            "35.2746",
            "136.2522",
            "35.3147",
            "136.2908",
            "-vv",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    fn hikone_query() -> RouteQuery {
        route_args(&["35.2746", "136.2522", "35.3147", "136.2908"])
            .query(&NavitimeConfig::default())
            .unwrap()
    }

    #[test]
    fn route_output_renders_summary() {
        let output = route_output(Ok(RouteResponse::empty()), &hikone_query(), false).unwrap();
        assert_eq!(
            output,
            RouteOutput::Report(
                "🚆 35.2746, 136.2522 → 35.3147, 136.2908\n\nNo routes found".to_string()
            )
        );
    }

    #[test]
    fn route_output_json() {
        let output = route_output(Ok(RouteResponse::empty()), &hikone_query(), true).unwrap();
        match output {
            RouteOutput::Report(text) => assert!(text.contains("\"itineraries\": []")),
            RouteOutput::HttpFailure(text) => unreachable!("unexpected failure: {text}"),
        }
    }

    #[test]
    fn route_output_http_error_is_a_failure() {
        let result = Err(RouteError::Http {
            status: 429,
            raw_body: r#"{"message":"rate limited"}"#.to_string(),
        });
        let output = route_output(result, &hikone_query(), false).unwrap();
        assert_eq!(
            output,
            RouteOutput::HttpFailure("❌ HTTP 429\n{\"message\":\"rate limited\"}".to_string())
        );
    }

    #[test]
    fn route_output_other_errors_propagate() {
        let result = Err(RouteError::Network("connection refused".to_string()));
        assert!(route_output(result, &hikone_query(), false).is_err());
    }

    #[test]
    fn health_command_parses_api_key() {
        let cli = parse_args(&["navitime-cli", "health", "--api-key", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Health { api_key: Some(ref key) } if key == "abc"
        ));
    }
}
