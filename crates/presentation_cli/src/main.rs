//! Maps CLI
//!
//! Command-line front end for geocoding, place search and coordinate
//! conversion.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use domain::{CoordinateFormat, Location, format_coordinates, parse_coordinates};
use integration_places::{
    AutocompletePrediction, AutocompleteRequest, CachedPlacesClient, GeocodeRequest, PlacesClient,
    PlacesError, PredictionFilters, VendorStatus, filter_predictions, group_by_category, sort_results_by_relevance,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Maps CLI
#[derive(Parser)]
#[command(name = "maps-cli")]
#[command(author, version, about = "Geocoding and places lookup", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./maps.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Region bias, overrides the configured default (e.g. "CO")
    #[arg(long, global = true)]
    region: Option<String>,

    /// Response language, overrides the configured default (e.g. "es")
    #[arg(long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode an address
    Geocode {
        /// Free-form address
        address: String,
    },

    /// Look up addresses for a coordinate pair
    ///
    /// Accepts decimal degrees or DMS, e.g. `6°14'39"N 75°34'52"W`.
    Reverse {
        #[arg(allow_hyphen_values = true)]
        lat: String,
        #[arg(allow_hyphen_values = true)]
        lng: String,
    },

    /// Type-ahead place predictions
    Autocomplete {
        /// Partial input
        input: String,

        /// Restrict to a country (ISO 3166-1 alpha-2)
        #[arg(long)]
        country: Option<String>,

        /// Origin latitude for distances and ranking
        #[arg(long, requires = "origin_lng", allow_hyphen_values = true)]
        origin_lat: Option<f64>,

        /// Origin longitude for distances and ranking
        #[arg(long, requires = "origin_lat", allow_hyphen_values = true)]
        origin_lng: Option<f64>,

        /// Bias radius around the origin in meters
        #[arg(long)]
        radius: Option<u32>,

        /// Keep only predictions with one of these place types
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<String>,

        /// Sort by relevance to the input
        #[arg(long)]
        rank: bool,

        /// Group the output by place category
        #[arg(long)]
        group: bool,
    },

    /// Fetch details for a place
    Details {
        /// Place id
        place_id: String,

        /// Restrict the response to these fields
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Parse a coordinate pair (decimal or DMS) and print it
    Parse {
        #[arg(allow_hyphen_values = true)]
        lat: String,
        #[arg(allow_hyphen_values = true)]
        lng: String,
    },

    /// Format a coordinate pair
    Format {
        #[arg(allow_hyphen_values = true)]
        lat: String,
        #[arg(allow_hyphen_values = true)]
        lng: String,

        /// Output format: decimal or dms
        #[arg(short, long, default_value = "decimal")]
        format: CoordinateFormat,
    },
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

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_pair(lat: &str, lng: &str) -> anyhow::Result<Location> {
    match parse_coordinates(lat, lng) {
        Some(location) => Ok(location),
        None => bail!("Not a valid coordinate pair: '{lat}', '{lng}'"),
    }
}

/// An autocomplete search with no matches prints an empty list
fn predictions_or_empty(
    result: Result<Vec<AutocompletePrediction>, PlacesError>,
) -> Result<Vec<AutocompletePrediction>, PlacesError> {
    match result {
        Err(PlacesError::Autocomplete {
            status: VendorStatus::ZeroResults,
        }) => Ok(Vec::new()),
        other => other,
    }
}

#[derive(Serialize)]
struct CategoryGroup {
    category: integration_places::PlaceCategory,
    predictions: Vec<AutocompletePrediction>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Offline commands need no configuration
    match &cli.command {
        Commands::Parse { lat, lng } => return print_json(&parse_pair(lat, lng)?),
        Commands::Format { lat, lng, format } => {
            let location = parse_pair(lat, lng)?;
            return print_json(&format_coordinates(&location, *format));
        },
        _ => {},
    }

    let config = settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = settings::apply_overrides(config, cli.region, cli.language);
    tracing::debug!(
        base_url = %config.base_url,
        region = %config.region,
        language = %config.language,
        "Loaded configuration"
    );
    let client = CachedPlacesClient::new(&config)?;

    match cli.command {
        Commands::Geocode { address } => {
            let results = client.geocode(GeocodeRequest::address(address)).await?;
            print_json(&results)?;
        },

        Commands::Reverse { lat, lng } => {
            let location = parse_pair(&lat, &lng)?;
            let results = client.reverse_geocode(location).await?;
            print_json(&results)?;
        },

        Commands::Autocomplete {
            input,
            country,
            origin_lat,
            origin_lng,
            radius,
            types,
            rank,
            group,
        } => {
            let origin = match (origin_lat, origin_lng) {
                (Some(lat), Some(lng)) => Some(Location::new(lat, lng)?),
                _ => None,
            };

            let mut request = AutocompleteRequest::new(input.clone());
            if let Some(country) = country {
                request = request.with_country(country);
            }
            if let Some(origin) = origin.clone() {
                request = match radius {
                    Some(radius) => request.with_location_bias(origin.clone(), radius),
                    None => request,
                }
                .with_origin(origin);
            }

            let result = client.autocomplete_predictions(request).await;
            let predictions = predictions_or_empty(result)?;
            let filters = PredictionFilters::default().with_place_types(types);
            let mut predictions = filter_predictions(predictions, &filters);
            if rank {
                predictions = sort_results_by_relevance(predictions, &input, origin.as_ref());
            }

            if group {
                let groups: Vec<CategoryGroup> = group_by_category(predictions)
                    .into_iter()
                    .map(|(category, predictions)| CategoryGroup {
                        category,
                        predictions,
                    })
                    .collect();
                print_json(&groups)?;
            } else {
                print_json(&predictions)?;
            }
        },

        Commands::Details { place_id, fields } => {
            let details = client.place_details(&place_id, &fields).await?;
            print_json(&details)?;
        },

        Commands::Parse { .. } | Commands::Format { .. } => {},
    }

    Ok(())
}
