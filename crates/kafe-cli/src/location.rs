//! `location` command handlers: the saved search origin.

use clap::Subcommand;
use kafe_core::{load_or_default, LatLng, LatLngCity, LocationStore};
use kafe_osm::{NominatimClient, PLACE_SUGGESTION_LIMIT};

/// Name saved when a coordinate cannot be reverse-geocoded.
const UNNAMED_LOCATION: &str = "Lokasi Saya";

#[derive(Debug, Subcommand)]
pub enum LocationCommands {
    /// Print the saved location
    Show,
    /// Save a new location, either geocoded from text or given as coordinates
    Set {
        /// Place to geocode; the first match is saved
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        query: Option<String>,
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Display name; looked up from the coordinates when omitted
        #[arg(long, requires = "lat")]
        city: Option<String>,
    },
    /// List places matching a name without saving anything
    Search {
        text: String,
    },
}

pub(crate) async fn run_location(
    nominatim: &NominatimClient,
    store: &dyn LocationStore,
    command: LocationCommands,
) -> anyhow::Result<()> {
    match command {
        LocationCommands::Show => {
            print_location(&load_or_default(store));
            Ok(())
        }
        LocationCommands::Set {
            query,
            lat,
            lng,
            city,
        } => {
            let location = match (query, lat, lng) {
                (Some(query), _, _) => geocode_first(nominatim, &query).await?,
                (None, Some(lat), Some(lng)) => {
                    let point = LatLng::new(lat, lng);
                    if !point.is_valid() {
                        anyhow::bail!("coordinates {lat}, {lng} are out of range");
                    }
                    let city = match city {
                        Some(city) => city,
                        None => reverse_name(nominatim, point).await,
                    };
                    LatLngCity::new(lat, lng, city)
                }
                _ => anyhow::bail!("pass either --query or both --lat and --lng"),
            };
            store.save(&location)?;
            print_location(&location);
            Ok(())
        }
        LocationCommands::Search { text } => {
            let candidates = nominatim
                .geocode_place(&text, PLACE_SUGGESTION_LIMIT)
                .await?;
            if candidates.is_empty() {
                println!("no places match '{text}'");
            }
            for candidate in &candidates {
                println!(
                    "{:<24}{:>10.4}{:>11.4}  {}",
                    candidate.label(),
                    candidate.location.lat,
                    candidate.location.lng,
                    candidate.display_name
                );
            }
            Ok(())
        }
    }
}

async fn geocode_first(nominatim: &NominatimClient, query: &str) -> anyhow::Result<LatLngCity> {
    let candidates = nominatim
        .geocode_place(query, PLACE_SUGGESTION_LIMIT)
        .await?;
    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no places match '{query}'"))?;
    Ok(LatLngCity::new(
        first.location.lat,
        first.location.lng,
        first.label(),
    ))
}

async fn reverse_name(nominatim: &NominatimClient, point: LatLng) -> String {
    match nominatim.reverse(point).await {
        Ok(Some(name)) => name,
        Ok(None) => UNNAMED_LOCATION.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "reverse geocoding failed");
            UNNAMED_LOCATION.to_string()
        }
    }
}

fn print_location(location: &LatLngCity) {
    println!(
        "{} ({:.4}, {:.4})",
        location.city_name, location.latitude, location.longitude
    );
}
