//! `nearby`, `detail` and `browse` command handlers.

use std::sync::Arc;

use clap::Args;
use kafe_core::{
    filter_by_category, load_or_default, Category, LatLng, LatLngCity, LocationStore,
    PriceLevel, SearchFilters, SortBy, Venue,
};
use kafe_osm::{CafeFinder, NearbyQuery, SearchSession, SessionResult};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

#[derive(Debug, Args)]
pub struct NearbyArgs {
    /// Origin latitude; defaults to the saved location
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Origin longitude; defaults to the saved location
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
    /// Search radius in metres
    #[arg(long)]
    pub radius: Option<u32>,
    /// Free-text search instead of a radius search
    #[arg(long)]
    pub keyword: Option<String>,
    /// Narrow to one category (e.g. coffee_shop, indonesian)
    #[arg(long)]
    pub category: Option<Category>,
    /// Drop venues rated below this
    #[arg(long)]
    pub min_rating: Option<f64>,
    /// Highest price level to keep, 0 (free) to 4
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4))]
    pub max_price: Option<u32>,
    /// Only venues open now
    #[arg(long)]
    pub open_now: bool,
    /// Sort order: rating, reviews, distance or price
    #[arg(long)]
    pub sort: Option<SortBy>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl NearbyArgs {
    fn origin(&self, store: &dyn LocationStore) -> LatLng {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => LatLng::new(lat, lng),
            _ => load_or_default(store).lat_lng(),
        }
    }

    fn filters(&self) -> SearchFilters {
        SearchFilters {
            price_range: self
                .max_price
                .map(|max| (PriceLevel::Free, PriceLevel::from_index(max))),
            min_rating: self.min_rating,
            open_now: self.open_now,
            sort_by: self.sort,
            ..SearchFilters::default()
        }
    }
}

/// List cafes around the origin, filtered and sorted as requested.
///
/// # Errors
///
/// Returns an error if `--json` output cannot be serialized.
pub(crate) async fn run_nearby(
    finder: &CafeFinder,
    store: &dyn LocationStore,
    args: &NearbyArgs,
    default_radius_m: u32,
) -> anyhow::Result<()> {
    let origin = args.origin(store);
    let mut query = NearbyQuery::new(origin.lat, origin.lng)
        .with_radius(args.radius.unwrap_or(default_radius_m));
    if let Some(keyword) = &args.keyword {
        query = query.with_keyword(keyword.clone());
    }

    let mut venues = finder.fetch_nearby(&query).await;
    if let Some(category) = args.category {
        venues = filter_by_category(venues, category);
    }
    let venues = args.filters().apply(venues, origin);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&venues)?);
    } else {
        print_table(&venues, origin);
    }
    Ok(())
}

/// Show one venue.
///
/// # Errors
///
/// Returns an error if the venue cannot be found or serialized.
pub(crate) async fn run_detail(finder: &CafeFinder, id: &str, json: bool) -> anyhow::Result<()> {
    let venue = finder
        .resolve_detail(id)
        .await
        .ok_or_else(|| anyhow::anyhow!("venue '{id}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&venue)?);
    } else {
        print_detail(&venue);
    }
    Ok(())
}

/// Search for each stdin line as it arrives. Searches overlap; a result is
/// printed only if no later line was entered while it was in flight.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub(crate) async fn run_browse(
    finder: Arc<CafeFinder>,
    origin: LatLngCity,
    radius_m: u32,
) -> anyhow::Result<()> {
    let session = Arc::new(SearchSession::new(finder));
    let center = origin.lat_lng();
    eprintln!(
        "searching around {} ({:.4}, {:.4}); type a keyword, or an empty line for all cafes",
        origin.city_name, center.lat, center.lng
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        // Issued here, not in the task, so generations follow input order
        // whatever order the runtime polls the tasks in.
        let generation = session.begin();
        let session = Arc::clone(&session);
        let query = NearbyQuery::new(center.lat, center.lng)
            .with_radius(radius_m)
            .with_keyword(line.clone());
        searches.spawn(async move {
            match session.search_at(generation, &query).await {
                SessionResult::Current(venues) => {
                    println!("\n> {}", line.trim());
                    print_table(&venues, center);
                }
                SessionResult::Superseded { .. } => {}
            }
        });
    }

    while let Some(joined) = searches.join_next().await {
        if let Err(e) = joined {
            tracing::warn!(error = %e, "browse search task failed");
        }
    }
    Ok(())
}

fn format_distance(metres: f64) -> String {
    if metres < 1000.0 {
        format!("{metres:.0} m")
    } else {
        format!("{:.1} km", metres / 1000.0)
    }
}

fn price_label(venue: &Venue) -> String {
    match venue.price_level.as_u8() {
        0 => "free".to_string(),
        n => "$".repeat(usize::from(n)),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn print_table(venues: &[Venue], origin: LatLng) {
    if venues.is_empty() {
        println!("no cafes found");
        return;
    }

    println!(
        "{:<12}{:<34}{:<14}{:<8}{:<9}{:<7}{:<10}ADDRESS",
        "ID", "NAME", "CATEGORY", "RATING", "REVIEWS", "PRICE", "DISTANCE"
    );
    for venue in venues {
        println!(
            "{:<12}{:<34}{:<14}{:<8.1}{:<9}{:<7}{:<10}{}",
            venue.place_id,
            truncate(&venue.name, 30),
            venue.primary_category().as_str(),
            venue.rating,
            venue.user_ratings_total,
            price_label(venue),
            format_distance(venue.location.distance_m(&origin)),
            truncate(&venue.address, 40)
        );
    }
}

fn print_detail(venue: &Venue) {
    let categories: Vec<&str> = venue.category.iter().map(|c| c.as_str()).collect();

    println!("{} ({})", venue.name, venue.place_id);
    println!(
        "Rating: {:.1} from {} reviews, price {}",
        venue.rating,
        venue.user_ratings_total,
        price_label(venue)
    );
    println!("Categories: {}", categories.join(", "));
    if !venue.address.is_empty() {
        println!("Address: {}", venue.address);
    }
    println!(
        "Location: {:.6}, {:.6}",
        venue.location.lat, venue.location.lng
    );
    if let Some(phone) = &venue.phone_number {
        println!("Phone: {phone}");
    }
    if let Some(website) = &venue.website {
        println!("Website: {website}");
    }
    if !venue.opening_hours.weekday_text.is_empty() {
        println!("Hours:");
        for line in &venue.opening_hours.weekday_text {
            println!("  {line}");
        }
    }
    if let Some(url) = venue.cover_photo_url() {
        println!("Photo: {url}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_switch_to_kilometres() {
        assert_eq!(format_distance(640.4), "640 m");
        assert_eq!(format_distance(2_360.0), "2.4 km");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Kopi", 10), "Kopi");
        assert_eq!(truncate("Kopi Senja Utama", 4), "Kopi...");
    }

    fn args(lat: Option<f64>, lng: Option<f64>) -> NearbyArgs {
        NearbyArgs {
            lat,
            lng,
            radius: None,
            keyword: None,
            category: None,
            min_rating: Some(4.0),
            max_price: Some(2),
            open_now: false,
            sort: Some(SortBy::Rating),
            json: false,
        }
    }

    #[test]
    fn origin_defaults_to_saved_location() {
        let store = kafe_core::MemoryLocationStore::new();
        assert_eq!(args(None, None).origin(&store), LatLngCity::default().lat_lng());

        store
            .save(&LatLngCity::new(-6.9147, 107.6098, "Bandung"))
            .unwrap();
        assert_eq!(args(None, None).origin(&store), LatLng::new(-6.9147, 107.6098));
        assert_eq!(
            args(Some(-7.25), Some(112.75)).origin(&store),
            LatLng::new(-7.25, 112.75)
        );
    }

    #[test]
    fn filters_carry_rating_and_sort() {
        let filters = args(None, None).filters();
        assert_eq!(filters.min_rating, Some(4.0));
        assert_eq!(filters.sort_by, Some(SortBy::Rating));
        assert_eq!(
            filters.price_range,
            Some((PriceLevel::Free, PriceLevel::Moderate))
        );
        assert!(filters.categories.is_empty());
    }

    #[test]
    fn filters_drop_venues_above_max_price() {
        let mut pricey = kafe_osm::fallback::catalog().remove(0);
        pricey.price_level = PriceLevel::Expensive;
        pricey.rating = 4.8;
        let origin = pricey.location;

        let kept = args(None, None).filters().apply(vec![pricey], origin);
        assert!(kept.is_empty());
    }

    #[test]
    fn price_label_uses_dollar_signs() {
        let mut venue = kafe_osm::fallback::catalog().remove(0);
        assert_eq!(price_label(&venue), "$$");
        venue.price_level = kafe_core::PriceLevel::Free;
        assert_eq!(price_label(&venue), "free");
    }
}
