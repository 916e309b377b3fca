use super::*;

use kafe_core::{Category, SortBy};

#[test]
fn parses_nearby_with_defaults() {
    let cli = Cli::try_parse_from(["kafe", "nearby"]).expect("expected valid cli args");
    let Commands::Nearby(args) = cli.command else {
        panic!("expected nearby command");
    };
    assert_eq!(args.lat, None);
    assert_eq!(args.radius, None);
    assert_eq!(args.keyword, None);
    assert!(!args.json);
}

#[test]
fn parses_nearby_with_negative_coordinates_and_filters() {
    let cli = Cli::try_parse_from([
        "kafe",
        "nearby",
        "--lat",
        "-6.2",
        "--lng",
        "106.8",
        "--radius",
        "1500",
        "--keyword",
        "kopi susu",
        "--category",
        "indonesian",
        "--min-rating",
        "4.2",
        "--sort",
        "reviews",
        "--open-now",
        "--json",
    ])
    .expect("expected valid cli args");

    let Commands::Nearby(args) = cli.command else {
        panic!("expected nearby command");
    };
    assert_eq!(args.lat, Some(-6.2));
    assert_eq!(args.lng, Some(106.8));
    assert_eq!(args.radius, Some(1500));
    assert_eq!(args.keyword.as_deref(), Some("kopi susu"));
    assert_eq!(args.category, Some(Category::Indonesian));
    assert_eq!(args.min_rating, Some(4.2));
    assert_eq!(args.sort, Some(SortBy::ReviewCount));
    assert!(args.open_now);
    assert!(args.json);
}

#[test]
fn nearby_lat_requires_lng() {
    let result = Cli::try_parse_from(["kafe", "nearby", "--lat", "-6.2"]);
    assert!(result.is_err());
}

#[test]
fn nearby_rejects_unknown_sort_key() {
    let result = Cli::try_parse_from(["kafe", "nearby", "--sort", "vibes"]);
    assert!(result.is_err());
}

#[test]
fn parses_detail_command() {
    let cli = Cli::try_parse_from(["kafe", "detail", "N123", "--json"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Detail { ref id, json: true } if id == "N123"
    ));
}

#[test]
fn parses_location_show() {
    let cli = Cli::try_parse_from(["kafe", "location", "show"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Location {
            command: LocationCommands::Show
        }
    ));
}

#[test]
fn parses_location_set_by_query() {
    let cli = Cli::try_parse_from(["kafe", "location", "set", "--query", "Bandung"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Location {
            command: LocationCommands::Set {
                query: Some(ref q),
                lat: None,
                lng: None,
                city: None,
            }
        } if q == "Bandung"
    ));
}

#[test]
fn parses_location_set_by_coordinates() {
    let cli = Cli::try_parse_from([
        "kafe", "location", "set", "--lat", "-6.9", "--lng", "107.6", "--city", "Bandung",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Location {
            command: LocationCommands::Set {
                query: None,
                lat: Some(_),
                lng: Some(_),
                city: Some(ref c),
            }
        } if c == "Bandung"
    ));
}

#[test]
fn location_set_query_conflicts_with_coordinates() {
    let result = Cli::try_parse_from([
        "kafe", "location", "set", "--query", "Bandung", "--lat", "-6.9", "--lng", "107.6",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_location_search() {
    let cli = Cli::try_parse_from(["kafe", "location", "search", "Jakarta Selatan"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Location {
            command: LocationCommands::Search { ref text }
        } if text == "Jakarta Selatan"
    ));
}

#[test]
fn parses_browse_with_radius() {
    let cli = Cli::try_parse_from(["kafe", "browse", "--radius", "800"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Browse { radius: Some(800) }
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["kafe"]).is_err());
}
