pub(crate) mod client;
pub mod dedup;
pub mod error;
pub mod fallback;
pub mod finder;
pub mod identity;
pub mod nominatim;
pub mod normalize;
pub mod overpass;
pub mod session;
pub mod synth;
pub mod types;

pub use dedup::dedupe_by_name;
pub use error::OsmError;
pub use finder::{CafeFinder, NearbyQuery, DEFAULT_RADIUS_M};
pub use identity::{normalize, OsmKind, StableId};
pub use nominatim::{NominatimClient, PlaceCandidate, SearchSettings, PLACE_SUGGESTION_LIMIT};
pub use normalize::{
    venue_from_lookup, venue_from_nominatim, venue_from_overpass, venue_from_search_hit, Extras,
    MappingError,
};
pub use overpass::{build_cafe_query, OverpassClient};
pub use session::{Generation, SearchSession, SessionResult};
pub use synth::{synthesize, SyntheticAttributes};
pub use types::{NominatimPlace, OverpassElement};
