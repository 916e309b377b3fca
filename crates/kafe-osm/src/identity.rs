//! Stable venue identifiers.
//!
//! An identifier is the OSM element kind's code letter followed by its
//! numeric id (`N123`, `W456`, `R789`). This is the exact form Nominatim's
//! `lookup?osm_ids=` accepts, so an id produced from any upstream record can
//! be resolved again later.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsmKind {
    Node,
    Way,
    Relation,
}

impl OsmKind {
    /// Maps an upstream `type`/`osm_type` value onto a kind.
    ///
    /// Absent or unrecognized names default to [`OsmKind::Node`].
    #[must_use]
    pub fn from_type_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("way" | "w") => OsmKind::Way,
            Some("relation" | "r") => OsmKind::Relation,
            _ => OsmKind::Node,
        }
    }

    #[must_use]
    pub fn code(self) -> char {
        match self {
            OsmKind::Node => 'N',
            OsmKind::Way => 'W',
            OsmKind::Relation => 'R',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(OsmKind::Node),
            'W' => Some(OsmKind::Way),
            'R' => Some(OsmKind::Relation),
            _ => None,
        }
    }
}

/// Builds the stable identifier for an upstream element.
#[must_use]
pub fn normalize(kind: OsmKind, id: u64) -> String {
    StableId { kind, id }.to_string()
}

/// A parsed stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StableId {
    pub kind: OsmKind,
    pub id: u64,
}

impl StableId {
    /// Parses `N123`-style identifiers. Returns `None` for anything else,
    /// including reserved fallback ids.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let kind = OsmKind::from_code(chars.next()?)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let id = digits.parse().ok()?;
        Some(Self { kind, id })
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.code(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefixes_kind_code() {
        assert_eq!(normalize(OsmKind::Node, 123), "N123");
        assert_eq!(normalize(OsmKind::Way, 456), "W456");
        assert_eq!(normalize(OsmKind::Relation, 789), "R789");
    }

    #[test]
    fn missing_or_unknown_kind_defaults_to_node() {
        assert_eq!(OsmKind::from_type_name(None), OsmKind::Node);
        assert_eq!(OsmKind::from_type_name(Some("area")), OsmKind::Node);
        assert_eq!(OsmKind::from_type_name(Some("node")), OsmKind::Node);
        assert_eq!(OsmKind::from_type_name(Some("Way")), OsmKind::Way);
        assert_eq!(OsmKind::from_type_name(Some("relation")), OsmKind::Relation);
    }

    #[test]
    fn parse_round_trips_normalize() {
        for (kind, id) in [
            (OsmKind::Node, 1),
            (OsmKind::Way, 987_654_321),
            (OsmKind::Relation, 42),
        ] {
            let stable = normalize(kind, id);
            assert_eq!(StableId::parse(&stable), Some(StableId { kind, id }));
        }
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        assert_eq!(StableId::parse(""), None);
        assert_eq!(StableId::parse("N"), None);
        assert_eq!(StableId::parse("Z999999"), None);
        assert_eq!(StableId::parse("n123"), None);
        assert_eq!(StableId::parse("N12a"), None);
        assert_eq!(StableId::parse("N-12"), None);
        assert_eq!(StableId::parse("mock-1"), None);
    }
}
