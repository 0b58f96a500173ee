// src/neighborhoods.rs

//! Static neighborhood ("dong") data.
//!
//! The adjacency table stands in for a live proximity service: each known
//! neighborhood maps to itself followed by up to four neighbors.

/// Suffix that marks a neighborhood-level token in Korean addresses.
pub const NEIGHBORHOOD_SUFFIX: char = '동';

/// Selection shown before anything has been resolved, and the name used
/// when every geocoding provider fails.
pub const PLACEHOLDER_NEIGHBORHOOD: &str = "내 동네";

/// Name used when a provider answered but no neighborhood could be derived.
pub const UNKNOWN_NEIGHBORHOOD: &str = "알 수 없는 동";

/// Candidate list used when nothing has been persisted yet.
pub const DEFAULT_CANDIDATES: [&str; 8] = [
    "역삼동",
    "삼성동",
    "대치동",
    "청담동",
    "압구정동",
    "신사동",
    "논현동",
    "개포동",
];

/// Maximum number of entries a nearby list can hold.
pub const MAX_NEARBY: usize = 5;

const ADJACENCY: &[(&str, [&str; MAX_NEARBY])] = &[
    // Seoul, Gangnam-gu
    ("역삼동", ["역삼동", "삼성동", "대치동", "청담동", "개포동"]),
    ("삼성동", ["삼성동", "역삼동", "대치동", "청담동", "신사동"]),
    ("대치동", ["대치동", "역삼동", "삼성동", "개포동", "도곡동"]),
    ("청담동", ["청담동", "삼성동", "신사동", "압구정동", "역삼동"]),
    ("압구정동", ["압구정동", "청담동", "신사동", "논현동", "삼성동"]),
    ("신사동", ["신사동", "압구정동", "논현동", "청담동", "삼성동"]),
    ("논현동", ["논현동", "신사동", "압구정동", "역삼동", "서초동"]),
    ("개포동", ["개포동", "대치동", "역삼동", "일원동", "수서동"]),
    // Hanam-si
    ("신장동", ["신장동", "덕풍동", "풍산동", "창우동", "하산곡동"]),
    ("덕풍동", ["덕풍동", "신장동", "풍산동", "춘궁동", "상산곡동"]),
    ("풍산동", ["풍산동", "신장동", "덕풍동", "창우동", "교산동"]),
    ("창우동", ["창우동", "풍산동", "신장동", "하산곡동", "춘궁동"]),
    ("춘궁동", ["춘궁동", "덕풍동", "창우동", "상산곡동", "망월동"]),
    ("하산곡동", ["하산곡동", "신장동", "창우동", "상산곡동", "초이동"]),
    ("상산곡동", ["상산곡동", "하산곡동", "덕풍동", "춘궁동", "초이동"]),
    ("교산동", ["교산동", "풍산동", "창우동", "미사동", "배알미동"]),
    ("미사동", ["미사동", "교산동", "망월동", "풍산동", "배알미동"]),
    ("망월동", ["망월동", "미사동", "춘궁동", "초이동", "배알미동"]),
    ("초이동", ["초이동", "하산곡동", "상산곡동", "망월동", "배알미동"]),
    ("배알미동", ["배알미동", "교산동", "미사동", "망월동", "초이동"]),
];

/// Nearby neighborhoods for `name`, starting with `name` itself.
///
/// Unknown names yield a single-entry list.
pub fn nearby_neighborhoods(name: &str) -> Vec<String> {
    ADJACENCY
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, nearby)| nearby.iter().map(|n| n.to_string()).collect())
        .unwrap_or_else(|| vec![name.to_string()])
}

/// Whether the adjacency table knows `name`.
pub fn is_known(name: &str) -> bool {
    ADJACENCY.iter().any(|(key, _)| *key == name)
}

/// All neighborhoods with an adjacency entry, in table order.
pub fn known_neighborhoods() -> impl Iterator<Item = &'static str> {
    ADJACENCY.iter().map(|(key, _)| *key)
}

/// Built-in candidate list as owned strings.
pub fn default_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(|n| n.to_string()).collect()
}
