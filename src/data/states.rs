//! State Normalizer Module
//! Maps raw state tokens (full names, abbreviations, known variants) to
//! canonical two-letter codes.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The 50 states by full name and postal code.
const STATES: [(&str, &str); 50] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

pub const DC: &str = "DC";

/// Spellings of the District of Columbia seen in the source data.
const DC_ALIASES: [&str; 4] = ["DC", "D.C.", "Washington D.C.", "District of Columbia"];

/// Misspellings present in the source data.
const MISSPELLINGS: [(&str, &str); 1] = [("Lousiana", "LA")];

static STATE_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(STATES.len() * 2 + DC_ALIASES.len() + MISSPELLINGS.len());
    for (name, code) in STATES {
        table.insert(name, code);
        table.insert(code, code);
    }
    for alias in DC_ALIASES {
        table.insert(alias, DC);
    }
    for (variant, code) in MISSPELLINGS {
        table.insert(variant, code);
    }
    table
});

/// Look up a trimmed state token. Matching is exact and case-sensitive.
pub fn normalize_state(state_raw: &str) -> Option<&'static str> {
    STATE_TABLE.get(state_raw).copied()
}

/// All canonical codes: the 50 states followed by DC.
pub fn canonical_codes() -> impl Iterator<Item = &'static str> {
    STATES.iter().map(|(_, code)| *code).chain(std::iter::once(DC))
}

/// Full name for a canonical code, used for labels and tooltips.
pub fn state_name(code: &str) -> Option<&'static str> {
    if code == DC {
        return Some("District of Columbia");
    }
    STATES.iter().find(|(_, c)| *c == code).map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_names_and_codes_agree() {
        for (name, code) in STATES {
            assert_eq!(normalize_state(name), Some(code), "full name {name}");
            assert_eq!(normalize_state(code), Some(code), "abbreviation {code}");
        }
    }

    #[test]
    fn dc_variants_map_to_dc() {
        for variant in ["D.C.", "Washington D.C.", "District of Columbia", "DC"] {
            assert_eq!(normalize_state(variant), Some("DC"));
        }
    }

    #[test]
    fn louisiana_misspelling() {
        assert_eq!(normalize_state("Lousiana"), Some("LA"));
        assert_eq!(normalize_state("Louisiana"), Some("LA"));
    }

    #[test]
    fn unknown_tokens_are_missing() {
        assert_eq!(normalize_state("Atlantis"), None);
        assert_eq!(normalize_state(""), None);
        // no case folding and no trimming here
        assert_eq!(normalize_state("nevada"), None);
        assert_eq!(normalize_state(" NV"), None);
    }

    #[test]
    fn every_mapped_value_is_canonical() {
        for code in STATE_TABLE.values() {
            assert!(canonical_codes().any(|c| c == *code));
            assert_eq!(code.len(), 2);
        }
    }

    #[test]
    fn canonical_codes_cover_states_and_dc() {
        let codes: Vec<_> = canonical_codes().collect();
        assert_eq!(codes.len(), 51);
        assert!(codes.contains(&"DC"));
        assert_eq!(state_name("WY"), Some("Wyoming"));
        assert_eq!(state_name("DC"), Some("District of Columbia"));
        assert_eq!(state_name("XX"), None);
    }
}
