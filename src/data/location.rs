//! Location Splitter
//! Splits the combined "city, state" field of an incident.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location has no comma separator: {0:?}")]
    Malformed(String),
}

/// Split on the first comma into `(city, state_raw)`, both trimmed.
pub fn split_location(location: &str) -> Result<(String, String), LocationError> {
    let (city, state) = location
        .split_once(',')
        .ok_or_else(|| LocationError::Malformed(location.to_string()))?;
    Ok((city.trim().to_string(), state.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_city_and_state() {
        let (city, state) = split_location("Las Vegas, NV").unwrap();
        assert_eq!(city, "Las Vegas");
        assert_eq!(state, "NV");
    }

    #[test]
    fn trims_both_sides() {
        let (city, state) = split_location("  Sutherland Springs ,   Texas  ").unwrap();
        assert_eq!(city, "Sutherland Springs");
        assert_eq!(state, "Texas");
    }

    #[test]
    fn only_first_comma_splits() {
        let (city, state) = split_location("Washington, D.C., USA").unwrap();
        assert_eq!(city, "Washington");
        assert_eq!(state, "D.C., USA");
    }

    #[test]
    fn missing_comma_is_malformed() {
        assert_eq!(
            split_location("Orlando Florida"),
            Err(LocationError::Malformed("Orlando Florida".into()))
        );
    }

    #[test]
    fn empty_parts_are_allowed() {
        let (city, state) = split_location(",").unwrap();
        assert!(city.is_empty());
        assert!(state.is_empty());
    }
}
