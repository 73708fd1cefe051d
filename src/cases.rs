use anyhow::{Context, Result};
use std::path::Path;

use crate::report::LocationCheck;

/// Locations used for manual checks against the stored fence
///
/// Covers points inside the fence, points near its edge and a point far
/// away with a very large accuracy radius.
pub fn default_cases() -> Vec<LocationCheck> {
    vec![
        LocationCheck::new(50.840473, -0.146755, 30.0),
        LocationCheck::new(50.842458, -0.150285, 5.0),
        LocationCheck::new(50.843317, -0.144960, 0.0),
        LocationCheck::new(44.197736, 1.183339, 1_000_000.0),
        LocationCheck::new(50.854067, -0.163824, 100.0),
    ]
}

/// Read a JSON array of `{"lat", "lon", "accuracy"}` cases
pub fn load_cases(path: &Path) -> Result<Vec<LocationCheck>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cases file: {:?}", path))?;
    let cases: Vec<LocationCheck> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse cases file: {:?}", path))?;
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::GeofenceEvaluator;

    #[test]
    fn test_default_cases_are_valid() {
        let cases = default_cases();
        assert_eq!(cases.len(), 5);
        assert!(cases.iter().all(|c| c.validate().is_ok()));
    }

    #[test]
    fn test_default_cases_against_fixture() {
        let ring =
            crate::source::parse_geofence(include_str!("../fixtures/geofence.json")).unwrap();
        let fence = GeofenceEvaluator::new(ring).unwrap();

        let results: Vec<bool> = default_cases()
            .iter()
            .map(|c| c.run(&fence).unwrap().result)
            .collect();

        assert_eq!(results, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_load_cases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(
            &path,
            r#"[{"lat": 50.84, "lon": -0.147, "accuracy": 10}, {"lat": 0, "lon": 0}]"#,
        )
        .unwrap();

        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0], LocationCheck::new(50.84, -0.147, 10.0));
        assert_eq!(cases[1].accuracy, 0.0);
    }

    #[test]
    fn test_load_cases_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(&path, r#"{"lat": 1}"#).unwrap();
        assert!(load_cases(&path).is_err());
    }
}
