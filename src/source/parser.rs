use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::GeoPoint;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("geofence document has no geometry")]
    MissingGeometry,

    #[error("malformed geofence document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stored geofence document
///
/// `geometry` holds rings; only the first one is used since the fence is a
/// single polygon without holes.
#[derive(Debug, Deserialize)]
struct GeofenceDocument {
    results: GeofenceResults,
}

#[derive(Debug, Deserialize)]
struct GeofenceResults {
    #[serde(default)]
    geometry: Vec<Vec<GeoPoint>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeofenceInput {
    Document(GeofenceDocument),
    Ring(Vec<GeoPoint>),
}

/// Parse a geofence document into its vertex ring
///
/// Accepts either the stored `{"results": {"geometry": [[...]]}}` shape or a
/// bare array of points.
pub fn parse_geofence(json: &str) -> Result<Vec<GeoPoint>, SourceError> {
    let input: GeofenceInput = serde_json::from_str(json)?;

    let ring = match input {
        GeofenceInput::Document(doc) => doc.results.geometry.into_iter().next(),
        GeofenceInput::Ring(ring) => Some(ring),
    };

    match ring {
        Some(ring) if !ring.is_empty() => Ok(ring),
        _ => Err(SourceError::MissingGeometry),
    }
}

/// Read and parse a geofence document from disk
pub fn load_geofence(path: &Path) -> Result<Vec<GeoPoint>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read geofence file: {:?}", path))?;

    let ring = parse_geofence(&contents)
        .with_context(|| format!("Failed to parse geofence file: {:?}", path))?;

    tracing::info!(path = %path.display(), vertices = ring.len(), "loaded geofence");

    Ok(ring)
}
