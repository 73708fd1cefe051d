pub mod parser;
pub mod remote;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use parser::{SourceError, load_geofence, parse_geofence};
pub use remote::fetch_geofence;

use crate::config::RemoteConfig;
use crate::domain::GeoPoint;

/// Where a geofence document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeofenceLocation {
    File(PathBuf),
    Url(String),
}

impl GeofenceLocation {
    /// `http://` and `https://` prefixes select a URL, anything else is a path
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            GeofenceLocation::Url(location.to_string())
        } else {
            GeofenceLocation::File(PathBuf::from(location))
        }
    }

    pub fn load(&self, remote: &RemoteConfig) -> Result<Vec<GeoPoint>> {
        match self {
            GeofenceLocation::File(path) => load_geofence(path),
            GeofenceLocation::Url(url) => fetch_geofence(url, remote),
        }
    }
}

impl From<&Path> for GeofenceLocation {
    fn from(path: &Path) -> Self {
        GeofenceLocation::File(path.to_path_buf())
    }
}
