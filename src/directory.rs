//! In-memory fleet directory and the plain-text points loader.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::{Depot, Location, Vehicle};
use crate::traits::{FleetDirectory, WeightSource};

/// Directory backed by values already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryDirectory {
    depot: Depot,
    vehicle: Vehicle,
    locations: Vec<Location>,
    weights: HashMap<String, f64>,
}

impl InMemoryDirectory {
    pub fn new(depot: Depot, vehicle: Vehicle, locations: Vec<Location>) -> Self {
        Self {
            depot,
            vehicle,
            locations,
            weights: HashMap::new(),
        }
    }

    pub fn with_weight(mut self, location_id: impl Into<String>, weight_kg: f64) -> Self {
        self.weights.insert(location_id.into(), weight_kg);
        self
    }
}

impl FleetDirectory for InMemoryDirectory {
    fn depot(&self) -> &Depot {
        &self.depot
    }

    fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    fn locations(&self) -> &[Location] {
        &self.locations
    }
}

impl WeightSource for InMemoryDirectory {
    fn weight_for(&self, location_id: &str) -> Option<f64> {
        self.weights.get(location_id).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PointsError {
    #[error("cannot read points file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("points file {0} contains no usable points")]
    Empty(PathBuf),
}

/// Parse `name lon lat` lines. The name doubles as the location id.
///
/// Blank lines, `#` comments, short lines and lines with unparsable
/// coordinates are skipped.
pub fn parse_points(text: &str) -> Vec<Location> {
    let mut points = Vec::new();
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            debug!(line = line_no + 1, "skipping short points line");
            continue;
        }
        match (parts[1].parse::<f64>(), parts[2].parse::<f64>()) {
            (Ok(lon), Ok(lat)) => points.push(Location::new(parts[0], parts[0], lat, lon)),
            _ => debug!(line = line_no + 1, "skipping points line with bad coordinates"),
        }
    }
    points
}

/// Load a points file from disk.
pub fn load_points(path: &Path) -> Result<Vec<Location>, PointsError> {
    let text = fs::read_to_string(path).map_err(|source| PointsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_points(&text);
    if points.is_empty() {
        return Err(PointsError::Empty(path.to_path_buf()));
    }
    Ok(points)
}
