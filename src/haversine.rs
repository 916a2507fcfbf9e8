//! Haversine distance matrix provider (fallback when OSRM unavailable).
//!
//! Uses great-circle distance to estimate travel time between facility
//! locations and customers. Less accurate than OSRM (ignores roads) but
//! always available.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::traits::DistanceMatrixProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based distance matrix provider.
///
/// Estimates travel time in seconds using straight-line distance and an
/// assumed speed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two (lat, lng) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        km / self.speed_kmh * 3600.0
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    type Error = Infallible;

    fn matrix_for(
        &self,
        sources: &[(f64, f64)],
        destinations: &[(f64, f64)],
    ) -> Result<Vec<Vec<f64>>, Infallible> {
        Ok(sources
            .iter()
            .map(|from| {
                destinations
                    .iter()
                    .map(|to| self.km_to_seconds(Self::haversine_km(*from, *to)))
                    .collect()
            })
            .collect())
    }
}
