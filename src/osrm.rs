//! OSRM HTTP adapter for location × customer cost matrices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OSRM answered with code {0}")]
    Service(String),

    #[error("Incomplete response: missing {0}")]
    IncompleteResponse(&'static str),
}

/// Which table annotation to read as the cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    Duration,
    Distance,
}

impl Annotation {
    fn as_str(self) -> &'static str {
        match self {
            Annotation::Duration => "duration",
            Annotation::Distance => "distance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub annotation: Annotation,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            annotation: Annotation::Duration,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, OsrmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Fetches the cost table from every source to every destination.
    pub fn table(
        &self,
        sources: &[(f64, f64)],
        destinations: &[(f64, f64)],
    ) -> Result<Vec<Vec<f64>>, OsrmError> {
        if sources.is_empty() || destinations.is_empty() {
            return Ok(vec![Vec::new(); sources.len()]);
        }

        let url = table_url(&self.config, sources, destinations);
        let body = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json::<OsrmTableResponse>()?;

        body.into_matrix(self.config.annotation)
    }
}

impl DistanceMatrixProvider for OsrmClient {
    type Error = OsrmError;

    fn matrix_for(
        &self,
        sources: &[(f64, f64)],
        destinations: &[(f64, f64)],
    ) -> Result<Vec<Vec<f64>>, OsrmError> {
        self.table(sources, destinations)
    }
}

/// Builds a table URL where sources come first in the coordinate list and
/// destinations follow.
fn table_url(config: &OsrmConfig, sources: &[(f64, f64)], destinations: &[(f64, f64)]) -> String {
    let coords = sources
        .iter()
        .chain(destinations)
        .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
        .collect::<Vec<_>>()
        .join(";");

    let source_idx = (0..sources.len())
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(";");
    let destination_idx = (sources.len()..sources.len() + destinations.len())
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{}/table/v1/{}/{}?sources={}&destinations={}&annotations={}",
        config.base_url,
        config.profile,
        coords,
        source_idx,
        destination_idx,
        config.annotation.as_str()
    )
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    fn into_matrix(self, annotation: Annotation) -> Result<Vec<Vec<f64>>, OsrmError> {
        if self.code != "Ok" {
            return Err(OsrmError::Service(self.code));
        }

        let rows = match annotation {
            Annotation::Duration => self.durations,
            Annotation::Distance => self.distances,
        }
        .ok_or(OsrmError::IncompleteResponse(annotation.as_str()))?;

        // OSRM reports unreachable pairs as null.
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(|value| value.unwrap_or(f64::INFINITY)).collect())
            .collect())
    }
}
