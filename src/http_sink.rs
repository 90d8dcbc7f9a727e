//! HTTP adapter for step telemetry.

use serde::Serialize;

use crate::planner::RouteSummary;
use crate::telemetry::{StepMessage, TelemetryError};
use crate::traits::TelemetrySink;

#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Endpoint receiving every step and the summary as a JSON POST body.
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for HttpSinkConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/telemetry".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTelemetrySink {
    config: HttpSinkConfig,
    client: reqwest::blocking::Client,
}

impl HttpTelemetrySink {
    pub fn new(config: HttpSinkConfig) -> Result<Self, TelemetryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn post<T: Serialize>(&self, body: &T) -> Result<(), TelemetryError> {
        self.client
            .post(&self.config.url)
            .json(body)
            .send()
            .and_then(|resp| resp.error_for_status())?;
        Ok(())
    }
}

impl TelemetrySink for HttpTelemetrySink {
    fn send_step(&self, step: &StepMessage) -> Result<(), TelemetryError> {
        self.post(step)
    }

    fn send_summary(&self, summary: &RouteSummary) -> Result<(), TelemetryError> {
        self.post(summary)
    }
}
