//! HTTP client for the thermostat backend.

use reqwest::Client;
use thiserror::Error;

use crate::controls::ControlFlags;
use crate::state::{ApiEnvelope, ThermostatState};

#[derive(Debug, Error)]
pub enum ApiError {
    /// `success: false` from the backend; the message is shown to the user.
    #[error("backend rejected request: {0}")]
    Backend(String),
    #[error("backend response carried no state")]
    MissingData,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub struct BackendClient {
    http: Client,
    base: String,
}

impl BackendClient {
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { http, base }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn fetch_state(&self) -> Result<ThermostatState, ApiError> {
        let envelope: ApiEnvelope = self
            .http
            .get(self.url("/api/state"))
            .send()
            .await?
            .json()
            .await?;
        unwrap_envelope(envelope)
    }

    pub async fn set_controls(&self, flags: &ControlFlags) -> Result<ThermostatState, ApiError> {
        let envelope: ApiEnvelope = self
            .http
            .post(self.url("/api/state/set"))
            .form(&flags.to_form())
            .send()
            .await?
            .json()
            .await?;
        unwrap_envelope(envelope)
    }

    pub async fn resume_schedule(&self) -> Result<ThermostatState, ApiError> {
        let envelope: ApiEnvelope = self
            .http
            .post(self.url("/api/state/resume"))
            .send()
            .await?
            .json()
            .await?;
        unwrap_envelope(envelope)
    }

    pub async fn set_target_temp(
        &self,
        target_room: &str,
        temp_min: f64,
        temp_max: f64,
    ) -> Result<ThermostatState, ApiError> {
        let envelope: ApiEnvelope = self
            .http
            .post(self.url("/api/state/temp"))
            .form(&[
                ("targetRoom", target_room.to_string()),
                ("tempMin", temp_min.to_string()),
                ("tempMax", temp_max.to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;
        unwrap_envelope(envelope)
    }
}

fn unwrap_envelope(envelope: ApiEnvelope) -> Result<ThermostatState, ApiError> {
    if !envelope.success {
        return Err(ApiError::Backend(
            envelope.message.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    envelope.data.ok_or(ApiError::MissingData)
}
