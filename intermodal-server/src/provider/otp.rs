//! OpenTripPlanner HTTP client.
//!
//! Queries the `plan` endpoint of an OTP router for a single mode and
//! converts the first returned itinerary into domain types.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Itinerary, Location, TransportMode};

use super::ItineraryProvider;
use super::convert::convert_itinerary;
use super::error::ProviderError;
use super::types::PlanResponse;

/// Default base URL for a locally running OTP instance.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the OTP client.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Base URL of the OTP server, without the `/otp/...` path
    pub base_url: String,
    /// Router to plan against
    pub router: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OtpConfig {
    /// Create a new config pointing at the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            router: "default".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Plan against a router other than `default`.
    pub fn with_router(mut self, router: impl Into<String>) -> Self {
        self.router = router.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// OpenTripPlanner API client.
///
/// Uses a semaphore to limit concurrent requests so graph expansion does not
/// flood the planner.
#[derive(Debug, Clone)]
pub struct OtpClient {
    http: reqwest::Client,
    plan_url: String,
    semaphore: Arc<Semaphore>,
}

impl OtpClient {
    /// Create a new OTP client with the given configuration.
    ///
    /// Rejects a zero request limit, which would leave every fetch waiting
    /// for a permit forever.
    pub fn new(config: OtpConfig) -> Result<Self, ProviderError> {
        if config.max_concurrent == 0 {
            return Err(ProviderError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            plan_url: format!(
                "{}/otp/routers/{}/plan",
                config.base_url.trim_end_matches('/'),
                config.router
            ),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Plan a trip with a single mode.
    pub async fn plan(
        &self,
        origin: Location,
        destination: Location,
        mode: TransportMode,
    ) -> Result<Itinerary, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Closed)?;

        debug!(%origin, %destination, %mode, "Requesting OTP plan");

        let response = self
            .http
            .get(&self.plan_url)
            .query(&[
                ("fromPlace", origin.to_string()),
                ("toPlace", destination.to_string()),
                ("mode", mode_param(mode).to_string()),
                ("showIntermediateStops", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_plan(&body)
    }
}

impl ItineraryProvider for OtpClient {
    async fn fetch_itinerary(
        &self,
        origin: Location,
        destination: Location,
        mode: TransportMode,
    ) -> Result<Itinerary, ProviderError> {
        self.plan(origin, destination, mode).await
    }
}

/// OTP `mode` query parameter for a transport mode.
///
/// Transit trips need walking to reach and leave stops.
fn mode_param(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Walk => "WALK",
        TransportMode::Bicycle => "BICYCLE",
        TransportMode::Car => "CAR",
        TransportMode::Transit => "TRANSIT,WALK",
    }
}

/// Parse a `plan` response body and convert its first itinerary.
pub fn parse_plan(body: &str) -> Result<Itinerary, ProviderError> {
    let response: PlanResponse = serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    let first = response
        .plan
        .as_ref()
        .and_then(|plan| plan.itineraries.as_deref())
        .and_then(|itineraries| itineraries.first());

    let Some(first) = first else {
        return Err(match response.error {
            Some(error) => ProviderError::NoItinerary {
                code: error.id,
                reason: error.describe(),
            },
            None => ProviderError::no_itinerary("empty plan"),
        });
    };

    Ok(convert_itinerary(first)?)
}
