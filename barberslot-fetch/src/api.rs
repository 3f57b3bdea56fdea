//! REST implementation of [`BookingApi`].

use async_trait::async_trait;
use barberslot_core::{ApiError, AvailabilityItem, BookingApi, CalendarDate, DayAvailability, Provider};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::client::{DEFAULT_TIMEOUT_SECS, HttpClient};
use crate::endpoints::Endpoints;
use crate::error::FetchError;
use crate::retry::RetryStrategy;

// ============================================================================
// Client Settings
// ============================================================================

/// Settings for the REST client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API base URL.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry behavior for transient failures.
    pub retry: RetryStrategy,
    /// Optional bearer token.
    pub bearer_token: Option<String>,
}

impl ClientSettings {
    /// Creates settings for a base URL with default timeout and retries.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryStrategy::default(),
            bearer_token: None,
        }
    }

    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry strategy.
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the bearer token.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }
}

// ============================================================================
// REST Booking API
// ============================================================================

/// Booking API over JSON/REST.
#[derive(Debug, Clone)]
pub struct RestBookingApi {
    http: HttpClient,
    endpoints: Endpoints,
}

impl RestBookingApi {
    /// Creates a client from settings.
    pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
        let endpoints = Endpoints::new(&settings.base_url)?;
        let mut http =
            HttpClient::with_timeout(settings.timeout)?.with_retry_strategy(settings.retry.clone());
        if let Some(token) = &settings.bearer_token {
            http = http.with_bearer_token(token.clone());
        }
        info!(base_url = %endpoints.base(), "Booking API client ready");
        Ok(Self { http, endpoints })
    }

    /// Returns the endpoint builder.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetches all providers.
    #[instrument(skip(self))]
    pub async fn fetch_providers(&self) -> Result<Vec<Provider>, FetchError> {
        let providers: Vec<Provider> = self.http.get_json(&self.endpoints.providers()).await?;
        debug!(count = providers.len(), "Providers fetched");
        Ok(providers)
    }

    /// Fetches one day of a provider's schedule.
    #[instrument(skip(self), fields(date = %date))]
    pub async fn fetch_day_availability(
        &self,
        provider_id: &str,
        date: CalendarDate,
    ) -> Result<DayAvailability, FetchError> {
        let url = self.endpoints.day_availability(provider_id, date);
        let items: Vec<AvailabilityItem> = self.http.get_json(&url).await?;
        let day = DayAvailability::from_items(items)?;
        debug!(slots = day.len(), open = day.open_hours().len(), "Availability fetched");
        Ok(day)
    }
}

#[async_trait]
impl BookingApi for RestBookingApi {
    async fn list_providers(&self) -> Result<Vec<Provider>, ApiError> {
        Ok(self.fetch_providers().await?)
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: CalendarDate,
    ) -> Result<Vec<AvailabilityItem>, ApiError> {
        Ok(self.fetch_day_availability(provider_id, date).await?.into())
    }
}
