//! Trait definitions for BarberSlot.
//!
//! [`BookingApi`] is the retrieval boundary the selection flow depends on.
//! The REST implementation lives in `barberslot-fetch`; tests substitute
//! in-memory fakes.

use async_trait::async_trait;

use crate::models::{AvailabilityItem, CalendarDate, Provider};

/// Error returned across the retrieval boundary.
pub type ApiError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Read access to providers and their daily schedules.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Fetches all providers, in server order.
    async fn list_providers(&self) -> Result<Vec<Provider>, ApiError>;

    /// Fetches the hour slots offered by `provider_id` on `date`.
    async fn day_availability(
        &self,
        provider_id: &str,
        date: CalendarDate,
    ) -> Result<Vec<AvailabilityItem>, ApiError>;
}

#[async_trait]
impl<T: BookingApi + ?Sized> BookingApi for std::sync::Arc<T> {
    async fn list_providers(&self) -> Result<Vec<Provider>, ApiError> {
        (**self).list_providers().await
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: CalendarDate,
    ) -> Result<Vec<AvailabilityItem>, ApiError> {
        (**self).day_availability(provider_id, date).await
    }
}
