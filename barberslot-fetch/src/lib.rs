// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # BarberSlot Fetch
//!
//! REST client for the BarberSlot booking API.
//!
//! - [`client::HttpClient`] - reqwest wrapper with tracing and retries
//! - [`retry::RetryStrategy`] - Backoff policy for transient failures
//! - [`endpoints::Endpoints`] - URL construction for each route
//! - [`api::RestBookingApi`] - [`barberslot_core::BookingApi`] over HTTP
//!
//! ## Example
//!
//! ```ignore
//! use barberslot_fetch::{ClientSettings, RestBookingApi};
//!
//! let api = RestBookingApi::new(&ClientSettings::new("http://localhost:3333"))?;
//! let providers = api.fetch_providers().await?;
//! ```

pub mod api;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod retry;

pub use api::{ClientSettings, RestBookingApi};
pub use client::{DEFAULT_TIMEOUT_SECS, HttpClient};
pub use endpoints::Endpoints;
pub use error::FetchError;
pub use retry::RetryStrategy;
