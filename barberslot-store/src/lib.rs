// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # BarberSlot Store
//!
//! State for the appointment selection flow.
//!
//! This crate provides:
//!
//! - **FlowState**: Pure reducer over selection, catalog, and availability
//! - **AppointmentFlowController**: Runs reducer effects against a [`barberslot_core::BookingApi`]
//! - **SettingsStore**: User preferences with persistence
//!
//! ## Usage
//!
//! ```ignore
//! use barberslot_store::{AppointmentFlowController, FlowConfig, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?.get().await;
//! let config = settings.flow_config("provider-1", CalendarDate::today())?;
//!
//! let mut flow = AppointmentFlowController::new(api, config);
//! flow.mount();
//! flow.settle().await;
//!
//! for item in flow.state().availability().items() {
//!     println!("{} {}", item.label(), item.available);
//! }
//! ```

pub mod availability;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod flow;
pub mod load;
pub mod persistence;
pub mod selection;
pub mod settings_store;

pub use availability::{AvailabilityRequest, AvailabilitySlot, RefetchOrdering};
pub use catalog::ProviderCatalog;
pub use controller::AppointmentFlowController;
pub use error::StoreError;
pub use flow::{FlowConfig, FlowEffect, FlowEvent, FlowState, PickerProps};
pub use load::{FlowFailure, LoadState};
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use selection::SelectionState;
pub use settings_store::{Settings, SettingsStore};
