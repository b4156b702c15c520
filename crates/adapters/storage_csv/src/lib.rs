//! # smarthome-adapter-storage-csv
//!
//! Flat-file persistence adapter: one CSV row per home.
//!
//! ## Responsibilities
//! - Implement the `HomeStore` port defined in `smarthome-app::ports::storage`
//! - Map between domain homes and `Home Name,Devices` rows, where the devices
//!   column is a JSON array of device records
//! - Replace the file atomically on save
//!
//! ## Dependency rule
//! Depends on `smarthome-app` (for the port trait) and `smarthome-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod home_store;

pub use error::StorageError;
pub use home_store::CsvHomeStore;
