//! # smarthome-domain
//!
//! Pure domain model for the smarthome record manager.
//!
//! ## Responsibilities
//! - Error conventions shared by every crate in the workspace
//! - Define **Devices** (plugs, heaters, doors) with validated setters
//! - Define **Homes** (named, ordered groups of at most ten devices)
//! - Convert both to and from their persisted JSON record shape
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Persistence boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod device;
pub mod home;
