//! # smarthome-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the `HomeStore` port that storage adapters implement
//! - Provide the `Registry` use-case: the single owned set of homes, keyed by
//!   name, loaded from the store at start and saved back as a full snapshot
//!
//! ## Dependency rule
//! Depends on `smarthome-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
