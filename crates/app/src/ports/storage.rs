//! Storage port: the backing store for the whole set of homes.

use smarthome_domain::error::SmartHomeError;
use smarthome_domain::home::Home;

/// Full-snapshot persistence for homes.
///
/// There is no per-home update: `save` overwrites everything previously
/// stored with the given snapshot.
pub trait HomeStore {
    /// Read every stored home, in stored order.
    ///
    /// A store that has never been written yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Persistence`] when the backing store cannot
    /// be read or holds a malformed record.
    fn load(&self) -> Result<Vec<Home>, SmartHomeError>;

    /// Replace the stored snapshot with `homes`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Persistence`] when the write fails.
    fn save(&self, homes: &[Home]) -> Result<(), SmartHomeError>;
}
