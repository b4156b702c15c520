//! Registry: the single owned set of homes for a process run.
//!
//! The registry is opened once, which loads the store immediately. It is
//! mutated in memory and written back as a full snapshot with
//! [`Registry::save`], normally at controlled shutdown. Nothing is written
//! between those two points.

use chrono::{DateTime, Utc};
use smarthome_domain::error::{DuplicateError, NotFoundError, SmartHomeError};
use smarthome_domain::home::Home;

use crate::ports::HomeStore;

/// Whether the in-memory homes match the last write to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Loaded from the store and possibly changed since.
    Loaded,
    /// Written to the store at `at`, unchanged since.
    Persisted { at: DateTime<Utc> },
}

/// Homes keyed by unique name, iterated in insertion order.
pub struct Registry<S> {
    store: S,
    homes: Vec<Home>,
    state: RegistryState,
}

impl<S: HomeStore> Registry<S> {
    /// Open the registry, loading every home from `store`.
    ///
    /// # Errors
    ///
    /// Propagates any load failure from the store, and returns
    /// [`SmartHomeError::Duplicate`] if the store holds the same home name twice.
    #[tracing::instrument(skip(store))]
    pub fn open(store: S) -> Result<Self, SmartHomeError> {
        let loaded = store.load()?;
        let mut registry = Self {
            store,
            homes: Vec::with_capacity(loaded.len()),
            state: RegistryState::Loaded,
        };
        for home in loaded {
            registry.insert(home)?;
        }
        tracing::debug!(homes = registry.homes.len(), "registry loaded");
        Ok(registry)
    }

    /// Create an empty home named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Duplicate`] if the name is taken, or
    /// [`SmartHomeError::Validation`] if it is empty.
    #[tracing::instrument(skip(self))]
    pub fn add_home(&mut self, name: &str) -> Result<&mut Home, SmartHomeError> {
        let home = Home::new(name)?;
        self.insert(home)
    }

    /// Remove the home named `name`, if any. Missing names are not an error.
    #[tracing::instrument(skip(self))]
    pub fn remove_home(&mut self, name: &str) -> Option<Home> {
        let position = self.position(name)?;
        self.state = RegistryState::Loaded;
        Some(self.homes.remove(position))
    }

    /// Look up a home for display.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Home> {
        self.homes.iter().find(|home| home.name() == name)
    }

    /// Look up a home for mutation.
    ///
    /// The registry is considered changed as soon as a mutable borrow is
    /// handed out.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Home> {
        let position = self.position(name)?;
        self.state = RegistryState::Loaded;
        Some(&mut self.homes[position])
    }

    /// Like [`get_mut`](Self::get_mut) but a missing home is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no home is named `name`.
    pub fn home_mut(&mut self, name: &str) -> Result<&mut Home, SmartHomeError> {
        self.get_mut(name).ok_or_else(|| {
            NotFoundError {
                entity: "Home",
                id: name.to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// All homes, in insertion order.
    #[must_use]
    pub fn homes(&self) -> &[Home] {
        &self.homes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.homes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.homes.is_empty()
    }

    /// One status line per home, in insertion order.
    #[must_use]
    pub fn status_summaries(&self) -> Vec<String> {
        self.homes.iter().map(Home::status_summary).collect()
    }

    /// Write every home to the store, replacing what was there.
    ///
    /// # Errors
    ///
    /// Propagates the store's write failure; the state stays
    /// [`RegistryState::Loaded`] in that case.
    #[tracing::instrument(skip(self), fields(homes = self.homes.len()))]
    pub fn save(&mut self) -> Result<(), SmartHomeError> {
        self.store.save(&self.homes)?;
        self.state = RegistryState::Persisted { at: Utc::now() };
        tracing::info!("registry saved");
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> RegistryState {
        self.state
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.homes.iter().position(|home| home.name() == name)
    }

    fn insert(&mut self, home: Home) -> Result<&mut Home, SmartHomeError> {
        if self.contains(home.name()) {
            return Err(DuplicateError {
                entity: "Home",
                id: home.name().to_string(),
            }
            .into());
        }
        self.state = RegistryState::Loaded;
        let index = self.homes.len();
        self.homes.push(home);
        Ok(&mut self.homes[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthome_domain::device::{Device, DeviceKind, SmartDevice};
    use smarthome_domain::error::ValidationError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryHomeStore {
        homes: Arc<Mutex<Vec<Home>>>,
        saves: Arc<Mutex<usize>>,
    }

    impl InMemoryHomeStore {
        fn with(homes: Vec<Home>) -> Self {
            Self {
                homes: Arc::new(Mutex::new(homes)),
                saves: Arc::default(),
            }
        }

        fn stored(&self) -> Vec<Home> {
            self.homes.lock().unwrap().clone()
        }

        fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    impl HomeStore for InMemoryHomeStore {
        fn load(&self) -> Result<Vec<Home>, SmartHomeError> {
            Ok(self.homes.lock().unwrap().clone())
        }

        fn save(&self, homes: &[Home]) -> Result<(), SmartHomeError> {
            *self.homes.lock().unwrap() = homes.to_vec();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct BrokenStore;

    impl HomeStore for BrokenStore {
        fn load(&self) -> Result<Vec<Home>, SmartHomeError> {
            Err(SmartHomeError::Persistence(Box::new(std::io::Error::other(
                "unreadable",
            ))))
        }

        fn save(&self, _homes: &[Home]) -> Result<(), SmartHomeError> {
            Err(SmartHomeError::Persistence(Box::new(std::io::Error::other(
                "read-only",
            ))))
        }
    }

    fn home_with_devices(name: &str, kinds: &[DeviceKind]) -> Home {
        let mut home = Home::new(name).unwrap();
        for kind in kinds {
            home.add(Device::with_defaults(*kind)).unwrap();
        }
        home
    }

    #[test]
    fn should_start_empty_when_store_is_empty() {
        let registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.state(), RegistryState::Loaded);
    }

    #[test]
    fn should_load_homes_from_store_on_open() {
        let store = InMemoryHomeStore::with(vec![
            home_with_devices("Lakeview", &[DeviceKind::Plug]),
            home_with_devices("Cabin", &[]),
        ]);
        let registry = Registry::open(store).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Lakeview").map(Home::len), Some(1));
    }

    #[test]
    fn should_propagate_load_failure() {
        let result = Registry::open(BrokenStore);
        assert!(matches!(result, Err(SmartHomeError::Persistence(_))));
    }

    #[test]
    fn should_reject_duplicate_names_in_store() {
        let store = InMemoryHomeStore::with(vec![
            home_with_devices("Twin", &[]),
            home_with_devices("Twin", &[DeviceKind::Door]),
        ]);
        let result = Registry::open(store);
        assert!(matches!(result, Err(SmartHomeError::Duplicate(_))));
    }

    #[test]
    fn should_add_empty_home() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        let home = registry.add_home("Lakeview").unwrap();
        assert!(home.is_empty());
        assert!(registry.contains("Lakeview"));
    }

    #[test]
    fn should_reject_second_home_with_same_name() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        registry.add_home("X").unwrap();

        let result = registry.add_home("X");
        assert!(matches!(
            result,
            Err(SmartHomeError::Duplicate(DuplicateError { entity: "Home", ref id })) if id == "X"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_reject_empty_home_name() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        let result = registry.add_home("");
        assert!(matches!(
            result,
            Err(SmartHomeError::Validation(ValidationError::EmptyName))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn should_remove_existing_home() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        registry.add_home("Cabin").unwrap();

        let removed = registry.remove_home("Cabin");
        assert_eq!(removed.as_ref().map(Home::name), Some("Cabin"));
        assert!(registry.get("Cabin").is_none());
    }

    #[test]
    fn should_ignore_removal_of_missing_home() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        registry.add_home("Cabin").unwrap();

        assert!(registry.remove_home("Nowhere").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_return_none_for_missing_home_lookup() {
        let registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        assert!(registry.get("Nowhere").is_none());
    }

    #[test]
    fn should_return_not_found_for_missing_home_mutation() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        let result = registry.home_mut("Nowhere");
        assert!(matches!(result, Err(SmartHomeError::NotFound(_))));
    }

    #[test]
    fn should_keep_insertion_order_in_summaries() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        registry.add_home("Zeta").unwrap();
        let alpha = registry.add_home("Alpha").unwrap();
        alpha.add(Device::with_defaults(DeviceKind::Heater)).unwrap();
        alpha.toggle(0).unwrap();

        assert_eq!(
            registry.status_summaries(),
            vec!["Zeta (0/0 active)", "Alpha (1/1 active)"]
        );
    }

    #[test]
    fn should_write_full_snapshot_on_save() {
        let store = InMemoryHomeStore::default();
        let mut registry = Registry::open(store.clone()).unwrap();
        registry.add_home("Lakeview").unwrap();
        registry
            .home_mut("Lakeview")
            .unwrap()
            .add(Device::with_defaults(DeviceKind::Door))
            .unwrap();

        registry.save().unwrap();

        let stored = store.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name(), "Lakeview");
        assert_eq!(stored[0].len(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn should_not_write_until_saved() {
        let store = InMemoryHomeStore::default();
        let mut registry = Registry::open(store.clone()).unwrap();
        registry.add_home("Lakeview").unwrap();
        assert!(store.stored().is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn should_reload_equal_registry_after_save() {
        let store = InMemoryHomeStore::default();
        let mut registry = Registry::open(store.clone()).unwrap();
        let home = registry.add_home("Lakeview").unwrap();
        home.add(Device::with_defaults(DeviceKind::Plug)).unwrap();
        home.add(Device::with_defaults(DeviceKind::Heater)).unwrap();
        home.switch_all(true);
        registry.save().unwrap();

        let reopened = Registry::open(store).unwrap();
        assert_eq!(reopened.homes(), registry.homes());
        assert!(reopened.homes()[0].devices().iter().all(SmartDevice::switched_on));
    }

    #[test]
    fn should_track_persisted_state_until_next_mutation() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        registry.add_home("Lakeview").unwrap();

        registry.save().unwrap();
        assert!(matches!(registry.state(), RegistryState::Persisted { .. }));

        registry.get_mut("Lakeview").unwrap().switch_all(true);
        assert_eq!(registry.state(), RegistryState::Loaded);
    }

    #[test]
    fn should_stay_persisted_after_read_only_access() {
        let mut registry = Registry::open(InMemoryHomeStore::default()).unwrap();
        registry.add_home("Lakeview").unwrap();
        registry.save().unwrap();

        let _ = registry.get("Lakeview");
        let _ = registry.status_summaries();
        registry.remove_home("Nowhere");
        assert!(matches!(registry.state(), RegistryState::Persisted { .. }));
    }

    #[test]
    fn should_stay_loaded_when_save_fails() {
        let mut registry = Registry {
            store: BrokenStore,
            homes: Vec::new(),
            state: RegistryState::Loaded,
        };
        assert!(registry.save().is_err());
        assert_eq!(registry.state(), RegistryState::Loaded);
    }
}
