//! Home: a named, ordered, bounded collection of devices.
//!
//! Devices are addressed by their position. Indices are not stable: removing
//! a device shifts every later device down by one, so callers must re-read
//! the list after each mutation instead of caching indices.

use crate::device::{Device, FieldValue, SmartDevice};
use crate::error::{CapacityError, IndexError, SmartHomeError, ValidationError};

/// A named group of at most [`Home::MAX_DEVICES`] devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Home {
    name: String,
    devices: Vec<Device>,
}

/// Persisted shape of a [`Home`]: its name and the ordered device records.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeRecord {
    pub name: String,
    pub devices: Vec<serde_json::Value>,
}

impl Home {
    pub const MAX_DEVICES: usize = 10;

    /// Create an empty home.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, SmartHomeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(Self {
            name,
            devices: Vec::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    #[must_use]
    pub fn device(&self, index: usize) -> Option<&Device> {
        self.devices.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.devices.len() >= Self::MAX_DEVICES
    }

    /// Number of devices currently switched on.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.devices.iter().filter(|d| d.switched_on()).count()
    }

    /// Append a device at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Capacity`] when the home already holds
    /// [`Home::MAX_DEVICES`] devices.
    pub fn add(&mut self, device: impl Into<Device>) -> Result<(), SmartHomeError> {
        if self.is_full() {
            return Err(CapacityError {
                capacity: Self::MAX_DEVICES,
            }
            .into());
        }
        self.devices.push(device.into());
        Ok(())
    }

    /// Remove and return the device at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Index`] when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<Device, SmartHomeError> {
        self.check_index(index)?;
        Ok(self.devices.remove(index))
    }

    /// Flip the on/off state of the device at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Index`] when `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Result<(), SmartHomeError> {
        self.device_mut(index)?.toggle();
        Ok(())
    }

    /// Set a named field on the device at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Index`] when `index` is out of range, or
    /// whatever [`SmartDevice::set`] rejects the value with.
    pub fn update(
        &mut self,
        index: usize,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), SmartHomeError> {
        self.device_mut(index)?.set(field, value)
    }

    /// Switch every device on or off, returning how many actually changed.
    pub fn switch_all(&mut self, on: bool) -> usize {
        let mut changed = 0;
        for device in self.devices.iter_mut().filter(|d| d.switched_on() != on) {
            device.set_switched_on(on);
            changed += 1;
        }
        changed
    }

    /// One-line summary such as `Lakeview (2/3 active)`.
    #[must_use]
    pub fn status_summary(&self) -> String {
        format!(
            "{} ({}/{} active)",
            self.name,
            self.active_count(),
            self.devices.len()
        )
    }

    #[must_use]
    pub fn to_record(&self) -> HomeRecord {
        HomeRecord {
            name: self.name.clone(),
            devices: self.devices.iter().map(SmartDevice::to_record).collect(),
        }
    }

    /// Rebuild a home, adding devices in record order.
    ///
    /// # Errors
    ///
    /// Fails on an empty name, on the first invalid device record, or with
    /// [`SmartHomeError::Capacity`] when there are more than
    /// [`Home::MAX_DEVICES`] records.
    pub fn from_record(record: &HomeRecord) -> Result<Self, SmartHomeError> {
        let mut home = Self::new(record.name.clone())?;
        for device in &record.devices {
            home.add(Device::from_record(device)?)?;
        }
        Ok(home)
    }

    fn check_index(&self, index: usize) -> Result<(), IndexError> {
        if index < self.devices.len() {
            Ok(())
        } else {
            Err(IndexError {
                index,
                len: self.devices.len(),
            })
        }
    }

    fn device_mut(&mut self, index: usize) -> Result<&mut Device, SmartHomeError> {
        self.check_index(index)?;
        Ok(&mut self.devices[index])
    }
}
