//! Smart plug: reports a power consumption rate in watts.

use std::fmt;

use serde_json::{Map, Value};

use super::{
    FieldValue, SWITCHED_ON, SmartDevice, bounded, on_off, read_required, read_switched_on,
    tagged_record,
};
use crate::error::{SmartHomeError, UnknownFieldError, ValidationError};

/// A plug with a consumption rate between 0 and 150W.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plug {
    switched_on: bool,
    consumption_rate: u8,
}

impl Plug {
    pub const TAG: &'static str = "SmartPlug";
    pub const CONSUMPTION_RATE: &'static str = "consumption_rate";
    pub const MAX_CONSUMPTION_RATE: u8 = 150;
    pub const DEFAULT_CONSUMPTION_RATE: u8 = 45;

    /// Create a switched-off plug.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] unless `0 <= consumption_rate <= 150`.
    pub fn new(consumption_rate: i128) -> Result<Self, ValidationError> {
        let mut plug = Self::default();
        plug.set_consumption_rate(consumption_rate)?;
        Ok(plug)
    }

    #[must_use]
    pub fn consumption_rate(&self) -> u8 {
        self.consumption_rate
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] unless `0 <= rate <= 150`.
    pub fn set_consumption_rate(&mut self, rate: i128) -> Result<(), ValidationError> {
        self.consumption_rate = bounded(Self::CONSUMPTION_RATE, rate, Self::MAX_CONSUMPTION_RATE)?;
        Ok(())
    }

    pub(super) fn from_record(record: &Map<String, Value>) -> Result<Self, SmartHomeError> {
        let rate = read_required(record, Self::CONSUMPTION_RATE)?.as_int(Self::CONSUMPTION_RATE)?;
        let mut plug = Self::new(rate)?;
        plug.switched_on = read_switched_on(record)?;
        Ok(plug)
    }
}

impl Default for Plug {
    fn default() -> Self {
        Self {
            switched_on: false,
            consumption_rate: Self::DEFAULT_CONSUMPTION_RATE,
        }
    }
}

impl SmartDevice for Plug {
    fn switched_on(&self) -> bool {
        self.switched_on
    }

    fn set_switched_on(&mut self, on: bool) {
        self.switched_on = on;
    }

    fn set(&mut self, field: &str, value: &FieldValue) -> Result<(), SmartHomeError> {
        match field {
            SWITCHED_ON => self.switched_on = value.as_bool(SWITCHED_ON)?,
            Self::CONSUMPTION_RATE => {
                self.set_consumption_rate(value.as_int(Self::CONSUMPTION_RATE)?)?;
            }
            _ => {
                return Err(UnknownFieldError {
                    device: Self::TAG,
                    field: field.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn to_record(&self) -> Value {
        tagged_record(
            Self::TAG,
            self.switched_on,
            Self::CONSUMPTION_RATE,
            Value::from(self.consumption_rate),
        )
    }
}

impl fmt::Display for Plug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is {} with consumption rate {}W",
            Self::TAG,
            on_off(self.switched_on),
            self.consumption_rate
        )
    }
}
