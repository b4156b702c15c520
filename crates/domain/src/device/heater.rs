//! Smart heater: an integral power setting from 0 to 5.

use std::fmt;

use serde_json::{Map, Value};

use super::{
    FieldValue, SWITCHED_ON, SmartDevice, bounded, on_off, read_required, read_switched_on,
    tagged_record,
};
use crate::error::{SmartHomeError, UnknownFieldError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heater {
    switched_on: bool,
    setting: u8,
}

impl Heater {
    pub const TAG: &'static str = "SmartHeater";
    pub const SETTING: &'static str = "setting";
    pub const MAX_SETTING: u8 = 5;
    pub const DEFAULT_SETTING: u8 = 2;

    /// Create a switched-off heater at the given setting.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] unless `0 <= setting <= 5`.
    pub fn with_setting(setting: i128) -> Result<Self, ValidationError> {
        let mut heater = Self::default();
        heater.set_setting(setting)?;
        Ok(heater)
    }

    #[must_use]
    pub fn setting(&self) -> u8 {
        self.setting
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] unless `0 <= setting <= 5`.
    pub fn set_setting(&mut self, setting: i128) -> Result<(), ValidationError> {
        self.setting = bounded(Self::SETTING, setting, Self::MAX_SETTING)?;
        Ok(())
    }

    pub(super) fn from_record(record: &Map<String, Value>) -> Result<Self, SmartHomeError> {
        let setting = read_required(record, Self::SETTING)?.as_int(Self::SETTING)?;
        let mut heater = Self::with_setting(setting)?;
        heater.switched_on = read_switched_on(record)?;
        Ok(heater)
    }
}

impl Default for Heater {
    fn default() -> Self {
        Self {
            switched_on: false,
            setting: Self::DEFAULT_SETTING,
        }
    }
}

impl SmartDevice for Heater {
    fn switched_on(&self) -> bool {
        self.switched_on
    }

    fn set_switched_on(&mut self, on: bool) {
        self.switched_on = on;
    }

    fn set(&mut self, field: &str, value: &FieldValue) -> Result<(), SmartHomeError> {
        match field {
            SWITCHED_ON => self.switched_on = value.as_bool(SWITCHED_ON)?,
            Self::SETTING => self.set_setting(value.as_int(Self::SETTING)?)?,
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
            Self::SETTING,
            Value::from(self.setting),
        )
    }
}

impl fmt::Display for Heater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is {} with setting {}",
            Self::TAG,
            on_off(self.switched_on),
            self.setting
        )
    }
}
