//! Smart door: a lock that starts out locked.

use std::fmt;

use serde_json::{Map, Value};

use super::{
    FieldValue, SWITCHED_ON, SmartDevice, on_off, read_required, read_switched_on, tagged_record,
};
use crate::error::{SmartHomeError, UnknownFieldError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    switched_on: bool,
    locked: bool,
}

impl Door {
    pub const TAG: &'static str = "SmartDoor";
    pub const LOCKED: &'static str = "locked";

    /// Create a switched-off, locked door.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub(super) fn from_record(record: &Map<String, Value>) -> Result<Self, SmartHomeError> {
        let locked = read_required(record, Self::LOCKED)?.as_bool(Self::LOCKED)?;
        Ok(Self {
            switched_on: read_switched_on(record)?,
            locked,
        })
    }
}

impl Default for Door {
    fn default() -> Self {
        Self {
            switched_on: false,
            locked: true,
        }
    }
}

impl SmartDevice for Door {
    fn switched_on(&self) -> bool {
        self.switched_on
    }

    fn set_switched_on(&mut self, on: bool) {
        self.switched_on = on;
    }

    fn set(&mut self, field: &str, value: &FieldValue) -> Result<(), SmartHomeError> {
        match field {
            SWITCHED_ON => self.switched_on = value.as_bool(SWITCHED_ON)?,
            Self::LOCKED => self.locked = value.as_bool(Self::LOCKED)?,
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
            Self::LOCKED,
            Value::Bool(self.locked),
        )
    }
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is {} with locked {}",
            Self::TAG,
            on_off(self.switched_on),
            self.locked
        )
    }
}
