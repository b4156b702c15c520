//! Device: a single controllable thing living in a [`Home`](crate::home::Home).
//!
//! Three variants exist: [`Plug`], [`Heater`] and [`Door`]. They share the
//! [`SmartDevice`] capability set and are held together by the [`Device`]
//! sum type, which is what homes store and what gets persisted.
//!
//! Every field is private. All writes go through validating setters, so a
//! device can never hold an out-of-range value, whether it was built by hand,
//! updated by field name, or rebuilt from a persisted record.
//!
//! ## Record format
//!
//! ```json
//! {"type": "SmartPlug", "switched_on": true, "consumption_rate": 45}
//! {"type": "SmartHeater", "switched_on": false, "setting": 2}
//! {"type": "SmartDoor", "switched_on": false, "locked": true}
//! ```

mod door;
mod field_value;
mod heater;
mod plug;

pub use door::Door;
pub use field_value::FieldValue;
pub use heater::Heater;
pub use plug::Plug;

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{SmartHomeError, UnknownTypeError, ValidationError};

/// Name of the discriminator key in a device record.
pub const TYPE_KEY: &str = "type";

/// Name of the on/off field shared by every variant.
pub const SWITCHED_ON: &str = "switched_on";

/// Capabilities shared by every device variant.
pub trait SmartDevice {
    /// Whether the device is currently switched on.
    fn switched_on(&self) -> bool;

    /// Force the on/off state.
    fn set_switched_on(&mut self, on: bool);

    /// Flip the on/off state.
    fn toggle(&mut self) {
        let on = self.switched_on();
        self.set_switched_on(!on);
    }

    /// Update a field by name.
    ///
    /// The value is validated before anything is written, so the device
    /// either fully takes the new value or stays unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::UnknownField`] for a name the variant does
    /// not declare, or [`SmartHomeError::Validation`] when the value has the
    /// wrong type or is out of range.
    fn set(&mut self, field: &str, value: &FieldValue) -> Result<(), SmartHomeError>;

    /// Produce the persisted record, including the `type` tag.
    fn to_record(&self) -> Value;
}

/// Discriminant of the [`Device`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Plug,
    Heater,
    Door,
}

impl DeviceKind {
    pub const ALL: [Self; 3] = [Self::Plug, Self::Heater, Self::Door];

    /// The `type` tag written to persisted records.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Plug => Plug::TAG,
            Self::Heater => Heater::TAG,
            Self::Door => Door::TAG,
        }
    }

    /// Look up a variant by its exact record tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Accepts the short name (`plug`) or the record tag (`SmartPlug`), in any case.
impl FromStr for DeviceKind {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| {
                s.eq_ignore_ascii_case(kind.tag())
                    || s.eq_ignore_ascii_case(&kind.tag()["Smart".len()..])
            })
            .ok_or_else(|| UnknownTypeError {
                kind: s.to_string(),
            })
    }
}

/// Any device a home can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    Plug(Plug),
    Heater(Heater),
    Door(Door),
}

impl Device {
    /// Build a device of the given kind with its front-end defaults
    /// (plug at 45W, heater on setting 2, door locked), switched off.
    #[must_use]
    pub fn with_defaults(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Plug => Self::Plug(Plug::default()),
            DeviceKind::Heater => Self::Heater(Heater::default()),
            DeviceKind::Door => Self::Door(Door::default()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Plug(_) => DeviceKind::Plug,
            Self::Heater(_) => DeviceKind::Heater,
            Self::Door(_) => DeviceKind::Door,
        }
    }

    /// Rebuild a device from a persisted record, dispatching on its `type` tag.
    ///
    /// # Errors
    ///
    /// - [`SmartHomeError::Validation`] if the record is not an object, lacks
    ///   `type` or a required variant field, or holds an invalid value.
    /// - [`SmartHomeError::UnknownType`] if the tag names no known variant.
    pub fn from_record(record: &Value) -> Result<Self, SmartHomeError> {
        let Some(record) = record.as_object() else {
            return Err(ValidationError::MissingField { field: TYPE_KEY }.into());
        };
        let tag = match record.get(TYPE_KEY) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(UnknownTypeError {
                    kind: other.to_string(),
                }
                .into());
            }
            None => return Err(ValidationError::MissingField { field: TYPE_KEY }.into()),
        };
        let kind = DeviceKind::from_tag(tag).ok_or_else(|| UnknownTypeError {
            kind: tag.clone(),
        })?;

        let device = match kind {
            DeviceKind::Plug => Self::Plug(Plug::from_record(record)?),
            DeviceKind::Heater => Self::Heater(Heater::from_record(record)?),
            DeviceKind::Door => Self::Door(Door::from_record(record)?),
        };
        Ok(device)
    }
}

impl SmartDevice for Device {
    fn switched_on(&self) -> bool {
        match self {
            Self::Plug(d) => d.switched_on(),
            Self::Heater(d) => d.switched_on(),
            Self::Door(d) => d.switched_on(),
        }
    }

    fn set_switched_on(&mut self, on: bool) {
        match self {
            Self::Plug(d) => d.set_switched_on(on),
            Self::Heater(d) => d.set_switched_on(on),
            Self::Door(d) => d.set_switched_on(on),
        }
    }

    fn set(&mut self, field: &str, value: &FieldValue) -> Result<(), SmartHomeError> {
        match self {
            Self::Plug(d) => d.set(field, value),
            Self::Heater(d) => d.set(field, value),
            Self::Door(d) => d.set(field, value),
        }
    }

    fn to_record(&self) -> Value {
        match self {
            Self::Plug(d) => d.to_record(),
            Self::Heater(d) => d.to_record(),
            Self::Door(d) => d.to_record(),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plug(d) => d.fmt(f),
            Self::Heater(d) => d.fmt(f),
            Self::Door(d) => d.fmt(f),
        }
    }
}

impl From<Plug> for Device {
    fn from(value: Plug) -> Self {
        Self::Plug(value)
    }
}

impl From<Heater> for Device {
    fn from(value: Heater) -> Self {
        Self::Heater(value)
    }
}

impl From<Door> for Device {
    fn from(value: Door) -> Self {
        Self::Door(value)
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Read `switched_on` from a record; absent means off.
fn read_switched_on(record: &Map<String, Value>) -> Result<bool, ValidationError> {
    record
        .get(SWITCHED_ON)
        .map_or(Ok(false), |v| FieldValue::from_json(v).as_bool(SWITCHED_ON))
}

fn read_required(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<FieldValue, ValidationError> {
    record
        .get(field)
        .map(FieldValue::from_json)
        .ok_or(ValidationError::MissingField { field })
}

/// Assemble a tagged record with the shared fields plus one variant field.
fn tagged_record(tag: &str, switched_on: bool, field: &str, value: Value) -> Value {
    let mut record = Map::new();
    record.insert(TYPE_KEY.to_string(), Value::from(tag));
    record.insert(SWITCHED_ON.to_string(), Value::Bool(switched_on));
    record.insert(field.to_string(), value);
    Value::Object(record)
}

/// Check `0 <= value <= max` and narrow to `u8`.
fn bounded(field: &'static str, value: i128, max: u8) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or(ValidationError::OutOfRange {
            field,
            min: 0,
            max: i64::from(max),
            value,
        })
}
