//! Common error types used across the workspace.
//!
//! Each failure class has its own typed error, and all of them convert into
//! [`SmartHomeError`] via `#[from]` so callers can propagate with `?` and
//! still match on the precise condition.

/// Top-level error returned by every fallible model operation.
#[derive(Debug, thiserror::Error)]
pub enum SmartHomeError {
    /// A field value violates its declared constraint.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A home already holds its maximum number of devices.
    #[error("capacity error: {0}")]
    Capacity(#[from] CapacityError),

    /// A referenced home does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A device index is outside the home's device list.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// A name is already taken.
    #[error("duplicate: {0}")]
    Duplicate(#[from] DuplicateError),

    /// A device record carries an unrecognised `type` tag.
    #[error("unknown type: {0}")]
    UnknownType(#[from] UnknownTypeError),

    /// An update references a field the device does not have.
    #[error("unknown field: {0}")]
    UnknownField(#[from] UnknownFieldError),

    /// The backing store failed or holds malformed data.
    #[error("persistence error")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Field-level constraint violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i128,
    },

    #[error("{field} must be an integer")]
    NotAnInteger { field: &'static str },

    #[error("{field} must be a boolean")]
    NotABoolean { field: &'static str },

    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device limit of {capacity} reached")]
pub struct CapacityError {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid device index {index} (home has {len} devices)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} already exists")]
pub struct DuplicateError {
    pub entity: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device type {kind:?}")]
pub struct UnknownTypeError {
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{device} has no field {field:?}")]
pub struct UnknownFieldError {
    pub device: &'static str,
    pub field: String,
}
