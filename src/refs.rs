//! Shallow references to related resources.
//!
//! Result objects request related resources as single-field selections
//! (`nPod{uuid}`, `spus{serial}`) so replies stay small; these types
//! materialize those fragments.

use serde::Deserialize;
use uuid::Uuid;

/// A related resource addressed by UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UuidRef {
    /// The unique identifier of the referenced resource.
    pub uuid: Uuid,
}

/// A related SPU addressed by serial number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SerialRef {
    /// The serial number of the referenced SPU.
    pub serial: String,
}

/// A related physical drive addressed by WWN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WwnRef {
    /// The world wide name of the referenced drive.
    pub wwn: String,
}
