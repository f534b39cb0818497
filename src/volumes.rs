//! Volume resources.
//!
//! A volume is a block storage device served by the SPUs in a nPod. Volumes
//! are addressed by UUID and identified to hosts by their WWN.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::client::NebClient;
use crate::error::NebClientError;
use crate::filters::{IntFilter, StringFilter, UuidFilter};
use crate::maybe::Maybe;
use crate::operation::Operation;
use crate::page::{ItemList, PageInput};
use crate::refs::{SerialRef, UuidRef};
use crate::sorting::SortDirection;

/// Sync state of a mirrored volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeSyncState {
    /// The volume is not mirrored.
    NotMirrored,
    /// The volume is healthy and all data is in-sync.
    InSync,
    /// The volume is unhealthy and data is currently synchronizing.
    Syncing,
    /// The volume is unhealthy and data is currently not synchronizing.
    Unsynced,
    /// The sync state reported by the server is not known to this client.
    #[serde(other, skip_serializing)]
    Unknown,
}

/// A sort object for volumes. Populated keys apply in declared order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wwn: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_time: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_time: Option<SortDirection>,
}

impl VolumeSort {
    /// Sort by volume name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }

    /// Sort by volume WWN.
    #[must_use]
    pub const fn by_wwn(mut self, direction: SortDirection) -> Self {
        self.wwn = Some(direction);
        self
    }

    /// Sort by volume size.
    #[must_use]
    pub const fn by_size_bytes(mut self, direction: SortDirection) -> Self {
        self.size_bytes = Some(direction);
        self
    }

    /// Sort by creation time.
    #[must_use]
    pub const fn by_creation_time(mut self, direction: SortDirection) -> Self {
        self.creation_time = Some(direction);
        self
    }

    /// Sort by snapshot expiration time.
    #[must_use]
    pub const fn by_expiration_time(mut self, direction: SortDirection) -> Self {
        self.expiration_time = Some(direction);
        self
    }
}

/// A filter object for volumes.
///
/// Populated fields combine with implicit AND; use [`VolumeFilter::and`]
/// and [`VolumeFilter::or`] for explicit composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wwn: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<IntFilter>,
    #[serde(rename = "nPodUUID", skip_serializing_if = "Option::is_none")]
    npod_uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshots_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_time: Option<IntFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_time: Option<IntFilter>,
    #[serde(rename = "parentUUID", skip_serializing_if = "Option::is_none")]
    parent_uuid: Option<UuidFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<VolumeFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<VolumeFilter>>,
}

impl VolumeFilter {
    /// Filter by volume UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by volume name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Filter by volume WWN.
    #[must_use]
    pub fn with_wwn(mut self, filter: StringFilter) -> Self {
        self.wwn = Some(filter);
        self
    }

    /// Filter by volume size in bytes.
    #[must_use]
    pub fn with_size_bytes(mut self, filter: IntFilter) -> Self {
        self.size_bytes = Some(filter);
        self
    }

    /// Filter by owning nPod UUID.
    #[must_use]
    pub fn with_npod_uuid(mut self, filter: UuidFilter) -> Self {
        self.npod_uuid = Some(filter);
        self
    }

    /// Match only snapshots.
    #[must_use]
    pub const fn snapshots_only(mut self, value: bool) -> Self {
        self.snapshots_only = Some(value);
        self
    }

    /// Match only base volumes.
    #[must_use]
    pub const fn base_only(mut self, value: bool) -> Self {
        self.base_only = Some(value);
        self
    }

    /// Filter by creation time (seconds since epoch).
    #[must_use]
    pub fn with_creation_time(mut self, filter: IntFilter) -> Self {
        self.creation_time = Some(filter);
        self
    }

    /// Filter by snapshot expiration time (seconds since epoch).
    #[must_use]
    pub fn with_expiration_time(mut self, filter: IntFilter) -> Self {
        self.expiration_time = Some(filter);
        self
    }

    /// Filter by snapshot parent volume UUID.
    #[must_use]
    pub fn with_parent_uuid(mut self, filter: UuidFilter) -> Self {
        self.parent_uuid = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: VolumeFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: VolumeFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// Input object to create a new volume.
///
/// One of nPod UUID or owner SPU serial must be provided; when the SPU
/// serials are omitted the control plane decides where the volume is
/// provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateVolumeInput {
    name: String,
    #[serde(rename = "podUUID", skip_serializing_if = "Option::is_none")]
    npod_uuid: Option<Uuid>,
    #[serde(rename = "sizeBytes")]
    size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mirrored: Option<bool>,
    #[serde(rename = "ownerSPUSerial", skip_serializing_if = "Option::is_none")]
    owner_spu_serial: Option<String>,
    #[serde(rename = "backupSPUSerial", skip_serializing_if = "Option::is_none")]
    backup_spu_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    force: Option<bool>,
}

impl CreateVolumeInput {
    /// Create an input for a volume of `size_bytes` bytes.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        if size_bytes == 0 {
            return Err(NebClientError::validation(
                "size_bytes",
                "must be at least 1 byte",
            ));
        }
        Ok(Self {
            name,
            npod_uuid: None,
            size_bytes,
            mirrored: None,
            owner_spu_serial: None,
            backup_spu_serial: None,
            force: None,
        })
    }

    /// Provision the volume in the given nPod.
    #[must_use]
    pub const fn with_npod_uuid(mut self, uuid: Uuid) -> Self {
        self.npod_uuid = Some(uuid);
        self
    }

    /// Create the volume with high availability.
    #[must_use]
    pub const fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = Some(mirrored);
        self
    }

    /// Provision the volume on the SPU with this serial number.
    #[must_use]
    pub fn with_owner_spu_serial(mut self, serial: impl Into<String>) -> Self {
        self.owner_spu_serial = Some(serial.into());
        self
    }

    /// Place the backup mirror on the SPU with this serial number.
    #[must_use]
    pub fn with_backup_spu_serial(mut self, serial: impl Into<String>) -> Self {
        self.backup_spu_serial = Some(serial.into());
        self
    }

    /// Create the volume even when there is not enough capacity available.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }
}

/// Input object to update an existing volume. Fields left unset remain
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateVolumeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl UpdateVolumeInput {
    /// Rename the volume.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        self.name = Some(name);
        Ok(self)
    }
}

/// A volume.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// The unique identifier of the volume.
    pub uuid: Uuid,
    /// The nPod serving this volume.
    #[serde(rename = "nPod", default)]
    pub npod: Maybe<UuidRef>,
    /// The world wide name of the volume.
    pub wwn: String,
    /// The name of the volume.
    pub name: String,
    /// The size of the volume in bytes.
    pub size_bytes: u64,
    /// Date and time when the volume was created.
    pub creation_time: DateTime<Utc>,
    /// Date and time when the snapshot is automatically deleted.
    #[serde(default)]
    pub expiration_time: Maybe<DateTime<Utc>>,
    /// Whether the volume is a read-only snapshot.
    pub read_only_snapshot: bool,
    /// The parent volume of a snapshot.
    #[serde(default)]
    pub snapshot_parent: Maybe<UuidRef>,
    /// Snapshots taken from this volume.
    #[serde(default)]
    pub snapshots: Vec<UuidRef>,
    /// The host that is the natural owner of the volume.
    #[serde(default)]
    pub natural_owner_host: Maybe<UuidRef>,
    /// The host that is the natural backup of the volume.
    #[serde(default)]
    pub natural_backup_host: Maybe<UuidRef>,
    /// The host that currently owns the volume.
    #[serde(default)]
    pub current_owner_host: Maybe<UuidRef>,
    /// The SPU that is the natural owner of the volume.
    #[serde(rename = "naturalOwnerSPU", default)]
    pub natural_owner_spu: Maybe<SerialRef>,
    /// The SPU that is the natural backup of the volume.
    #[serde(rename = "naturalBackupSPU", default)]
    pub natural_backup_spu: Maybe<SerialRef>,
    /// Hosts that have access to the volume.
    #[serde(default)]
    pub accessible_by_hosts: Vec<UuidRef>,
    /// Health and sync state of the volume.
    #[serde(default)]
    pub sync_state: Maybe<VolumeSyncState>,
    /// Whether the volume is a boot volume.
    pub boot: bool,
    /// LUNs exported for the volume.
    #[serde(default)]
    pub luns: Vec<UuidRef>,
}

impl Volume {
    pub(crate) fn fields() -> String {
        [
            "uuid",
            "nPod{uuid}",
            "wwn",
            "name",
            "sizeBytes",
            "creationTime",
            "expirationTime",
            "readOnlySnapshot",
            "snapshotParent{uuid}",
            "snapshots{uuid}",
            "naturalOwnerHost{uuid}",
            "naturalBackupHost{uuid}",
            "currentOwnerHost{uuid}",
            "naturalOwnerSPU{serial}",
            "naturalBackupSPU{serial}",
            "accessibleByHosts{uuid}",
            "syncState",
            "boot",
            "luns{uuid}",
        ]
        .join(",")
    }
}

impl NebClient {
    /// Retrieve a paginated list of volumes.
    ///
    /// Omitted arguments leave the server defaults in effect: first page
    /// with 100 items, no filter, stable default order.
    #[instrument(skip_all)]
    pub async fn get_volumes(
        &self,
        page: Option<PageInput>,
        filter: Option<VolumeFilter>,
        sort: Option<VolumeSort>,
    ) -> Result<ItemList<Volume>, NebClientError> {
        let operation = Operation::query("getVolumes")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "VolumeFilter", filter.as_ref())?
            .optional("sort", "VolumeSort", sort.as_ref())?
            .selection(ItemList::<Volume>::fields(&Volume::fields()));
        self.call_list(operation).await
    }

    /// Create a new volume.
    #[instrument(skip_all)]
    pub async fn create_volume(
        &self,
        input: CreateVolumeInput,
    ) -> Result<Volume, NebClientError> {
        let operation = Operation::mutation("createVolume")
            .required("input", "CreateVolumeInput", &input)?
            .selection(Volume::fields());
        self.call(operation).await
    }

    /// Modify an existing volume.
    #[instrument(skip_all)]
    pub async fn update_volume(
        &self,
        uuid: Uuid,
        input: UpdateVolumeInput,
    ) -> Result<Volume, NebClientError> {
        let operation = Operation::mutation("updateVolume")
            .required("uuid", "UUID", &uuid)?
            .required("input", "UpdateVolumeInput", &input)?
            .selection(Volume::fields());
        self.call(operation).await
    }

    /// Delete a volume or snapshot.
    #[instrument(skip_all)]
    pub async fn delete_volume(&self, uuid: Uuid) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("deleteVolume").required("uuid", "UUID", &uuid)?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const TWO_TIB: u64 = 2_199_023_255_552;

    #[test]
    fn create_input_serializes_set_fields_in_declared_order() {
        let input = CreateVolumeInput::new("volume name", TWO_TIB)
            .unwrap()
            .with_mirrored(true);
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({"name": "volume name", "sizeBytes": TWO_TIB, "mirrored": true})
        );
        // Declared order, not setter order.
        let text = serde_json::to_string(&input).unwrap();
        assert!(text.find("\"name\"").unwrap() < text.find("\"sizeBytes\"").unwrap());
        assert!(text.find("\"sizeBytes\"").unwrap() < text.find("\"mirrored\"").unwrap());
    }

    #[test]
    fn create_input_rejects_zero_size() {
        let err = CreateVolumeInput::new("db", 0).unwrap_err();
        assert!(matches!(
            err,
            NebClientError::Validation {
                field: "size_bytes",
                ..
            }
        ));
    }

    #[test]
    fn create_input_rejects_empty_name() {
        assert!(CreateVolumeInput::new("", TWO_TIB).is_err());
    }

    #[test]
    fn volume_materializes_from_create_reply() {
        let volume: Volume = serde_json::from_value(json!({
            "uuid": "2e2bcb65-8cd7-4831-abc2-95e6b5912caa",
            "wwn": "6f3b1e0cc1e42d7a",
            "name": "volume name",
            "sizeBytes": TWO_TIB,
            "creationTime": "2024-03-01T10:10:10Z",
            "readOnlySnapshot": false,
            "boot": false
        }))
        .unwrap();
        assert_eq!(volume.name, "volume name");
        assert_eq!(volume.size_bytes, TWO_TIB);
        // Fields absent from the reply stay absent, not null.
        assert!(volume.expiration_time.is_absent());
        assert!(volume.npod.is_absent());
        assert!(volume.snapshots.is_empty());
    }

    #[test]
    fn null_npod_is_distinct_from_absent() {
        let volume: Volume = serde_json::from_value(json!({
            "uuid": "2e2bcb65-8cd7-4831-abc2-95e6b5912caa",
            "nPod": null,
            "wwn": "6f3b1e0cc1e42d7a",
            "name": "v",
            "sizeBytes": 1,
            "creationTime": "2024-03-01T10:10:10Z",
            "readOnlySnapshot": false,
            "boot": false
        }))
        .unwrap();
        assert!(volume.npod.is_null());
        assert!(!volume.npod.is_absent());
    }

    #[test]
    fn unknown_reply_keys_are_ignored() {
        let volume: Volume = serde_json::from_value(json!({
            "uuid": "2e2bcb65-8cd7-4831-abc2-95e6b5912caa",
            "wwn": "6f3b1e0cc1e42d7a",
            "name": "v",
            "sizeBytes": 1,
            "creationTime": "2024-03-01T10:10:10Z",
            "readOnlySnapshot": false,
            "boot": false,
            "introducedNextRelease": {"nested": true}
        }))
        .unwrap();
        assert_eq!(volume.name, "v");
    }

    #[test]
    fn additive_sync_state_values_materialize_as_unknown() {
        let state: VolumeSyncState = serde_json::from_value(json!("Resilvering")).unwrap();
        assert_eq!(state, VolumeSyncState::Unknown);
    }

    #[test]
    fn volume_selection_matches_schema_names() {
        let fields = Volume::fields();
        assert!(fields.starts_with("uuid,nPod{uuid},wwn,name,sizeBytes"));
        assert!(fields.contains("naturalOwnerSPU{serial}"));
    }
}
