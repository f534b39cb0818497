//! nPod resources.
//!
//! A nPod is a collection of network-connected application servers with
//! SPUs installed that together serve shared or local storage to the
//! cluster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::client::NebClient;
use crate::error::NebClientError;
use crate::filters::{StringFilter, UuidFilter};
use crate::maybe::Maybe;
use crate::operation::Operation;
use crate::page::{ItemList, PageInput};
use crate::refs::{SerialRef, UuidRef};
use crate::sorting::SortDirection;

/// A sort object for nPods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NPodSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
}

impl NPodSort {
    /// Sort by nPod name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }
}

/// A filter object for nPods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NPodFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<NPodFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<NPodFilter>>,
}

impl NPodFilter {
    /// Filter by nPod UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by nPod name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: NPodFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: NPodFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// SPU configuration provided during nPod creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NPodSpuInput {
    #[serde(rename = "SPUName", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "SPUSerial")]
    serial: String,
    #[serde(rename = "SPUDataIPs", skip_serializing_if = "Option::is_none")]
    data_ips: Option<Vec<String>>,
}

impl NPodSpuInput {
    /// Describe a SPU by serial number.
    pub fn new(serial: impl Into<String>) -> Result<Self, NebClientError> {
        let serial = serial.into();
        if serial.is_empty() {
            return Err(NebClientError::validation("serial", "must not be empty"));
        }
        Ok(Self {
            name: None,
            serial,
            data_ips: None,
        })
    }

    /// Human-readable name for the SPU.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Data network addresses to allocate to the SPU.
    #[must_use]
    pub fn with_data_ips(mut self, addresses: Vec<String>) -> Self {
        self.data_ips = Some(addresses);
        self
    }
}

/// Input object to create a new nPod.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateNPodInput {
    #[serde(rename = "nPodName")]
    name: String,
    #[serde(rename = "nPodGroupUUID")]
    npod_group_uuid: Uuid,
    spus: Vec<NPodSpuInput>,
    #[serde(rename = "nPodTemplateUUID")]
    npod_template_uuid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,
}

impl CreateNPodInput {
    /// Create a nPod input. At least one SPU must be provided.
    pub fn new(
        name: impl Into<String>,
        npod_group_uuid: Uuid,
        spus: Vec<NPodSpuInput>,
        npod_template_uuid: Uuid,
    ) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        if spus.is_empty() {
            return Err(NebClientError::validation(
                "spus",
                "at least one SPU is required",
            ));
        }
        Ok(Self {
            name,
            npod_group_uuid,
            spus,
            npod_template_uuid,
            note: None,
            timezone: None,
        })
    }

    /// Attach a note to the nPod.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Time zone for the nPod, e.g. `US/Pacific`.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Input object to delete a nPod.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteNPodInput {
    secure_erase: Option<bool>,
}

impl DeleteNPodInput {
    /// Secure-erase all SPUs in the nPod during deletion.
    #[must_use]
    pub const fn with_secure_erase(mut self, secure_erase: bool) -> Self {
        self.secure_erase = Some(secure_erase);
        self
    }
}

/// Input object to set the time zone of a nPod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetNPodTimeZoneInput {
    #[serde(rename = "timeZone")]
    timezone: String,
}

impl SetNPodTimeZoneInput {
    /// Set the time zone, e.g. `US/Pacific`.
    pub fn new(timezone: impl Into<String>) -> Result<Self, NebClientError> {
        let timezone = timezone.into();
        if timezone.is_empty() {
            return Err(NebClientError::validation(
                "timezone",
                "must not be empty",
            ));
        }
        Ok(Self { timezone })
    }
}

/// One entry of an update performed on a nPod.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistory {
    /// The identifier of the update.
    #[serde(rename = "updateID")]
    pub update_id: String,
    /// The name of the installed package.
    pub package_name: String,
    /// When the update started.
    pub start: DateTime<Utc>,
    /// When the update finished.
    #[serde(default)]
    pub finish: Maybe<DateTime<Utc>>,
    /// Whether the update completed successfully.
    pub success: bool,
}

impl UpdateHistory {
    pub(crate) fn fields() -> String {
        ["updateID", "packageName", "start", "finish", "success"].join(",")
    }
}

/// A nPod.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NPod {
    /// The unique identifier of the nPod.
    pub uuid: Uuid,
    /// The name of the nPod.
    pub name: String,
    /// An optional note for the nPod.
    pub note: String,
    /// The nPod group this nPod belongs to.
    #[serde(rename = "nPodGroup", default)]
    pub npod_group: Maybe<UuidRef>,
    /// Volumes defined in this nPod.
    #[serde(default)]
    pub volumes: Vec<UuidRef>,
    /// Number of volumes defined in this nPod.
    pub volume_count: u64,
    /// Hosts that are part of this nPod.
    #[serde(default)]
    pub hosts: Vec<UuidRef>,
    /// Number of hosts that are part of this nPod.
    pub host_count: u64,
    /// SPUs that are part of this nPod.
    #[serde(default)]
    pub spus: Vec<SerialRef>,
    /// Number of SPUs that are part of this nPod.
    pub spu_count: u64,
    /// Snapshots defined in this nPod.
    #[serde(default)]
    pub snapshots: Vec<UuidRef>,
    /// Updates performed on this nPod.
    #[serde(default)]
    pub update_history: Vec<UpdateHistory>,
}

impl NPod {
    pub(crate) fn fields() -> String {
        format!(
            "uuid,name,note,nPodGroup{{uuid}},volumes{{uuid}},volumeCount,\
             hosts{{uuid}},hostCount,spus{{serial}},spuCount,snapshots{{uuid}},\
             updateHistory{{{}}}",
            UpdateHistory::fields()
        )
    }
}

impl NebClient {
    /// Retrieve a paginated list of nPods.
    #[instrument(skip_all)]
    pub async fn get_npods(
        &self,
        page: Option<PageInput>,
        filter: Option<NPodFilter>,
        sort: Option<NPodSort>,
    ) -> Result<ItemList<NPod>, NebClientError> {
        let operation = Operation::query("getNPods")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "NPodFilter", filter.as_ref())?
            .optional("sort", "NPodSort", sort.as_ref())?
            .selection(ItemList::<NPod>::fields(&NPod::fields()));
        self.call_list(operation).await
    }

    /// Create a new nPod from a template.
    #[instrument(skip_all)]
    pub async fn create_npod(&self, input: CreateNPodInput) -> Result<NPod, NebClientError> {
        let operation = Operation::mutation("createNPod")
            .required("input", "CreateNPodInput", &input)?
            .selection(NPod::fields());
        self.call(operation).await
    }

    /// Delete a nPod, optionally secure-erasing its SPUs.
    #[instrument(skip_all)]
    pub async fn delete_npod(
        &self,
        uuid: Uuid,
        input: DeleteNPodInput,
    ) -> Result<bool, NebClientError> {
        let uid = uuid.to_string();
        let operation = Operation::mutation("delPod")
            .required("uid", "String", &uid)?
            .optional("secureErase", "Boolean", input.secure_erase.as_ref())?;
        self.call(operation).await
    }

    /// Set the time zone of a nPod.
    #[instrument(skip_all)]
    pub async fn set_npod_timezone(
        &self,
        uuid: Uuid,
        input: SetNPodTimeZoneInput,
    ) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("setNPodTimeZone")
            .required("uuid", "UUID", &uuid)?
            .required("input", "SetNPodTimeZoneInput", &input)?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn group_uuid() -> Uuid {
        "55aa0000-0000-0000-0000-0000000000aa".parse().unwrap()
    }

    fn template_uuid() -> Uuid {
        "55aa0000-0000-0000-0000-0000000000bb".parse().unwrap()
    }

    #[test]
    fn create_input_requires_spus() {
        let err =
            CreateNPodInput::new("pod-1", group_uuid(), Vec::new(), template_uuid()).unwrap_err();
        assert!(matches!(
            err,
            NebClientError::Validation { field: "spus", .. }
        ));
    }

    #[test]
    fn create_input_uses_vendor_casing() {
        let spu = NPodSpuInput::new("012345ABCD")
            .unwrap()
            .with_data_ips(vec!["10.0.0.10".to_string()]);
        let input = CreateNPodInput::new("pod-1", group_uuid(), vec![spu], template_uuid())
            .unwrap()
            .with_timezone("US/Pacific");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "nPodName": "pod-1",
                "nPodGroupUUID": "55aa0000-0000-0000-0000-0000000000aa",
                "spus": [{"SPUSerial": "012345ABCD", "SPUDataIPs": ["10.0.0.10"]}],
                "nPodTemplateUUID": "55aa0000-0000-0000-0000-0000000000bb",
                "timeZone": "US/Pacific"
            })
        );
    }

    #[test]
    fn npod_materializes_with_nested_references() {
        let npod: NPod = serde_json::from_value(json!({
            "uuid": "55aa0000-0000-0000-0000-0000000000cc",
            "name": "pod-1",
            "note": "",
            "nPodGroup": {"uuid": "55aa0000-0000-0000-0000-0000000000aa"},
            "volumes": [{"uuid": "55aa0000-0000-0000-0000-0000000000dd"}],
            "volumeCount": 1,
            "hostCount": 4,
            "spus": [{"serial": "012345ABCD"}],
            "spuCount": 1,
            "updateHistory": [{
                "updateID": "u-1",
                "packageName": "1.3.10",
                "start": "2024-02-01T08:00:00Z",
                "finish": "2024-02-01T08:12:00Z",
                "success": true
            }]
        }))
        .unwrap();
        assert_eq!(npod.volume_count, 1);
        assert_eq!(npod.spus[0].serial, "012345ABCD");
        assert!(npod.update_history[0].success);
        assert!(npod.update_history[0].finish.value().is_some());
    }
}
