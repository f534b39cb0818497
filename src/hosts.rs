//! Host (application server) resources.
//!
//! Hosts are discovered through the SPUs installed in them, so the API only
//! exposes read and update operations.

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

/// A sort object for hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<SortDirection>,
}

impl HostSort {
    /// Sort by host name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }

    /// Sort by server model.
    #[must_use]
    pub const fn by_model(mut self, direction: SortDirection) -> Self {
        self.model = Some(direction);
        self
    }

    /// Sort by server manufacturer.
    #[must_use]
    pub const fn by_manufacturer(mut self, direction: SortDirection) -> Self {
        self.manufacturer = Some(direction);
        self
    }
}

/// A filter object for hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chassis_serial: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board_serial: Option<StringFilter>,
    #[serde(rename = "nPodUUID", skip_serializing_if = "Option::is_none")]
    npod_uuid: Option<UuidFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<HostFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<HostFilter>>,
}

impl HostFilter {
    /// Filter by host UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by host name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Filter by server model.
    #[must_use]
    pub fn with_model(mut self, filter: StringFilter) -> Self {
        self.model = Some(filter);
        self
    }

    /// Filter by server manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, filter: StringFilter) -> Self {
        self.manufacturer = Some(filter);
        self
    }

    /// Filter by chassis serial number.
    #[must_use]
    pub fn with_chassis_serial(mut self, filter: StringFilter) -> Self {
        self.chassis_serial = Some(filter);
        self
    }

    /// Filter by mainboard serial number.
    #[must_use]
    pub fn with_board_serial(mut self, filter: StringFilter) -> Self {
        self.board_serial = Some(filter);
        self
    }

    /// Filter by the nPod the host participates in.
    #[must_use]
    pub fn with_npod_uuid(mut self, filter: UuidFilter) -> Self {
        self.npod_uuid = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: HostFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: HostFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// Input object to update host properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHostInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "rackUUID", skip_serializing_if = "Option::is_none")]
    rack_uuid: Option<Uuid>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    note: Maybe<String>,
}

impl UpdateHostInput {
    /// Rename the host.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Move the host into a rack.
    #[must_use]
    pub const fn with_rack_uuid(mut self, uuid: Uuid) -> Self {
        self.rack_uuid = Some(uuid);
        self
    }

    /// Replace the host note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Maybe::Value(note.into());
        self
    }

    /// Remove the host note.
    #[must_use]
    pub fn clear_note(mut self) -> Self {
        self.note = Maybe::Null;
        self
    }
}

/// A memory module installed in a host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimm {
    /// Slot location of the module.
    pub location: String,
    /// Module manufacturer.
    pub manufacturer: String,
    /// Module capacity in bytes.
    pub size_bytes: u64,
}

/// An application server with one or more SPUs installed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// The unique identifier of the host.
    pub uuid: Uuid,
    /// The name of the host.
    pub name: String,
    /// Server model.
    #[serde(default)]
    pub model: Option<String>,
    /// Server manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Chassis serial number.
    #[serde(default)]
    pub chassis_serial: Option<String>,
    /// Mainboard serial number.
    #[serde(default)]
    pub board_serial: Option<String>,
    /// An optional note for the host.
    #[serde(default)]
    pub note: Maybe<String>,
    /// The nPod the host participates in.
    #[serde(rename = "nPod", default)]
    pub npod: Maybe<UuidRef>,
    /// The rack the host is installed in.
    #[serde(default)]
    pub rack: Maybe<UuidRef>,
    /// SPUs installed in this host.
    #[serde(default)]
    pub spus: Vec<SerialRef>,
    /// Number of SPUs installed in this host.
    pub spu_count: u64,
    /// Number of CPUs.
    #[serde(default)]
    pub cpu_count: Option<u64>,
    /// CPU model description.
    #[serde(default)]
    pub cpu_type: Option<String>,
    /// CPU core count per socket.
    #[serde(default)]
    pub cpu_core_count: Option<u64>,
    /// CPU clock speed in Hz.
    #[serde(default)]
    pub cpu_speed: Option<u64>,
    /// Number of installed memory modules.
    #[serde(default)]
    pub dimm_count: Option<u64>,
    /// Installed memory modules.
    #[serde(default)]
    pub dimms: Vec<Dimm>,
    /// Total installed memory in bytes.
    #[serde(default)]
    pub memory_bytes: Option<u64>,
    /// Lights-out management address.
    #[serde(default)]
    pub lom_address: Option<String>,
    /// Lights-out management hostname.
    #[serde(default)]
    pub lom_hostname: Option<String>,
    /// Last boot time of the host.
    #[serde(default)]
    pub boot_time: Maybe<DateTime<Utc>>,
}

impl Host {
    pub(crate) fn fields() -> String {
        [
            "uuid",
            "name",
            "model",
            "manufacturer",
            "chassisSerial",
            "boardSerial",
            "note",
            "nPod{uuid}",
            "rack{uuid}",
            "spus{serial}",
            "spuCount",
            "cpuCount",
            "cpuType",
            "cpuCoreCount",
            "cpuSpeed",
            "dimmCount",
            "dimms{location,manufacturer,sizeBytes}",
            "memoryBytes",
            "lomAddress",
            "lomHostname",
            "bootTime",
        ]
        .join(",")
    }
}

impl NebClient {
    /// Retrieve a paginated list of hosts.
    #[instrument(skip_all)]
    pub async fn get_hosts(
        &self,
        page: Option<PageInput>,
        filter: Option<HostFilter>,
        sort: Option<HostSort>,
    ) -> Result<ItemList<Host>, NebClientError> {
        let operation = Operation::query("getHosts")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "HostFilter", filter.as_ref())?
            .optional("sort", "HostSort", sort.as_ref())?
            .selection(ItemList::<Host>::fields(&Host::fields()));
        self.call_list(operation).await
    }

    /// Update host properties.
    #[instrument(skip_all)]
    pub async fn update_host(
        &self,
        uuid: Uuid,
        input: UpdateHostInput,
    ) -> Result<Host, NebClientError> {
        let operation = Operation::mutation("updateHost")
            .required("uuid", "String", &uuid.to_string())?
            .required("input", "UpdateHostInput", &input)?
            .selection(Host::fields());
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn update_input_uses_wire_names() {
        let rack = Uuid::parse_str("0a45e510-3042-4879-9bc6-376daad62e05").unwrap();
        let input = UpdateHostInput::default()
            .with_name("esx-01")
            .unwrap()
            .with_rack_uuid(rack);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"name": "esx-01", "rackUUID": "0a45e510-3042-4879-9bc6-376daad62e05"})
        );
    }

    #[test]
    fn cleared_note_serializes_as_null() {
        let input = UpdateHostInput::default().clear_note();
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"note": null}));
    }

    #[test]
    fn host_materializes_from_sparse_reply() {
        let host: Host = serde_json::from_value(json!({
            "uuid": "d5f2439f-7040-46b0-8548-9a23a2ab5bf3",
            "name": "server-42",
            "spus": [{"serial": "012345ABCD"}],
            "spuCount": 1,
            "note": null
        }))
        .unwrap();
        assert_eq!(host.spus.len(), 1);
        assert!(host.note.is_null());
        assert!(host.npod.is_absent());
        assert!(host.boot_time.is_absent());
    }

    #[test]
    fn filter_combines_with_and() {
        let filter = HostFilter::default()
            .with_manufacturer(StringFilter::default().contains("Dell"))
            .and(HostFilter::default().with_model(StringFilter::default().begins_with("R7")));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "manufacturer": {"contains": "Dell"},
                "and": {"model": {"beginsWith": "R7"}}
            })
        );
    }
}
