//! Services processing unit (SPU) resources.
//!
//! SPUs are the storage-processing hardware units installed in application
//! servers. They are addressed by serial number rather than UUID.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::client::NebClient;
use crate::error::NebClientError;
use crate::filters::StringFilter;
use crate::maybe::Maybe;
use crate::operation::Operation;
use crate::page::{ItemList, PageInput};
use crate::refs::{UuidRef, WwnRef};
use crate::sorting::SortDirection;

/// A sort object for SPUs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpuSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    serial: Option<SortDirection>,
}

impl SpuSort {
    /// Sort by serial number.
    #[must_use]
    pub const fn by_serial(mut self, direction: SortDirection) -> Self {
        self.serial = Some(direction);
        self
    }
}

/// A filter object for SPUs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpuFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    serial: Option<StringFilter>,
    #[serde(rename = "notInNPod", skip_serializing_if = "Option::is_none")]
    not_in_npod: Option<bool>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<SpuFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<SpuFilter>>,
}

impl SpuFilter {
    /// Filter by serial number.
    #[must_use]
    pub fn with_serial(mut self, filter: StringFilter) -> Self {
        self.serial = Some(filter);
        self
    }

    /// Match only SPUs that are not part of a nPod.
    #[must_use]
    pub const fn not_in_npod(mut self, value: bool) -> Self {
        self.not_in_npod = Some(value);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: SpuFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: SpuFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// An NTP server as reported by a SPU.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NtpServer {
    /// The DNS hostname of the NTP server.
    pub server_hostname: String,
    /// Whether the hostname is an NTP pool.
    pub pool: bool,
    /// Whether this is the preferred NTP server.
    pub prefer: bool,
}

impl NtpServer {
    pub(crate) fn fields() -> String {
        ["serverHostname", "pool", "prefer"].join(",")
    }
}

/// NTP server configuration for a SPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NtpServerInput {
    server_hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefer: Option<bool>,
}

impl NtpServerInput {
    /// Configure an NTP server by hostname.
    pub fn new(hostname: impl Into<String>) -> Result<Self, NebClientError> {
        let server_hostname = hostname.into();
        if server_hostname.is_empty() {
            return Err(NebClientError::validation(
                "server_hostname",
                "must not be empty",
            ));
        }
        Ok(Self {
            server_hostname,
            pool: None,
            prefer: None,
        })
    }

    /// Mark the hostname as an NTP pool.
    #[must_use]
    pub const fn with_pool(mut self, pool: bool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Prefer this server over others.
    #[must_use]
    pub const fn with_prefer(mut self, prefer: bool) -> Self {
        self.prefer = Some(prefer);
        self
    }
}

/// Input object to configure NTP servers for a SPU or an entire nPod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetNtpServersInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    spu_serial: Option<String>,
    #[serde(rename = "podUUID", skip_serializing_if = "Option::is_none")]
    npod_uuid: Option<Uuid>,
    servers: Vec<NtpServerInput>,
}

impl SetNtpServersInput {
    /// Configure NTP servers for a single SPU.
    pub fn for_spu(
        serial: impl Into<String>,
        servers: Vec<NtpServerInput>,
    ) -> Result<Self, NebClientError> {
        if servers.is_empty() {
            return Err(NebClientError::validation(
                "servers",
                "at least one NTP server is required",
            ));
        }
        Ok(Self {
            spu_serial: Some(serial.into()),
            npod_uuid: None,
            servers,
        })
    }

    /// Configure NTP servers for all SPUs in a nPod.
    pub fn for_npod(
        npod_uuid: Uuid,
        servers: Vec<NtpServerInput>,
    ) -> Result<Self, NebClientError> {
        if servers.is_empty() {
            return Err(NebClientError::validation(
                "servers",
                "at least one NTP server is required",
            ));
        }
        Ok(Self {
            spu_serial: None,
            npod_uuid: Some(npod_uuid),
            servers,
        })
    }
}

/// Input object to secure-erase a SPU.
///
/// Secure erase wipes all data on the SPU so that it is not recoverable.
/// The SPU must not be part of a nPod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureEraseSpuInput {
    spu_serial: String,
}

impl SecureEraseSpuInput {
    /// Target the SPU with the given serial number.
    pub fn new(serial: impl Into<String>) -> Result<Self, NebClientError> {
        let spu_serial = serial.into();
        if spu_serial.is_empty() {
            return Err(NebClientError::validation(
                "spu_serial",
                "must not be empty",
            ));
        }
        Ok(Self { spu_serial })
    }
}

/// Network configuration state of a SPU interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpInfoState {
    /// Whether DHCP is used.
    pub dhcp: bool,
    /// Assigned addresses.
    #[serde(default)]
    pub addresses: Vec<String>,
    /// Gateway address.
    #[serde(default)]
    pub gateway: Option<String>,
    /// Link aggregation mode.
    #[serde(default)]
    pub bond_mode: Option<String>,
    /// Transmit hash policy for bonded links.
    #[serde(default)]
    pub bond_transmit_hash_policy: Option<String>,
    /// MII monitoring interval for bonded links.
    #[serde(rename = "bondMIIMonitorMilliSeconds", default)]
    pub bond_mii_monitor_ms: Option<i64>,
    /// LACP transmit rate for bonded links.
    #[serde(rename = "bondLACPTransmitRate", default)]
    pub bond_lacp_transmit_rate: Option<String>,
    /// Names of the physical interfaces in this configuration.
    #[serde(default)]
    pub interface_names: Vec<String>,
    /// MAC address of the interface.
    #[serde(rename = "interfaceMAC", default)]
    pub interface_mac: Option<String>,
    /// Whether the link is half duplex.
    #[serde(default)]
    pub half_duplex: Option<bool>,
    /// Link speed in bytes per second.
    #[serde(default)]
    pub speed: Option<u64>,
    /// Whether the link speed is locked.
    #[serde(default)]
    pub locked_speed: Option<bool>,
    /// Link MTU.
    #[serde(default)]
    pub mtu: Option<u64>,
    /// Name of the connected switch, where reported.
    #[serde(default)]
    pub switch_name: Option<String>,
    /// MAC address of the connected switch, where reported.
    #[serde(rename = "switchMAC", default)]
    pub switch_mac: Option<String>,
    /// Port on the connected switch, where reported.
    #[serde(default)]
    pub switch_port: Option<String>,
}

impl IpInfoState {
    pub(crate) fn fields() -> String {
        [
            "dhcp",
            "addresses",
            "gateway",
            "bondMode",
            "bondTransmitHashPolicy",
            "bondMIIMonitorMilliSeconds",
            "bondLACPTransmitRate",
            "interfaceNames",
            "interfaceMAC",
            "halfDuplex",
            "speed",
            "lockedSpeed",
            "mtu",
            "switchName",
            "switchMAC",
            "switchPort",
        ]
        .join(",")
    }
}

/// A services processing unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spu {
    /// The nPod this SPU is part of.
    #[serde(rename = "nPod", default)]
    pub npod: Maybe<UuidRef>,
    /// The host this SPU is installed in.
    #[serde(default)]
    pub host: Maybe<UuidRef>,
    /// The serial number of the SPU.
    pub serial: String,
    /// The installed firmware version.
    pub version: String,
    /// The type of the SPU.
    #[serde(rename = "spuType")]
    pub spu_type: String,
    /// Hardware revision.
    pub hw_revision: String,
    /// Control interface network state.
    #[serde(default)]
    pub control_interface: Option<IpInfoState>,
    /// Data interface network states.
    #[serde(default)]
    pub data_interfaces: Vec<IpInfoState>,
    /// LUNs exported by this SPU.
    #[serde(default)]
    pub luns: Vec<UuidRef>,
    /// Number of LUNs exported by this SPU.
    pub lun_count: u64,
    /// NTP servers configured on this SPU.
    #[serde(default)]
    pub ntp_servers: Vec<NtpServer>,
    /// Physical drives attached to this SPU.
    #[serde(default)]
    pub physical_drives: Vec<WwnRef>,
    /// Number of physical drives attached to this SPU.
    pub physical_drive_count: u64,
    /// Number of nPod members this SPU can talk to.
    pub pod_member_can_talk_count: u64,
    /// Uptime of the SPU in seconds.
    pub uptime_seconds: u64,
}

impl Spu {
    pub(crate) fn fields() -> String {
        format!(
            "nPod{{uuid}},host{{uuid}},serial,version,spuType,hwRevision,\
             controlInterface{{{interfaces}}},dataInterfaces{{{interfaces}}},\
             luns{{uuid}},lunCount,ntpServers{{{ntp}}},physicalDrives{{wwn}},\
             physicalDriveCount,podMemberCanTalkCount,uptimeSeconds",
            interfaces = IpInfoState::fields(),
            ntp = NtpServer::fields()
        )
    }
}

impl NebClient {
    /// Retrieve a paginated list of SPUs.
    #[instrument(skip_all)]
    pub async fn get_spus(
        &self,
        page: Option<PageInput>,
        filter: Option<SpuFilter>,
        sort: Option<SpuSort>,
    ) -> Result<ItemList<Spu>, NebClientError> {
        let operation = Operation::query("getSPUs")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "SPUFilter", filter.as_ref())?
            .optional("sort", "SPUSort", sort.as_ref())?
            .selection(ItemList::<Spu>::fields(&Spu::fields()));
        self.call_list(operation).await
    }

    /// Claim an unregistered SPU for the organization.
    #[instrument(skip_all)]
    pub async fn claim_spu(&self, serial: &str) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("claimSPU").required("serial", "String", &serial)?;
        self.call(operation).await
    }

    /// Release a SPU from the organization. The SPU must not be part of a
    /// nPod.
    #[instrument(skip_all)]
    pub async fn release_spu(&self, serial: &str) -> Result<bool, NebClientError> {
        let operation =
            Operation::mutation("releaseSPU").required("spuSerial", "String", &serial)?;
        self.call(operation).await
    }

    /// Secure-erase all data on a SPU.
    #[instrument(skip_all)]
    pub async fn secure_erase_spu(
        &self,
        input: SecureEraseSpuInput,
    ) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("secureEraseSPU")
            .required("input", "SecureEraseSPUInput", &input)?;
        self.call(operation).await
    }

    /// Configure NTP servers for a SPU or a whole nPod.
    #[instrument(skip_all)]
    pub async fn set_ntp_servers(
        &self,
        input: SetNtpServersInput,
    ) -> Result<bool, NebClientError> {
        let operation =
            Operation::mutation("setNTPServers").required("input", "SetNTPServersInput", &input)?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn ntp_input_targets_exactly_one_scope() {
        let servers = vec![NtpServerInput::new("pool.ntp.org").unwrap().with_pool(true)];
        let input = SetNtpServersInput::for_spu("012345ABCD", servers).unwrap();
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "spuSerial": "012345ABCD",
                "servers": [{"serverHostname": "pool.ntp.org", "pool": true}]
            })
        );
    }

    #[test]
    fn ntp_input_rejects_empty_server_list() {
        assert!(SetNtpServersInput::for_spu("012345ABCD", Vec::new()).is_err());
    }

    #[test]
    fn spu_materializes_with_interface_state() {
        let spu: Spu = serde_json::from_value(json!({
            "serial": "012345ABCD",
            "version": "1.3.10",
            "spuType": "medium",
            "hwRevision": "revB",
            "controlInterface": {
                "dhcp": true,
                "addresses": ["10.0.0.5"],
                "interfaceNames": ["eth0"],
                "mtu": 1500
            },
            "lunCount": 0,
            "physicalDriveCount": 8,
            "podMemberCanTalkCount": 3,
            "uptimeSeconds": 86_400
        }))
        .unwrap();
        assert!(spu.npod.is_absent());
        let control = spu.control_interface.unwrap();
        assert!(control.dhcp);
        assert_eq!(control.mtu, Some(1500));
        assert!(spu.data_interfaces.is_empty());
    }
}
