//! Snapshots, clones, and snapshot schedule templates.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::client::NebClient;
use crate::error::NebClientError;
use crate::filters::{StringFilter, UuidFilter};
use crate::operation::Operation;
use crate::page::{ItemList, PageInput};
use crate::sorting::SortDirection;
use crate::volumes::Volume;

/// Consistency level for snapshot operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotConsistencyLevel {
    /// Consistent for a single volume.
    Volume,
    /// Consistent across all volumes on a single SPU.
    #[serde(rename = "SPU")]
    Spu,
    /// Consistent across an entire nPod.
    NPod,
    /// The level reported by the server is not known to this client.
    #[serde(other, skip_serializing)]
    Unknown,
}

/// Input object to take snapshots of one or more parent volumes.
///
/// `name_patterns` must carry one pattern per parent volume or a single
/// pattern applied to all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSnapshotInput {
    parent_volume_uuids: Vec<Uuid>,
    name_patterns: Vec<String>,
    consistency_level: Option<SnapshotConsistencyLevel>,
    read_only: Option<bool>,
    expiration_sec: Option<i64>,
    retention_sec: Option<i64>,
}

impl CreateSnapshotInput {
    /// Create a snapshot input for the given parent volumes.
    pub fn new(
        parent_volume_uuids: Vec<Uuid>,
        name_patterns: Vec<String>,
    ) -> Result<Self, NebClientError> {
        if parent_volume_uuids.is_empty() {
            return Err(NebClientError::validation(
                "parent_volume_uuids",
                "at least one parent volume is required",
            ));
        }
        if name_patterns.is_empty() {
            return Err(NebClientError::validation(
                "name_patterns",
                "at least one name pattern is required",
            ));
        }
        Ok(Self {
            parent_volume_uuids,
            name_patterns,
            consistency_level: None,
            read_only: None,
            expiration_sec: None,
            retention_sec: None,
        })
    }

    /// Consistency level for the snapshots.
    #[must_use]
    pub const fn with_consistency_level(mut self, level: SnapshotConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Take read-only snapshots.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Seconds until the snapshots are automatically deleted.
    #[must_use]
    pub const fn with_expiration_sec(mut self, seconds: i64) -> Self {
        self.expiration_sec = Some(seconds);
        self
    }

    /// Seconds the snapshots are protected against manual deletion.
    #[must_use]
    pub const fn with_retention_sec(mut self, seconds: i64) -> Self {
        self.retention_sec = Some(seconds);
        self
    }
}

/// Input object to create a writeable clone of a volume or snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCloneInput {
    #[serde(rename = "cloneVolumeName")]
    name: String,
    #[serde(rename = "originVolumeUUID")]
    volume_uuid: Uuid,
}

impl CreateCloneInput {
    /// Create a clone input for the given origin volume or snapshot.
    pub fn new(name: impl Into<String>, volume_uuid: Uuid) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        Ok(Self { name, volume_uuid })
    }
}

/// Cron-style schedule for automatic operations. Empty dimensions mean
/// "every".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    minute: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hour: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_week: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_month: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<Vec<i64>>,
}

impl ScheduleInput {
    /// Run at the given minutes of the hour.
    #[must_use]
    pub fn minutes(mut self, values: Vec<i64>) -> Self {
        self.minute = Some(values);
        self
    }

    /// Run at the given hours of the day.
    #[must_use]
    pub fn hours(mut self, values: Vec<i64>) -> Self {
        self.hour = Some(values);
        self
    }

    /// Run on the given days of the week.
    #[must_use]
    pub fn days_of_week(mut self, values: Vec<i64>) -> Self {
        self.day_of_week = Some(values);
        self
    }

    /// Run on the given days of the month.
    #[must_use]
    pub fn days_of_month(mut self, values: Vec<i64>) -> Self {
        self.day_of_month = Some(values);
        self
    }

    /// Run in the given months.
    #[must_use]
    pub fn months(mut self, values: Vec<i64>) -> Self {
        self.month = Some(values);
        self
    }
}

/// A sort object for snapshot schedule templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotScheduleTemplateSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
}

impl SnapshotScheduleTemplateSort {
    /// Sort by template name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }
}

/// A filter object for snapshot schedule templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotScheduleTemplateFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<SnapshotScheduleTemplateFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<SnapshotScheduleTemplateFilter>>,
}

impl SnapshotScheduleTemplateFilter {
    /// Filter by template UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by template name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: SnapshotScheduleTemplateFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: SnapshotScheduleTemplateFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// Input object to create a snapshot schedule template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotScheduleTemplateInput {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_pattern: Option<String>,
    schedule: ScheduleInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retention_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    consistency_level: Option<SnapshotConsistencyLevel>,
    #[serde(rename = "ignoreBootLUNs", skip_serializing_if = "Option::is_none")]
    ignore_boot_luns: Option<bool>,
}

impl CreateSnapshotScheduleTemplateInput {
    /// Create a template input with the given name and schedule.
    pub fn new(
        name: impl Into<String>,
        schedule: ScheduleInput,
    ) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        Ok(Self {
            name,
            name_pattern: None,
            schedule,
            expiration_sec: None,
            retention_sec: None,
            consistency_level: None,
            ignore_boot_luns: None,
        })
    }

    /// Naming pattern for snapshots created from this template.
    #[must_use]
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Seconds until snapshots are automatically deleted.
    #[must_use]
    pub const fn with_expiration_sec(mut self, seconds: i64) -> Self {
        self.expiration_sec = Some(seconds);
        self
    }

    /// Seconds snapshots are protected against manual deletion.
    #[must_use]
    pub const fn with_retention_sec(mut self, seconds: i64) -> Self {
        self.retention_sec = Some(seconds);
        self
    }

    /// Consistency level for snapshots created from this template.
    #[must_use]
    pub const fn with_consistency_level(
        mut self,
        level: SnapshotConsistencyLevel,
    ) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Exclude boot volumes from scheduled snapshots.
    #[must_use]
    pub const fn with_ignore_boot_luns(mut self, ignore: bool) -> Self {
        self.ignore_boot_luns = Some(ignore);
        self
    }
}

/// Input object to update a snapshot schedule template. Fields left unset
/// remain unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSnapshotScheduleTemplateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<ScheduleInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retention_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    consistency_level: Option<SnapshotConsistencyLevel>,
    #[serde(rename = "ignoreBootLUNs", skip_serializing_if = "Option::is_none")]
    ignore_boot_luns: Option<bool>,
}

impl UpdateSnapshotScheduleTemplateInput {
    /// Rename the template.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Change the snapshot naming pattern.
    #[must_use]
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Replace the schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: ScheduleInput) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Change the expiration window.
    #[must_use]
    pub const fn with_expiration_sec(mut self, seconds: i64) -> Self {
        self.expiration_sec = Some(seconds);
        self
    }

    /// Change the retention window.
    #[must_use]
    pub const fn with_retention_sec(mut self, seconds: i64) -> Self {
        self.retention_sec = Some(seconds);
        self
    }

    /// Change the consistency level.
    #[must_use]
    pub const fn with_consistency_level(
        mut self,
        level: SnapshotConsistencyLevel,
    ) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Include or exclude boot volumes.
    #[must_use]
    pub const fn with_ignore_boot_luns(mut self, ignore: bool) -> Self {
        self.ignore_boot_luns = Some(ignore);
        self
    }
}

/// Input object to delete a snapshot schedule template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSnapshotScheduleTemplateInput {
    force: Option<bool>,
}

impl DeleteSnapshotScheduleTemplateInput {
    /// Delete the template even if schedules are provisioned from it.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }
}

/// A schedule as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Minutes of the hour.
    #[serde(default)]
    pub minute: Vec<i64>,
    /// Hours of the day.
    #[serde(default)]
    pub hour: Vec<i64>,
    /// Days of the week.
    #[serde(default)]
    pub day_of_week: Vec<i64>,
    /// Days of the month.
    #[serde(default)]
    pub day_of_month: Vec<i64>,
    /// Months of the year.
    #[serde(default)]
    pub month: Vec<i64>,
}

impl Schedule {
    pub(crate) fn fields() -> String {
        ["minute", "hour", "dayOfWeek", "dayOfMonth", "month"].join(",")
    }
}

/// A snapshot schedule template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotScheduleTemplate {
    /// The unique identifier of the template.
    pub uuid: Uuid,
    /// The name of the template.
    pub name: String,
    /// Naming pattern for created snapshots.
    #[serde(default)]
    pub name_pattern: Option<String>,
    /// The schedule in which snapshots are taken.
    pub schedule: Schedule,
    /// Seconds until snapshots are automatically deleted.
    #[serde(default)]
    pub expiration_sec: Option<i64>,
    /// Seconds snapshots are protected against manual deletion.
    #[serde(default)]
    pub retention_sec: Option<i64>,
    /// Snapshot consistency level.
    #[serde(default)]
    pub consistency_level: Option<SnapshotConsistencyLevel>,
    /// Whether boot volumes are excluded.
    #[serde(rename = "ignoreBootLUNs", default)]
    pub ignore_boot_luns: Option<bool>,
    /// Number of nPod templates using this template.
    #[serde(rename = "associatedNPodTemplateCount", default)]
    pub associated_npod_template_count: u64,
    /// Number of provisioned schedules from this template.
    #[serde(default)]
    pub associated_schedule_count: u64,
}

impl SnapshotScheduleTemplate {
    pub(crate) fn fields() -> String {
        format!(
            "uuid,name,namePattern,schedule{{{}}},expirationSec,retentionSec,\
             consistencyLevel,ignoreBootLUNs,associatedNPodTemplateCount,\
             associatedScheduleCount",
            Schedule::fields()
        )
    }
}

impl NebClient {
    /// Take snapshots of the parent volumes named by the input.
    #[instrument(skip_all)]
    pub async fn create_snapshot(
        &self,
        input: CreateSnapshotInput,
    ) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("createSnap")
            .required("parentVvUID", "[String!]", &input.parent_volume_uuids)?
            .required("snapNamePattern", "[String!]", &input.name_patterns)?
            .optional(
                "consistencyLevel",
                "SnapConsistencyLevel",
                input.consistency_level.as_ref(),
            )?
            .optional("roSnap", "Boolean", input.read_only.as_ref())?
            .optional("expirationSec", "Int", input.expiration_sec.as_ref())?
            .optional("retentionSec", "Int", input.retention_sec.as_ref())?;
        self.call(operation).await
    }

    /// Create a writeable clone of a volume or snapshot.
    #[instrument(skip_all)]
    pub async fn create_clone(
        &self,
        input: CreateCloneInput,
    ) -> Result<Volume, NebClientError> {
        let operation = Operation::mutation("createClone")
            .required("input", "CreateCloneInput", &input)?
            .selection(Volume::fields());
        self.call(operation).await
    }

    /// Retrieve a paginated list of snapshot schedule templates.
    #[instrument(skip_all)]
    pub async fn get_snapshot_schedule_templates(
        &self,
        page: Option<PageInput>,
        filter: Option<SnapshotScheduleTemplateFilter>,
        sort: Option<SnapshotScheduleTemplateSort>,
    ) -> Result<ItemList<SnapshotScheduleTemplate>, NebClientError> {
        let operation = Operation::query("getSnapshotScheduleTemplates")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "SnapshotScheduleTemplateFilter", filter.as_ref())?
            .optional("sort", "SnapshotScheduleTemplateSort", sort.as_ref())?
            .selection(ItemList::<SnapshotScheduleTemplate>::fields(
                &SnapshotScheduleTemplate::fields(),
            ));
        self.call_list(operation).await
    }

    /// Create a snapshot schedule template.
    #[instrument(skip_all)]
    pub async fn create_snapshot_schedule_template(
        &self,
        input: CreateSnapshotScheduleTemplateInput,
    ) -> Result<SnapshotScheduleTemplate, NebClientError> {
        let operation = Operation::mutation("createSnapshotScheduleTemplate")
            .required("input", "CreateSnapshotScheduleTemplateInput", &input)?
            .selection(SnapshotScheduleTemplate::fields());
        self.call(operation).await
    }

    /// Modify a snapshot schedule template.
    #[instrument(skip_all)]
    pub async fn update_snapshot_schedule_template(
        &self,
        uuid: Uuid,
        input: UpdateSnapshotScheduleTemplateInput,
    ) -> Result<SnapshotScheduleTemplate, NebClientError> {
        let operation = Operation::mutation("updateSnapshotScheduleTemplate")
            .required("uuid", "UUID", &uuid)?
            .required("input", "UpdateSnapshotScheduleTemplateInput", &input)?
            .selection(SnapshotScheduleTemplate::fields());
        self.call(operation).await
    }

    /// Delete a snapshot schedule template.
    #[instrument(skip_all)]
    pub async fn delete_snapshot_schedule_template(
        &self,
        uuid: Uuid,
        input: DeleteSnapshotScheduleTemplateInput,
    ) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("deleteSnapshotScheduleTemplate")
            .required("uuid", "UUID", &uuid)?
            .optional("force", "Boolean", input.force.as_ref())?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn clone_input_uses_wire_names() {
        let uuid: Uuid = "7d1b4b8e-0000-0000-0000-000000000001".parse().unwrap();
        let input = CreateCloneInput::new("clone-a", uuid).unwrap();
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "cloneVolumeName": "clone-a",
                "originVolumeUUID": "7d1b4b8e-0000-0000-0000-000000000001"
            })
        );
    }

    #[test]
    fn snapshot_input_rejects_empty_parent_volumes() {
        assert!(CreateSnapshotInput::new(Vec::new(), vec!["%v_%y%m%d".into()]).is_err());
    }

    #[test]
    fn snapshot_input_rejects_empty_name_patterns() {
        let uuid: Uuid = "7d1b4b8e-0000-0000-0000-000000000001".parse().unwrap();
        assert!(CreateSnapshotInput::new(vec![uuid], Vec::new()).is_err());
    }

    #[test]
    fn spu_consistency_level_renders_uppercase() {
        assert_eq!(
            serde_json::to_value(SnapshotConsistencyLevel::Spu).unwrap(),
            json!("SPU")
        );
    }

    #[test]
    fn template_materializes_with_nested_schedule() {
        let template: SnapshotScheduleTemplate = serde_json::from_value(json!({
            "uuid": "7d1b4b8e-0000-0000-0000-000000000002",
            "name": "hourly",
            "namePattern": "%v_%y%m%d%H%M",
            "schedule": {"minute": [0], "hour": [0, 6, 12, 18]},
            "expirationSec": 172_800,
            "consistencyLevel": "Volume",
            "associatedNPodTemplateCount": 1,
            "associatedScheduleCount": 4
        }))
        .unwrap();
        assert_eq!(template.schedule.hour, vec![0, 6, 12, 18]);
        assert_eq!(
            template.consistency_level,
            Some(SnapshotConsistencyLevel::Volume)
        );
        assert_eq!(template.retention_sec, None);
    }
}
