//! nPod group resources.
//!
//! nPod groups collect nPods for organizational purposes, e.g. by
//! application or location.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::client::NebClient;
use crate::error::NebClientError;
use crate::filters::{StringFilter, UuidFilter};
use crate::maybe::Maybe;
use crate::operation::Operation;
use crate::page::{ItemList, PageInput};
use crate::refs::UuidRef;
use crate::sorting::SortDirection;

/// A sort object for nPod groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NPodGroupSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
}

impl NPodGroupSort {
    /// Sort by group name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }
}

/// A filter object for nPod groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NPodGroupFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<NPodGroupFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<NPodGroupFilter>>,
}

impl NPodGroupFilter {
    /// Filter by group UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by group name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: NPodGroupFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: NPodGroupFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// Input object to create a nPod group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNPodGroupInput {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl CreateNPodGroupInput {
    /// Create a group input with the given name.
    pub fn new(name: impl Into<String>) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        Ok(Self { name, note: None })
    }

    /// Attach a note to the group.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Input object to update a nPod group.
///
/// `name` left unset remains unchanged. `note` is tri-state: unset leaves
/// the note unchanged, while an explicit null clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateNPodGroupInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    note: Maybe<String>,
}

impl UpdateNPodGroupInput {
    /// Rename the group.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Replace the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Maybe::Value(note.into());
        self
    }

    /// Clear the note (sends an explicit null).
    #[must_use]
    pub fn clear_note(mut self) -> Self {
        self.note = Maybe::Null;
        self
    }
}

/// A group of nPods.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NPodGroup {
    /// The unique identifier of the group.
    pub uuid: Uuid,
    /// The name of the group.
    pub name: String,
    /// An optional note for the group.
    pub note: String,
    /// nPods in this group.
    #[serde(rename = "nPods", default)]
    pub npods: Vec<UuidRef>,
    /// Number of nPods in this group.
    #[serde(rename = "nPodCount")]
    pub npod_count: u64,
    /// Number of hosts across all nPods in this group.
    pub host_count: u64,
    /// Number of SPUs across all nPods in this group.
    pub spu_count: u64,
}

impl NPodGroup {
    pub(crate) fn fields() -> String {
        [
            "uuid",
            "name",
            "note",
            "nPods{uuid}",
            "nPodCount",
            "hostCount",
            "spuCount",
        ]
        .join(",")
    }
}

impl NebClient {
    /// Retrieve a paginated list of nPod groups.
    #[instrument(skip_all)]
    pub async fn get_npod_groups(
        &self,
        page: Option<PageInput>,
        filter: Option<NPodGroupFilter>,
        sort: Option<NPodGroupSort>,
    ) -> Result<ItemList<NPodGroup>, NebClientError> {
        let operation = Operation::query("getNPodGroups")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "NPodGroupFilter", filter.as_ref())?
            .optional("sort", "NPodGroupSort", sort.as_ref())?
            .selection(ItemList::<NPodGroup>::fields(&NPodGroup::fields()));
        self.call_list(operation).await
    }

    /// Create a new nPod group.
    #[instrument(skip_all)]
    pub async fn create_npod_group(
        &self,
        input: CreateNPodGroupInput,
    ) -> Result<NPodGroup, NebClientError> {
        let operation = Operation::mutation("createNPodGroup")
            .required("input", "CreateNPodGroupInput", &input)?
            .selection(NPodGroup::fields());
        self.call(operation).await
    }

    /// Modify a nPod group.
    #[instrument(skip_all)]
    pub async fn update_npod_group(
        &self,
        uuid: Uuid,
        input: UpdateNPodGroupInput,
    ) -> Result<NPodGroup, NebClientError> {
        let operation = Operation::mutation("updateNPodGroup")
            .required("uuid", "UUID", &uuid)?
            .required("input", "UpdateNPodGroupInput", &input)?
            .selection(NPodGroup::fields());
        self.call(operation).await
    }

    /// Delete a nPod group. The group must not contain any nPods.
    #[instrument(skip_all)]
    pub async fn delete_npod_group(&self, uuid: Uuid) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("deleteNPodGroup").required("uuid", "UUID", &uuid)?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unset_note_is_omitted_from_update() {
        let input = UpdateNPodGroupInput::default().with_name("tier-1").unwrap();
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"name": "tier-1"})
        );
    }

    #[test]
    fn cleared_note_serializes_as_explicit_null() {
        let input = UpdateNPodGroupInput::default().clear_note();
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"note": null}));
    }

    #[test]
    fn replaced_note_serializes_as_value() {
        let input = UpdateNPodGroupInput::default().with_note("lab pods");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"note": "lab pods"})
        );
    }
}
