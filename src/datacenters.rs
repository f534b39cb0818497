//! Datacenter resources.
//!
//! Datacenters are the top level of the physical location hierarchy
//! (datacenter, room, row, rack) that hosts are placed into.

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

/// A postal address for a datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// House number and letter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    /// First address line.
    pub address1: String,
    /// Second address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// Third address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address3: Option<String>,
    /// City name.
    pub city: String,
    /// State or province code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province_code: Option<String>,
    /// Postal code.
    pub postal_code: String,
    /// ISO country code.
    pub country_code: String,
}

impl Address {
    /// A minimal valid address.
    pub fn new(
        address1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Result<Self, NebClientError> {
        let address1 = address1.into();
        if address1.is_empty() {
            return Err(NebClientError::validation("address1", "must not be empty"));
        }
        Ok(Self {
            house_number: None,
            address1,
            address2: None,
            address3: None,
            city: city.into(),
            state_province_code: None,
            postal_code: postal_code.into(),
            country_code: country_code.into(),
        })
    }

    pub(crate) fn fields() -> String {
        [
            "houseNumber",
            "address1",
            "address2",
            "address3",
            "city",
            "stateProvinceCode",
            "postalCode",
            "countryCode",
        ]
        .join(",")
    }
}

/// How a datacenter contact prefers to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunicationMethodType {
    /// Contact by email.
    Email,
    /// Contact by phone.
    Phone,
    /// A method this client version does not know about.
    #[serde(other, skip_serializing)]
    Unknown,
}

/// A contact person for a datacenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// The user to contact.
    #[serde(rename = "userUUID")]
    pub user_uuid: Uuid,
    /// Whether this is the primary contact.
    pub primary: bool,
    /// The preferred communication method.
    pub communication_method: CommunicationMethodType,
}

impl Contact {
    /// A contact entry for the given user.
    #[must_use]
    pub const fn new(
        user_uuid: Uuid,
        primary: bool,
        communication_method: CommunicationMethodType,
    ) -> Self {
        Self {
            user_uuid,
            primary,
            communication_method,
        }
    }

    pub(crate) fn fields() -> String {
        ["userUUID", "primary", "communicationMethod"].join(",")
    }
}

/// A sort object for datacenters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataCenterSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
}

impl DataCenterSort {
    /// Sort by datacenter name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }
}

/// A filter object for datacenters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataCenterFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<DataCenterFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<DataCenterFilter>>,
}

impl DataCenterFilter {
    /// Filter by datacenter UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by datacenter name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: DataCenterFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: DataCenterFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// Input object to create a datacenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDataCenterInput {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    address: Address,
    contacts: Vec<Contact>,
}

impl CreateDataCenterInput {
    /// A new datacenter with the given name, address and contacts. At least
    /// one contact is required.
    pub fn new(
        name: impl Into<String>,
        address: Address,
        contacts: Vec<Contact>,
    ) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        if contacts.is_empty() {
            return Err(NebClientError::validation(
                "contacts",
                "at least one contact is required",
            ));
        }
        Ok(Self {
            name,
            note: None,
            address,
            contacts,
        })
    }

    /// Attach a note to the datacenter.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Input object to update datacenter properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDataCenterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    note: Maybe<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contacts: Option<Vec<Contact>>,
}

impl UpdateDataCenterInput {
    /// Rename the datacenter.
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

    /// Remove the note.
    #[must_use]
    pub fn clear_note(mut self) -> Self {
        self.note = Maybe::Null;
        self
    }

    /// Replace the postal address.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Replace the full contact list.
    pub fn with_contacts(mut self, contacts: Vec<Contact>) -> Result<Self, NebClientError> {
        if contacts.is_empty() {
            return Err(NebClientError::validation(
                "contacts",
                "at least one contact is required",
            ));
        }
        self.contacts = Some(contacts);
        Ok(self)
    }
}

/// Input object to delete a datacenter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteDataCenterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    cascade: Option<bool>,
}

impl DeleteDataCenterInput {
    /// Also delete all rooms, rows and racks in the datacenter. They must
    /// not host any SPUs.
    #[must_use]
    pub const fn with_cascade(mut self, cascade: bool) -> Self {
        self.cascade = Some(cascade);
        self
    }
}

/// A datacenter location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCenter {
    /// The unique identifier of the datacenter.
    pub uuid: Uuid,
    /// The name of the datacenter.
    pub name: String,
    /// An optional note for the datacenter.
    #[serde(default)]
    pub note: Maybe<String>,
    /// The postal address of the datacenter.
    pub address: Address,
    /// Contact persons for the datacenter.
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Rooms in this datacenter.
    #[serde(default)]
    pub rooms: Vec<UuidRef>,
    /// Number of rooms in this datacenter.
    pub room_count: u64,
    /// Number of rows in this datacenter.
    pub row_count: u64,
    /// Number of racks in this datacenter.
    pub rack_count: u64,
    /// Number of hosts in this datacenter.
    pub host_count: u64,
}

impl DataCenter {
    pub(crate) fn fields() -> String {
        format!(
            "uuid,name,note,address{{{}}},contacts{{{}}},rooms{{uuid}},\
             roomCount,rowCount,rackCount,hostCount",
            Address::fields(),
            Contact::fields()
        )
    }
}

impl NebClient {
    /// Retrieve a paginated list of datacenters.
    #[instrument(skip_all)]
    pub async fn get_datacenters(
        &self,
        page: Option<PageInput>,
        filter: Option<DataCenterFilter>,
        sort: Option<DataCenterSort>,
    ) -> Result<ItemList<DataCenter>, NebClientError> {
        let operation = Operation::query("getDataCenters")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "DataCenterFilter", filter.as_ref())?
            .optional("sort", "DataCenterSort", sort.as_ref())?
            .selection(ItemList::<DataCenter>::fields(&DataCenter::fields()));
        self.call_list(operation).await
    }

    /// Create a new datacenter.
    #[instrument(skip_all)]
    pub async fn create_datacenter(
        &self,
        input: CreateDataCenterInput,
    ) -> Result<DataCenter, NebClientError> {
        let operation = Operation::mutation("createDataCenter")
            .required("input", "CreateDataCenterInput", &input)?
            .selection(DataCenter::fields());
        self.call(operation).await
    }

    /// Update datacenter properties.
    #[instrument(skip_all)]
    pub async fn update_datacenter(
        &self,
        uuid: Uuid,
        input: UpdateDataCenterInput,
    ) -> Result<DataCenter, NebClientError> {
        let operation = Operation::mutation("updateDataCenter")
            .required("uuid", "UUID", &uuid)?
            .required("input", "UpsertDataCenterInput", &input)?
            .selection(DataCenter::fields());
        self.call(operation).await
    }

    /// Delete a datacenter. The datacenter must be empty unless `cascade`
    /// is set.
    #[instrument(skip_all)]
    pub async fn delete_datacenter(
        &self,
        uuid: Uuid,
        input: DeleteDataCenterInput,
    ) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("deleteDataCenter")
            .required("uuid", "UUID", &uuid)?
            .required("input", "DeleteDataCenterInput", &input)?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn test_address() -> Address {
        Address::new("100 Main St", "San Jose", "95110", "US").unwrap()
    }

    fn test_contact() -> Contact {
        Contact::new(
            Uuid::parse_str("7c5a3c26-9b3e-4e22-9d55-d8ca02c0f3c8").unwrap(),
            true,
            CommunicationMethodType::Email,
        )
    }

    #[test]
    fn create_input_requires_a_contact() {
        let err = CreateDataCenterInput::new("dc-west", test_address(), Vec::new()).unwrap_err();
        assert!(matches!(err, NebClientError::Validation { ref field, .. } if *field == "contacts"));
    }

    #[test]
    fn create_input_serializes_nested_objects() {
        let input = CreateDataCenterInput::new("dc-west", test_address(), vec![test_contact()])
            .unwrap()
            .with_note("primary site");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "name": "dc-west",
                "note": "primary site",
                "address": {
                    "address1": "100 Main St",
                    "city": "San Jose",
                    "postalCode": "95110",
                    "countryCode": "US"
                },
                "contacts": [{
                    "userUUID": "7c5a3c26-9b3e-4e22-9d55-d8ca02c0f3c8",
                    "primary": true,
                    "communicationMethod": "Email"
                }]
            })
        );
    }

    #[test]
    fn datacenter_materializes_from_reply() {
        let datacenter: DataCenter = serde_json::from_value(json!({
            "uuid": "2b9906b1-b409-4b3e-85b6-40ec74fc8f32",
            "name": "dc-west",
            "note": null,
            "address": {
                "address1": "100 Main St",
                "city": "San Jose",
                "postalCode": "95110",
                "countryCode": "US"
            },
            "contacts": [],
            "roomCount": 2,
            "rowCount": 8,
            "rackCount": 40,
            "hostCount": 160
        }))
        .unwrap();
        assert!(datacenter.note.is_null());
        assert_eq!(datacenter.rack_count, 40);
        assert!(datacenter.rooms.is_empty());
    }

    #[test]
    fn unknown_communication_method_is_tolerated() {
        let contact: Contact = serde_json::from_value(json!({
            "userUUID": "7c5a3c26-9b3e-4e22-9d55-d8ca02c0f3c8",
            "primary": false,
            "communicationMethod": "Pager"
        }))
        .unwrap();
        assert_eq!(
            contact.communication_method,
            CommunicationMethodType::Unknown
        );
    }
}
