//! User account resources.

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

/// If and how often a user receives alert notifications by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendNotificationType {
    /// No email notifications.
    Disabled,
    /// An email per alert, as it happens.
    Instant,
    /// A daily digest of alerts.
    Daily,
    /// A rate this client version does not know about.
    #[serde(other, skip_serializing)]
    Unknown,
}

/// A sort object for users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SortDirection>,
}

impl UserSort {
    /// Sort by user name.
    #[must_use]
    pub const fn by_name(mut self, direction: SortDirection) -> Self {
        self.name = Some(direction);
        self
    }
}

/// A filter object for users.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<UuidFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<StringFilter>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<UserFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<UserFilter>>,
}

impl UserFilter {
    /// Filter by user UUID.
    #[must_use]
    pub fn with_uuid(mut self, filter: UuidFilter) -> Self {
        self.uuid = Some(filter);
        self
    }

    /// Filter by user name.
    #[must_use]
    pub fn with_name(mut self, filter: StringFilter) -> Self {
        self.name = Some(filter);
        self
    }

    /// Filter by email address.
    #[must_use]
    pub fn with_email(mut self, filter: StringFilter) -> Self {
        self.email = Some(filter);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: UserFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: UserFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// Input object to create a new user account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    name: String,
    password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    email: String,
    #[serde(rename = "userGroupUUID")]
    user_group_uuid: Uuid,
    first_name: String,
    last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_notification: Option<SendNotificationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl CreateUserInput {
    /// A new user account. The user will be asked to change the supplied
    /// password at first login.
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        user_group_uuid: Uuid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        let password = password.into();
        if password.is_empty() {
            return Err(NebClientError::validation("password", "must not be empty"));
        }
        let email = email.into();
        if email.is_empty() {
            return Err(NebClientError::validation("email", "must not be empty"));
        }
        Ok(Self {
            name,
            password,
            note: None,
            email,
            user_group_uuid,
            first_name: first_name.into(),
            last_name: last_name.into(),
            mobile_phone: None,
            business_phone: None,
            inactive: None,
            send_notification: None,
            time_zone: None,
        })
    }

    /// Attach a note to the user account.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Set the mobile phone number.
    #[must_use]
    pub fn with_mobile_phone(mut self, phone: impl Into<String>) -> Self {
        self.mobile_phone = Some(phone.into());
        self
    }

    /// Set the business phone number.
    #[must_use]
    pub fn with_business_phone(mut self, phone: impl Into<String>) -> Self {
        self.business_phone = Some(phone.into());
        self
    }

    /// Create the account in a disabled state.
    #[must_use]
    pub const fn with_inactive(mut self, inactive: bool) -> Self {
        self.inactive = Some(inactive);
        self
    }

    /// Configure alert notification emails.
    #[must_use]
    pub const fn with_send_notification(mut self, value: SendNotificationType) -> Self {
        self.send_notification = Some(value);
        self
    }

    /// Set the user's time zone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

/// Input object to update properties of a user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    note: Maybe<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(rename = "userGroupUIDs", skip_serializing_if = "Option::is_none")]
    user_group_uuids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_notification: Option<SendNotificationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl UpdateUserInput {
    /// Rename the user.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, NebClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NebClientError::validation("name", "must not be empty"));
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Change the password. The user will be asked to change it again at
    /// next login.
    pub fn with_password(mut self, password: impl Into<String>) -> Result<Self, NebClientError> {
        let password = password.into();
        if password.is_empty() {
            return Err(NebClientError::validation("password", "must not be empty"));
        }
        self.password = Some(password);
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

    /// Change the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Replace the full set of groups the user is part of.
    #[must_use]
    pub fn with_user_group_uuids(mut self, uuids: Vec<Uuid>) -> Self {
        self.user_group_uuids = Some(uuids);
        self
    }

    /// Change the first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Change the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Set the mobile phone number.
    #[must_use]
    pub fn with_mobile_phone(mut self, phone: impl Into<String>) -> Self {
        self.mobile_phone = Some(phone.into());
        self
    }

    /// Set the business phone number.
    #[must_use]
    pub fn with_business_phone(mut self, phone: impl Into<String>) -> Self {
        self.business_phone = Some(phone.into());
        self
    }

    /// Enable or disable the account.
    #[must_use]
    pub const fn with_inactive(mut self, inactive: bool) -> Self {
        self.inactive = Some(inactive);
        self
    }

    /// Configure alert notification emails.
    #[must_use]
    pub const fn with_send_notification(mut self, value: SendNotificationType) -> Self {
        self.send_notification = Some(value);
        self
    }

    /// Set the user's time zone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

/// Per-account display and notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// If and how often notifications are sent.
    pub send_notification: SendNotificationType,
    /// The user's time zone.
    pub time_zone: String,
    /// Whether capacity values are displayed in base 2.
    pub show_base_two: bool,
    /// The preferred date and time format.
    pub date_format: String,
}

impl UserPreferences {
    pub(crate) fn fields() -> String {
        ["sendNotification", "timeZone", "showBaseTwo", "dateFormat"].join(",")
    }
}

/// A user account in the organization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The unique identifier of the user.
    pub uuid: Uuid,
    /// The name of the user.
    pub name: String,
    /// An optional note for the user.
    #[serde(default)]
    pub note: Maybe<String>,
    /// The business email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Mobile phone number.
    #[serde(default)]
    pub mobile_phone: Option<String>,
    /// Business phone number.
    #[serde(default)]
    pub business_phone: Option<String>,
    /// Whether the account is disabled.
    pub inactive: bool,
    /// Groups the user is part of.
    #[serde(default)]
    pub groups: Vec<UuidRef>,
    /// Personal preferences, where configured.
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    /// RBAC policies assigned to the user.
    #[serde(default)]
    pub policies: Vec<UuidRef>,
}

impl User {
    pub(crate) fn fields() -> String {
        format!(
            "uuid,name,note,email,firstName,lastName,mobilePhone,businessPhone,\
             inactive,groups{{uuid}},preferences{{{}}},policies{{uuid}}",
            UserPreferences::fields()
        )
    }
}

impl NebClient {
    /// Retrieve a paginated list of user accounts.
    #[instrument(skip_all)]
    pub async fn get_users(
        &self,
        page: Option<PageInput>,
        filter: Option<UserFilter>,
        sort: Option<UserSort>,
    ) -> Result<ItemList<User>, NebClientError> {
        let operation = Operation::query("getUsers")
            .optional("page", "PageInput", page.as_ref())?
            .optional("filter", "UserFilter", filter.as_ref())?
            .optional("sort", "UserSort", sort.as_ref())?
            .selection(ItemList::<User>::fields(&User::fields()));
        self.call_list(operation).await
    }

    /// Count the user accounts matching a filter.
    #[instrument(skip_all)]
    pub async fn get_users_count(
        &self,
        filter: Option<UserFilter>,
    ) -> Result<u64, NebClientError> {
        let operation =
            Operation::query("getUsersCount").optional("filter", "UserFilter", filter.as_ref())?;
        self.call(operation).await
    }

    /// Create a new user account in the organization.
    #[instrument(skip_all)]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, NebClientError> {
        let operation = Operation::mutation("createOrgUser")
            .required("input", "CreateUserInput", &input)?
            .selection(User::fields());
        self.call(operation).await
    }

    /// Update properties of an existing user account.
    #[instrument(skip_all)]
    pub async fn update_user(
        &self,
        uuid: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, NebClientError> {
        let operation = Operation::mutation("updateOrgUser")
            .required("uuid", "UUID", &uuid)?
            .required("input", "UpdateUserInput", &input)?
            .selection(User::fields());
        self.call(operation).await
    }

    /// Delete a user account.
    #[instrument(skip_all)]
    pub async fn delete_user(&self, uuid: Uuid) -> Result<bool, NebClientError> {
        let operation = Operation::mutation("deleteOrgUser").required("uuid", "UUID", &uuid)?;
        self.call(operation).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn create_input_uses_singular_group_key() {
        let group = Uuid::parse_str("26bb5823-6a31-4e2f-8457-1a9c7e93976e").unwrap();
        let input = CreateUserInput::new("jdoe", "s3cret!", "jdoe@example.com", group, "Jo", "Doe")
            .unwrap()
            .with_send_notification(SendNotificationType::Daily);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "name": "jdoe",
                "password": "s3cret!",
                "email": "jdoe@example.com",
                "userGroupUUID": "26bb5823-6a31-4e2f-8457-1a9c7e93976e",
                "firstName": "Jo",
                "lastName": "Doe",
                "sendNotification": "Daily"
            })
        );
    }

    #[test]
    fn update_input_uses_plural_group_key() {
        let group = Uuid::parse_str("26bb5823-6a31-4e2f-8457-1a9c7e93976e").unwrap();
        let input = UpdateUserInput::default().with_user_group_uuids(vec![group]);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"userGroupUIDs": ["26bb5823-6a31-4e2f-8457-1a9c7e93976e"]})
        );
    }

    #[test]
    fn create_input_rejects_empty_password() {
        let group = Uuid::nil();
        assert!(
            CreateUserInput::new("jdoe", "", "jdoe@example.com", group, "Jo", "Doe").is_err()
        );
    }

    #[test]
    fn user_materializes_with_preferences() {
        let user: User = serde_json::from_value(json!({
            "uuid": "7c5a3c26-9b3e-4e22-9d55-d8ca02c0f3c8",
            "name": "jdoe",
            "note": null,
            "email": "jdoe@example.com",
            "firstName": "Jo",
            "lastName": "Doe",
            "inactive": false,
            "groups": [{"uuid": "26bb5823-6a31-4e2f-8457-1a9c7e93976e"}],
            "preferences": {
                "sendNotification": "Instant",
                "timeZone": "US/Pacific",
                "showBaseTwo": false,
                "dateFormat": "ISO8601"
            }
        }))
        .unwrap();
        assert!(user.note.is_null());
        let preferences = user.preferences.unwrap();
        assert_eq!(preferences.send_notification, SendNotificationType::Instant);
    }

    #[test]
    fn unknown_notification_rate_is_tolerated() {
        let preferences: UserPreferences = serde_json::from_value(json!({
            "sendNotification": "Weekly",
            "timeZone": "UTC",
            "showBaseTwo": true,
            "dateFormat": "ISO8601"
        }))
        .unwrap();
        assert_eq!(preferences.send_notification, SendNotificationType::Unknown);
    }
}
