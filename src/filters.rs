//! Scalar filter objects for list queries.
//!
//! A filter carries one comparator per populated field; unpopulated fields
//! contribute nothing to the outgoing document. Filters on separate resource
//! properties combine with implicit AND; the `and` / `or` fields allow
//! explicit composition of nested filters.

use serde::Serialize;
use uuid::Uuid;

/// A filter object to match string properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    equals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_equals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    begins_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ends_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    regex: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    in_list: Option<Vec<String>>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<StringFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<StringFilter>>,
}

impl StringFilter {
    /// Match by exact equality.
    #[must_use]
    pub fn equals(mut self, value: impl Into<String>) -> Self {
        self.equals = Some(value.into());
        self
    }

    /// Match by inequality.
    #[must_use]
    pub fn not_equals(mut self, value: impl Into<String>) -> Self {
        self.not_equals = Some(value.into());
        self
    }

    /// Match if the property contains the value.
    #[must_use]
    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    /// Match if the property does not contain the value.
    #[must_use]
    pub fn not_contains(mut self, value: impl Into<String>) -> Self {
        self.not_contains = Some(value.into());
        self
    }

    /// Match if the property starts with the value.
    #[must_use]
    pub fn begins_with(mut self, value: impl Into<String>) -> Self {
        self.begins_with = Some(value.into());
        self
    }

    /// Match if the property ends with the value.
    #[must_use]
    pub fn ends_with(mut self, value: impl Into<String>) -> Self {
        self.ends_with = Some(value.into());
        self
    }

    /// Match by regular expression.
    #[must_use]
    pub fn regex(mut self, value: impl Into<String>) -> Self {
        self.regex = Some(value.into());
        self
    }

    /// Match if the property is one of the provided values.
    #[must_use]
    pub fn in_list(mut self, values: Vec<String>) -> Self {
        self.in_list = Some(values);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: StringFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: StringFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// A filter object to match integer properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    equals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_equals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    less_than: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    less_than_equals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    greater_than: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    greater_than_equals: Option<i64>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    in_list: Option<Vec<i64>>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<IntFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<IntFilter>>,
}

impl IntFilter {
    /// Match with a `==` comparison.
    #[must_use]
    pub const fn equals(mut self, value: i64) -> Self {
        self.equals = Some(value);
        self
    }

    /// Match with a `!=` comparison.
    #[must_use]
    pub const fn not_equals(mut self, value: i64) -> Self {
        self.not_equals = Some(value);
        self
    }

    /// Match with a `<` comparison.
    #[must_use]
    pub const fn less_than(mut self, value: i64) -> Self {
        self.less_than = Some(value);
        self
    }

    /// Match with a `<=` comparison.
    #[must_use]
    pub const fn less_than_equals(mut self, value: i64) -> Self {
        self.less_than_equals = Some(value);
        self
    }

    /// Match with a `>` comparison.
    #[must_use]
    pub const fn greater_than(mut self, value: i64) -> Self {
        self.greater_than = Some(value);
        self
    }

    /// Match with a `>=` comparison.
    #[must_use]
    pub const fn greater_than_equals(mut self, value: i64) -> Self {
        self.greater_than_equals = Some(value);
        self
    }

    /// Match if the property is one of the provided values.
    #[must_use]
    pub fn in_list(mut self, values: Vec<i64>) -> Self {
        self.in_list = Some(values);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: IntFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: IntFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

/// A filter object to match UUID properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UuidFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    equals: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_equals: Option<Uuid>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    in_list: Option<Vec<Uuid>>,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    and_filter: Option<Box<UuidFilter>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    or_filter: Option<Box<UuidFilter>>,
}

impl UuidFilter {
    /// Match by exact equality.
    #[must_use]
    pub const fn equals(mut self, value: Uuid) -> Self {
        self.equals = Some(value);
        self
    }

    /// Match by inequality.
    #[must_use]
    pub const fn not_equals(mut self, value: Uuid) -> Self {
        self.not_equals = Some(value);
        self
    }

    /// Match if the property is one of the provided values.
    #[must_use]
    pub fn in_list(mut self, values: Vec<Uuid>) -> Self {
        self.in_list = Some(values);
        self
    }

    /// Concatenate another filter with a logical AND.
    #[must_use]
    pub fn and(mut self, other: UuidFilter) -> Self {
        self.and_filter = Some(Box::new(other));
        self
    }

    /// Concatenate another filter with a logical OR.
    #[must_use]
    pub fn or(mut self, other: UuidFilter) -> Self {
        self.or_filter = Some(Box::new(other));
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_filter_serializes_to_empty_fragment() {
        assert_eq!(
            serde_json::to_value(StringFilter::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn only_populated_comparators_serialize() {
        let filter = StringFilter::default().contains("db").begins_with("prod-");
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"contains": "db", "beginsWith": "prod-"})
        );
    }

    #[test]
    fn setter_order_does_not_change_output() {
        let a = StringFilter::default().contains("db").begins_with("prod-");
        let b = StringFilter::default().begins_with("prod-").contains("db");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn or_composition_nests_recursively() {
        let filter = StringFilter::default()
            .equals("volume a")
            .or(StringFilter::default().equals("volume b"));
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"equals": "volume a", "or": {"equals": "volume b"}})
        );
    }

    #[test]
    fn int_filter_renders_wire_comparator_names() {
        let filter = IntFilter::default()
            .greater_than_equals(1024)
            .less_than(4096);
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"lessThan": 4096, "greaterThanEquals": 1024})
        );
    }
}
