//! Sort direction for list queries.

use serde::{Deserialize, Serialize};

/// Sort direction for a single sortable property.
///
/// Resource sort objects apply their populated keys in declared order; an
/// omitted sort leaves the server's stable default order in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Sort items in ascending order.
    Ascending,
    /// Sort items in descending order.
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_wire_enum_name() {
        assert_eq!(
            serde_json::to_value(SortDirection::Ascending).unwrap(),
            serde_json::json!("Ascending")
        );
    }
}
