//! GraphQL document construction.
//!
//! Every client method describes its operation as an [`Operation`]: a kind,
//! a name, an ordered argument list, and the requested selection set. The
//! operation renders into a document where all arguments are bound as named
//! variables and into a parallel map of variable bindings. Rendering is
//! deterministic: the same operation always yields byte-identical text and
//! bindings, so documents are safe to cache by operation name.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::NebClientError;

/// Kind of a GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// A read-only query.
    Query,
    /// A mutation.
    Mutation,
}

impl OperationKind {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

#[derive(Debug, Clone)]
struct Argument {
    name: &'static str,
    type_name: &'static str,
    mandatory: bool,
    value: Value,
}

/// A single GraphQL operation under construction.
///
/// Arguments render in the order they were added; input objects serialize
/// their fields in declaration order. Optional arguments that were not set
/// are omitted entirely, which leaves the server default in effect
/// (first page, stable default order).
#[derive(Debug, Clone)]
pub struct Operation {
    kind: OperationKind,
    name: &'static str,
    arguments: Vec<Argument>,
    selection: String,
}

impl Operation {
    /// Start a query operation.
    #[must_use]
    pub fn query(name: &'static str) -> Self {
        Self::new(OperationKind::Query, name)
    }

    /// Start a mutation operation.
    #[must_use]
    pub fn mutation(name: &'static str) -> Self {
        Self::new(OperationKind::Mutation, name)
    }

    fn new(kind: OperationKind, name: &'static str) -> Self {
        Self {
            kind,
            name,
            arguments: Vec::new(),
            selection: String::new(),
        }
    }

    /// Bind a mandatory argument. The type name renders with a `!` suffix.
    pub fn required<T: Serialize>(
        self,
        name: &'static str,
        type_name: &'static str,
        value: &T,
    ) -> Result<Self, NebClientError> {
        self.push(name, type_name, true, value)
    }

    /// Bind an optional argument. `None` contributes nothing to the
    /// document or the bindings.
    pub fn optional<T: Serialize>(
        self,
        name: &'static str,
        type_name: &'static str,
        value: Option<&T>,
    ) -> Result<Self, NebClientError> {
        match value {
            Some(value) => self.push(name, type_name, false, value),
            None => Ok(self),
        }
    }

    fn push<T: Serialize>(
        mut self,
        name: &'static str,
        type_name: &'static str,
        mandatory: bool,
        value: &T,
    ) -> Result<Self, NebClientError> {
        let value = serde_json::to_value(value)?;
        self.arguments.push(Argument {
            name,
            type_name,
            mandatory,
            value,
        });
        Ok(self)
    }

    /// Set the selection set to request, verbatim.
    #[must_use]
    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = selection.into();
        self
    }

    /// The operation name, which keys the reply under `data`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Render the document text.
    #[must_use]
    pub fn render(&self) -> String {
        let keyword = self.kind.keyword();

        let mut specs = Vec::with_capacity(self.arguments.len());
        let mut mappings = Vec::with_capacity(self.arguments.len());
        for argument in &self.arguments {
            let suffix = if argument.mandatory { "!" } else { "" };
            specs.push(format!(
                "${}:{}{}",
                argument.name, argument.type_name, suffix
            ));
            mappings.push(format!("{}: ${}", argument.name, argument.name));
        }

        match (specs.is_empty(), self.selection.is_empty()) {
            (true, true) => format!("{}{{{}}}", keyword, self.name),
            (true, false) => format!("{}{{{}{{{}}}}}", keyword, self.name, self.selection),
            (false, true) => format!(
                "{}({}){{{}({})}}",
                keyword,
                specs.join(","),
                self.name,
                mappings.join(", ")
            ),
            (false, false) => format!(
                "{}({}){{{}({}){{{}}}}}",
                keyword,
                specs.join(","),
                self.name,
                mappings.join(", "),
                self.selection
            ),
        }
    }

    /// The variable bindings for the rendered document.
    #[must_use]
    pub fn variables(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for argument in &self.arguments {
            map.insert(argument.name.to_string(), argument.value.clone());
        }
        map
    }
}
