//! The criteria language: nested filters, sorting, pagination and load
//! directives over a table and its relationships.
//!
//! Criteria arrive as JSON. [`Criteria::parse`] resolves every key against the
//! schema and never fails: keys it cannot place are kept on the object so that
//! [`Criteria::validate`] can report them, while the compiler ignores them.

mod directive;
pub use directive::{Aggregate, AggregateIntent, Direction, Directives, Malformed, OrderBy};

mod filter;
pub use filter::{ColumnFilter, Comparison, FilterEntry, Operand, Operator};

mod loads;
pub use loads::Loads;

mod parse;

mod validate;
pub use validate::{validate_criteria, Issue};

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// Criteria interleaved with connectives, e.g. `[a, "AND", b]`.
    Group(Group),

    /// Column filters, relationship criteria and directives.
    Object(CriteriaObject),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Group {
    pub entries: Vec<GroupEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupEntry {
    /// Switches the connective for the terms that follow.
    Connective(Connective),

    Criteria(Criteria),

    /// An element that is neither criteria nor a connective.
    Invalid(serde_json::Value),
}

/// Joins the terms of a group. Defaults to `OR`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    #[default]
    Or,
    Xor,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CriteriaObject {
    /// Filters keyed by column name.
    pub columns: IndexMap<String, ColumnFilter>,

    /// Nested criteria keyed by relationship name.
    pub relationships: IndexMap<String, Criteria>,

    pub directives: Directives,

    /// Keys that are neither a column, a relationship nor a directive.
    pub unknown: Vec<String>,

    /// Directives whose value could not be used.
    pub malformed: Vec<Malformed>,
}

impl Criteria {
    pub fn as_object(&self) -> Option<&CriteriaObject> {
        match self {
            Criteria::Object(object) => Some(object),
            Criteria::Group(_) => None,
        }
    }

    /// True if the criteria asks for the relationship to be fetched with an
    /// additional query instead of a join.
    pub fn is_load_separately(&self) -> bool {
        self.as_object()
            .is_some_and(|object| object.directives.load_separately)
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::Object(CriteriaObject::default())
    }
}

impl From<CriteriaObject> for Criteria {
    fn from(value: CriteriaObject) -> Self {
        Criteria::Object(value)
    }
}

impl Connective {
    pub fn from_token(token: &str) -> Option<Connective> {
        match token {
            "AND" => Some(Connective::And),
            "OR" => Some(Connective::Or),
            "XOR" => Some(Connective::Xor),
            _ => None,
        }
    }
}
