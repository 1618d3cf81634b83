use super::{ColumnId, Schema, TableId};

use std::fmt;

/// A foreign-key link from one table to another.
///
/// Many-to-many links are modelled through an association table holding two
/// many-to-one relationships, reached as a one-to-many from either side.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: RelationshipId,

    /// Name used as the criteria key and the instance property.
    pub name: String,

    pub kind: RelationshipKind,

    /// Column on the owning table.
    pub this_id: ColumnId,

    pub other_table: TableId,

    /// Column on the other table that `this_id` is matched against.
    pub other_id: ColumnId,

    /// Set on a many-to-one relationship paired with a many-to-one on the
    /// other table that points back; the pair forms a one-to-one link.
    pub other_relationship: Option<RelationshipId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// This table holds the foreign key.
    ManyToOne,

    /// The other table holds the foreign key.
    OneToMany,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct RelationshipId {
    pub table: TableId,
    pub index: usize,
}

impl Relationship {
    pub fn is_many_to_one(&self) -> bool {
        self.kind == RelationshipKind::ManyToOne
    }

    pub fn is_one_to_many(&self) -> bool {
        self.kind == RelationshipKind::OneToMany
    }

    pub fn is_one_to_one(&self) -> bool {
        self.is_many_to_one() && self.other_relationship.is_some()
    }

    /// The paired relationship of a one-to-one link.
    pub fn other_relationship<'a>(&self, schema: &'a Schema) -> Option<&'a Relationship> {
        self.other_relationship.map(|id| schema.relationship(id))
    }
}

impl From<&Relationship> for RelationshipId {
    fn from(value: &Relationship) -> Self {
        value.id
    }
}

impl fmt::Debug for RelationshipId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RelationshipId({}/{})", self.table.0, self.index)
    }
}
