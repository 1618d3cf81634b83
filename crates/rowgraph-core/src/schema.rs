mod builder;
pub use builder::{Builder, ColumnBuilder, RelationshipBuilder, TableBuilder};

mod column;
pub use column::{Column, ColumnId};

mod convert;
pub use convert::Converted;

pub mod mapper;
pub use mapper::{Mapper, StructuralMapper};

mod relationship;
pub use relationship::{Relationship, RelationshipId, RelationshipKind};

mod table;
pub use table::{Table, TableId};

mod verify;

use crate::{Error, Result};

use indexmap::IndexMap;

/// The registry of tables, columns and relationships.
///
/// Built once with [`Schema::builder`] and read-only afterwards.
#[derive(Debug)]
pub struct Schema {
    pub tables: Vec<Table>,

    lookup: IndexMap<String, TableId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.lookup
            .get(name)
            .map(|id| self.table_by_id(*id))
            .ok_or_else(|| Error::unknown_table(name))
    }

    pub fn table_by_id(&self, id: impl Into<TableId>) -> &Table {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        self.table_by_id(id.table)
            .columns
            .get(id.index)
            .expect("invalid column ID")
    }

    pub fn relationship(&self, id: impl Into<RelationshipId>) -> &Relationship {
        let id = id.into();
        self.table_by_id(id.table)
            .relationships
            .get(id.index)
            .expect("invalid relationship ID")
    }

    /// The table on the far side of a relationship.
    pub fn other_table(&self, relationship: &Relationship) -> &Table {
        self.table_by_id(relationship.other_table)
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.iter()
    }
}
