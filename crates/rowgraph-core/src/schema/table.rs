use super::{Column, ColumnId, Mapper, Relationship};
use crate::{stmt::Record, Error, Result};

use std::{fmt, sync::Arc};

/// A database table
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns, in declaration order
    pub columns: Vec<Column>,

    /// Relationships owned by this table, in declaration order
    pub relationships: Vec<Relationship>,

    /// Columns flagged `primary_key`, in declaration order
    pub primary_key: Vec<ColumnId>,

    pub(super) mapper: Arc<dyn Mapper>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct TableId(pub usize);

impl Table {
    /// Looks up a column by its database name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| Error::unknown_column(&self.name, name))
    }

    /// Looks up a column by its instance property name.
    pub fn column_by_property(&self, property: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.property == property)
            .ok_or_else(|| Error::unknown_column(&self.name, property))
    }

    /// Resolves a criteria key: the database name first, then the property.
    pub fn find_column(&self, key: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.name == key)
            .or_else(|| self.columns.iter().find(|column| column.property == key))
    }

    pub fn column_by_id(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn relationship(&self, name: &str) -> Result<&Relationship> {
        self.find_relationship(name)
            .ok_or_else(|| Error::unknown_relationship(&self.name, name))
    }

    pub fn find_relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.primary_key
            .iter()
            .map(|column_id| &self.columns[column_id.index])
    }

    /// Key columns assigned by the database.
    pub fn generated_primary_key(&self) -> impl Iterator<Item = &Column> + '_ {
        self.primary_key_columns().filter(|column| column.generated)
    }

    /// Key columns assigned by the caller.
    pub fn not_generated_primary_key(&self) -> impl Iterator<Item = &Column> + '_ {
        self.primary_key_columns().filter(|column| !column.generated)
    }

    /// Converts a row into an instance using the table's mapper.
    pub fn row_to_instance(&self, row: &Record) -> Record {
        self.mapper.row_to_instance(self, row)
    }

    /// Converts an instance into a row using the table's mapper.
    pub fn instance_to_row(&self, instance: &Record) -> Record {
        self.mapper.instance_to_row(self, instance)
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}
