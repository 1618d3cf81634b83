//! Conversion between database rows and application instances.
//!
//! Rows are keyed by column name, instances by property name. The default
//! conversion copies every declared column across; a table may install its own
//! [`Mapper`] to adjust the result, typically by calling the structural
//! functions in this module first.

use super::Table;
use crate::stmt::Record;

use std::fmt::Debug;

/// Per-table row/instance conversion strategy.
pub trait Mapper: Debug + Send + Sync {
    fn row_to_instance(&self, table: &Table, row: &Record) -> Record {
        row_to_instance(table, row)
    }

    fn instance_to_row(&self, table: &Table, instance: &Record) -> Record {
        instance_to_row(table, instance)
    }
}

/// Copies columns to properties and back, nothing more.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralMapper;

impl Mapper for StructuralMapper {}

/// Copies every column present on `row` to its property.
pub fn row_to_instance(table: &Table, row: &Record) -> Record {
    table
        .columns
        .iter()
        .filter_map(|column| {
            let value = row.get(&column.name)?;
            Some((column.property.clone(), value.clone()))
        })
        .collect()
}

/// Copies every property present on `instance` to its column.
pub fn instance_to_row(table: &Table, instance: &Record) -> Record {
    table
        .columns
        .iter()
        .filter_map(|column| {
            let value = instance.get(&column.property)?;
            Some((column.name.clone(), value.clone()))
        })
        .collect()
}
