use super::{Relationship, Schema, Table};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    /// Checks the resolved schema. Run once by the builder.
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for table in &self.schema.tables {
            self.verify_table_has_primary_key(table)?;
            self.verify_generated_columns_are_keys(table)?;
            self.verify_names_do_not_collide(table)?;

            for rel in &table.relationships {
                self.verify_relationship_pair(table, rel)?;
            }
        }

        Ok(())
    }

    fn verify_table_has_primary_key(&self, table: &Table) -> Result<()> {
        if table.primary_key.is_empty() {
            return Err(Error::invalid_schema(format!(
                "table `{}` has no primary key",
                table.name
            )));
        }
        Ok(())
    }

    fn verify_generated_columns_are_keys(&self, table: &Table) -> Result<()> {
        for column in &table.columns {
            if column.generated && !column.primary_key {
                return Err(Error::invalid_schema(format!(
                    "column `{}.{}` is generated but not part of the primary key",
                    table.name, column.name
                )));
            }
        }
        Ok(())
    }

    /// A relationship name doubles as a criteria key, so it must not shadow
    /// a column.
    fn verify_names_do_not_collide(&self, table: &Table) -> Result<()> {
        for rel in &table.relationships {
            if table.find_column(&rel.name).is_some() {
                return Err(Error::invalid_schema(format!(
                    "relationship `{}.{}` has the same name as a column",
                    table.name, rel.name
                )));
            }
        }
        Ok(())
    }

    fn verify_relationship_pair(&self, table: &Table, rel: &Relationship) -> Result<()> {
        let Some(other_id) = rel.other_relationship else {
            return Ok(());
        };

        let other = self.schema.relationship(other_id);

        if !rel.is_many_to_one() || !other.is_many_to_one() {
            return Err(Error::invalid_schema(format!(
                "one-to-one relationship `{}.{}` must pair two many-to-one relationships",
                table.name, rel.name
            )));
        }

        if other.other_relationship != Some(rel.id) || other.other_table != table.id {
            return Err(Error::invalid_schema(format!(
                "relationship `{}.{}` pairs with `{}.{}`, which does not pair back",
                table.name,
                rel.name,
                self.schema.table_by_id(rel.other_table).name,
                other.name
            )));
        }

        Ok(())
    }
}
