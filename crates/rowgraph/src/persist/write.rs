use super::Persist;

use rowgraph_core::{
    graph::{Graph, ObjectId},
    schema::{Column, Table},
    stmt::{Record, Value},
    Error, Result,
};
use rowgraph_sql::stmt::{Expr, Insert, Select, SelectItem, Update};

impl Persist<'_> {
    /// Decides whether `row` already exists.
    ///
    /// A generated key decides by itself: set means update, unset means
    /// insert. A caller-assigned key is looked up in the database.
    pub(super) async fn is_update(&mut self, table: &Table, row: &Record) -> Result<bool> {
        let generated: Vec<&Column> = table.generated_primary_key().collect();
        let set = generated
            .iter()
            .filter(|column| !value(row, column).is_null())
            .count();

        if set == generated.len() && set > 0 {
            return Ok(true);
        }

        if set > 0 {
            return Err(Error::inconsistent_primary_key(
                &table.name,
                "generated key columns are partially set",
            ));
        }

        if !generated.is_empty() {
            if table.not_generated_primary_key().next().is_none() {
                return Ok(false);
            }

            return Err(Error::inconsistent_primary_key(
                &table.name,
                "generated key columns are unset on a composite key",
            ));
        }

        self.exists(table, row).await
    }

    async fn exists(&mut self, table: &Table, row: &Record) -> Result<bool> {
        let mut select = Select::from(&table.name, &table.name);
        select.columns.push(SelectItem::Count {
            distinct: None,
            label: "count".to_string(),
        });
        select.filter = Some(key_filter(table, row)?);

        let rows = self.exec.query(select).await?;
        let count = rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Error::invalid_result(format!("existence check on `{}` returned no count", table.name))
            })?;

        Ok(count > 0)
    }

    /// Inserts the columns present on the row and writes a generated key
    /// back into the graph.
    pub(super) async fn insert(&mut self, table: &Table, graph: &mut Graph, id: ObjectId) -> Result<()> {
        let row = &graph[id].values;

        let generated = table
            .generated_primary_key()
            .find(|column| value(row, column).is_null());

        let mut insert = Insert {
            table: table.name.clone(),
            columns: vec![],
            values: vec![],
            returning: None,
        };

        for column in &table.columns {
            let Some(value) = row.get(&column.name) else {
                continue;
            };

            if column.generated && value.is_null() {
                continue;
            }

            insert.columns.push(column.name.clone());
            insert.values.push(value.clone());
        }

        if self.exec.capability().returning_generated_key {
            insert.returning = generated.map(|column| column.name.clone());
        }

        let returning = insert.returning.clone();
        let mutation = self
            .exec
            .run(insert)
            .await?
            .into_mutation(returning.as_deref())?;

        if mutation.affected_rows != 1 {
            return Err(Error::invalid_record_count(format!(
                "INSERT INTO `{}` affected {} rows, expected 1",
                table.name, mutation.affected_rows
            )));
        }

        if let Some(column) = generated {
            let key = mutation.insert_id.ok_or_else(|| {
                Error::invalid_result(format!(
                    "no generated `{}` returned by INSERT INTO `{}`",
                    column.name, table.name
                ))
            })?;
            graph[id].set(column.name.as_str(), key);
        }

        Ok(())
    }

    /// Updates the non-key columns present on the row. Issues nothing when
    /// there are none.
    pub(super) async fn update(&mut self, table: &Table, graph: &Graph, id: ObjectId) -> Result<()> {
        let row = &graph[id].values;

        let assignments: Vec<_> = table
            .columns
            .iter()
            .filter(|column| !column.primary_key)
            .filter_map(|column| {
                row.get(&column.name)
                    .map(|value| (column.name.clone(), value.clone()))
            })
            .collect();

        if assignments.is_empty() {
            return Ok(());
        }

        let update = Update {
            table: table.name.clone(),
            assignments,
            filter: key_filter(table, row)?,
        };

        self.run_update(table, update).await
    }

    /// Sets a single column on an already written object.
    pub(super) async fn patch(
        &mut self,
        table: &Table,
        graph: &mut Graph,
        id: ObjectId,
        column: &str,
        value: Value,
    ) -> Result<()> {
        if *graph[id].value(column) == value {
            return Ok(());
        }

        graph[id].set(column, value.clone());

        let update = Update {
            table: table.name.clone(),
            assignments: vec![(column.to_string(), value)],
            filter: key_filter(table, &graph[id].values)?,
        };

        self.run_update(table, update).await
    }

    async fn run_update(&mut self, table: &Table, update: Update) -> Result<()> {
        let mutation = self.exec.run(update).await?.into_mutation(None)?;

        if mutation.affected_rows != 1 {
            return Err(Error::invalid_record_count(format!(
                "UPDATE `{}` affected {} rows, expected 1",
                table.name, mutation.affected_rows
            )));
        }

        Ok(())
    }
}

/// The primary key values of `row`.
pub(super) fn key(table: &Table, row: &Record) -> Record {
    table
        .primary_key_columns()
        .map(|column| (column.name.clone(), value(row, column).clone()))
        .collect()
}

/// `pk1 = v1 AND pk2 = v2 ...`. Every key column must be set.
pub(super) fn key_filter(table: &Table, row: &Record) -> Result<Expr> {
    let mut operands = vec![];

    for column in table.primary_key_columns() {
        let value = value(row, column);

        if value.is_null() {
            return Err(Error::inconsistent_primary_key(
                &table.name,
                format!("key column `{}` is not set", column.name),
            ));
        }

        operands.push(Expr::eq(
            Expr::bare_column(&column.name),
            Expr::value(value.clone()),
        ));
    }

    Expr::and_from_vec(operands).ok_or_else(|| {
        Error::invariant_violation(format!("table `{}` has no primary key", table.name))
    })
}

fn value<'a>(row: &'a Record, column: &Column) -> &'a Value {
    static NULL: Value = Value::Null;
    row.get(&column.name).unwrap_or(&NULL)
}
