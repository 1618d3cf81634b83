use super::{column_label, join_alias, LoadSeparately};

use rowgraph_core::{
    criteria::Loads,
    schema::{Column, Schema, Table},
};
use rowgraph_sql::stmt::{ColumnRef, Select, SelectItem};

use indexmap::IndexMap;

/// Selects every column of `table` and of each join-loaded relationship,
/// labelled with its alias. Labels already selected are skipped.
pub(super) fn add_columns(
    schema: &Schema,
    select: &mut Select,
    table: &Table,
    alias: &str,
    loads: &Loads<'_>,
) {
    for column in &table.columns {
        let label = column_label(alias, &column.name);

        let exists = select.columns.iter().any(|item| match item {
            SelectItem::Column { label: Some(l), .. } => *l == label,
            _ => false,
        });

        if !exists {
            select.columns.push(SelectItem::Column {
                column: column_ref(alias, column),
                label: Some(label),
            });
        }
    }

    for (name, nested) in &loads.joined {
        // Loads only name relationships the criteria parser resolved on
        // this table.
        let Some(rel) = table.find_relationship(name) else {
            continue;
        };

        let other = schema.other_table(rel);
        add_columns(schema, select, other, &join_alias(alias, name), nested);
    }
}

pub(super) fn column_ref(alias: &str, column: &Column) -> ColumnRef {
    ColumnRef {
        table: Some(alias.to_string()),
        column: column.name.clone(),
    }
}

/// Flattens separately-loaded relationships into dotted paths.
pub(super) fn collect_load_separately(
    loads: &Loads<'_>,
    path: &mut Vec<String>,
    out: &mut IndexMap<String, LoadSeparately>,
) {
    for (name, criteria) in &loads.separate {
        path.push(name.to_string());

        out.insert(
            dotted(path),
            LoadSeparately {
                path: path.clone(),
                criteria: (*criteria).clone(),
            },
        );

        path.pop();
    }

    for (name, nested) in &loads.joined {
        path.push(name.to_string());
        collect_load_separately(nested, path, out);
        path.pop();
    }
}

fn dotted(path: &[String]) -> String {
    path.iter().map(|name| format!(".{name}")).collect()
}
