//! Compiles criteria into a `SELECT` with joins, ordering and pagination.
//!
//! Aliases are derived from relationship names: the root table is aliased by
//! its own name, a joined relationship by `<parent alias>__<relationship>`,
//! and every selected column is labelled `<alias>__<column>`. A name longer
//! than [`MAX_IDENT_LEN`] keeps its head and ends in a hash of the full name.
//! The materializer inverts the same scheme.

mod connective;
use connective::Terms;

mod filter;

mod columns;

use rowgraph_core::{
    criteria::{Criteria, CriteriaObject, GroupEntry},
    schema::{Relationship, Schema, Table},
    Result,
};
use rowgraph_sql::stmt::{Expr, Join, OrderByExpr, Select, SelectItem, TableRef};

use indexmap::IndexMap;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Longest alias or label kept intact. PostgreSQL truncates identifiers
/// beyond 63 bytes.
pub const MAX_IDENT_LEN: usize = 63;

/// A compiled query plus the relationships it leaves to follow-up queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub select: Select,

    /// Separately-loaded relationships keyed by dotted path, e.g.
    /// `.manyToManyObject2` or `.manyToOneObject1.oneToManyObject1`.
    pub load_separately: IndexMap<String, LoadSeparately>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSeparately {
    /// Relationship names from the root table.
    pub path: Vec<String>,

    /// Criteria for the related rows.
    pub criteria: CriteriaObject,
}

struct Compile<'a> {
    schema: &'a Schema,
    select: &'a mut Select,
}

/// Compiles `criteria` against `table`.
pub fn compile(schema: &Schema, table: &Table, criteria: &Criteria) -> Result<Compiled> {
    let mut select = Select::from(&table.name, &table.name);
    let load_separately = compile_into(&mut select, schema, table, criteria)?;
    Ok(Compiled {
        select,
        load_separately,
    })
}

/// Compiles `criteria` into an existing select whose `FROM` is `table`.
///
/// The filter is ANDed onto any existing one. A limit or offset already set
/// on `select` is kept.
pub fn compile_into(
    select: &mut Select,
    schema: &Schema,
    table: &Table,
    criteria: &Criteria,
) -> Result<IndexMap<String, LoadSeparately>> {
    let alias = root_alias(select);

    let mut compile = Compile {
        schema,
        select: &mut *select,
    };
    if let Some(filter) = compile.criteria(table, &alias, criteria)? {
        select.and_filter(filter);
    }

    let loads = criteria.loads();
    columns::add_columns(schema, select, table, &alias, &loads);

    let mut load_separately = IndexMap::new();
    columns::collect_load_separately(&loads, &mut vec![], &mut load_separately);
    Ok(load_separately)
}

/// Compiles a query counting the root rows matched by `criteria`.
///
/// Counts distinct key values when the key is a single column, so that
/// one-to-many joins used for filtering do not inflate the count.
pub fn count(schema: &Schema, table: &Table, criteria: &Criteria) -> Result<Select> {
    let mut select = Select::from(&table.name, &table.name);

    let mut compile = Compile {
        schema,
        select: &mut select,
    };
    if let Some(filter) = compile.criteria(table, &table.name, criteria)? {
        select.and_filter(filter);
    }

    let distinct = match table.primary_key.as_slice() {
        [column] => Some(columns::column_ref(&table.name, table.column_by_id(*column))),
        _ => None,
    };

    select.columns = vec![SelectItem::Count {
        distinct,
        label: "count".to_string(),
    }];
    select.order_by.clear();
    select.limit = None;
    select.offset = None;
    Ok(select)
}

pub(crate) fn join_alias(parent: &str, relationship: &str) -> String {
    fit(format!("{parent}__{relationship}"))
}

pub(crate) fn column_label(alias: &str, column: &str) -> String {
    fit(format!("{alias}__{column}"))
}

fn fit(name: String) -> String {
    if name.len() <= MAX_IDENT_LEN {
        return name;
    }

    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    let suffix = format!("_{:016x}", hasher.finish());

    let mut end = MAX_IDENT_LEN - suffix.len();
    while !name.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{suffix}", &name[..end])
}

fn root_alias(select: &Select) -> String {
    select
        .from
        .alias
        .clone()
        .unwrap_or_else(|| select.from.name.clone())
}

impl Compile<'_> {
    fn criteria(&mut self, table: &Table, alias: &str, criteria: &Criteria) -> Result<Option<Expr>> {
        match criteria {
            Criteria::Object(object) => self.object(table, alias, object),
            Criteria::Group(group) => {
                let mut terms = Terms::default();

                for entry in &group.entries {
                    match entry {
                        GroupEntry::Connective(connective) => terms.connective(*connective),
                        GroupEntry::Criteria(criteria) => {
                            if let Some(expr) = self.criteria(table, alias, criteria)? {
                                terms.push(expr);
                            }
                        }
                        GroupEntry::Invalid(_) => {}
                    }
                }

                Ok(terms.finish())
            }
        }
    }

    fn object(&mut self, table: &Table, alias: &str, object: &CriteriaObject) -> Result<Option<Expr>> {
        let directives = &object.directives;

        // Outer directives are applied before nested ones so the first
        // limit and offset seen win.
        for order_by in &directives.order_by {
            self.select.order_by.push(OrderByExpr {
                expr: Expr::column(alias, &order_by.field),
                direction: order_by.direction,
            });
        }

        if self.select.limit.is_none() {
            self.select.limit = directives.limit;
        }

        if self.select.offset.is_none() {
            self.select.offset = directives.offset;
        }

        let columns = object
            .columns
            .iter()
            .filter_map(|(column, filter)| filter::column_filter(alias, column, filter))
            .collect();

        let mut operands = vec![];

        if let Some(columns) = Expr::and_from_vec(columns) {
            operands.push(if directives.not {
                Expr::not(columns)
            } else {
                columns
            });
        }

        for (name, criteria) in &object.relationships {
            if criteria.is_load_separately() {
                continue;
            }

            let rel = table.relationship(name)?;
            let other = self.schema.other_table(rel);
            let alias = self.join(table, alias, rel, other);

            if let Some(expr) = self.criteria(other, &alias, criteria)? {
                operands.push(expr);
            }
        }

        Ok(Expr::and_from_vec(operands))
    }

    /// Adds a `LEFT JOIN` for the relationship unless its alias is already
    /// joined, and returns the alias.
    fn join(&mut self, table: &Table, parent: &str, rel: &Relationship, other: &Table) -> String {
        let alias = join_alias(parent, &rel.name);

        if !self.select.has_join(&alias) {
            let this_id = &table.column_by_id(rel.this_id).name;
            let other_id = &other.column_by_id(rel.other_id).name;

            self.select.joins.push(Join {
                table: TableRef {
                    name: other.name.clone(),
                    alias: Some(alias.clone()),
                },
                on: Expr::eq(Expr::column(parent, this_id), Expr::column(&alias, other_id)),
            });
        }

        alias
    }
}
