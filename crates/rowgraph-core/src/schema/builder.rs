use super::{
    Column, ColumnId, Mapper, Relationship, RelationshipId, RelationshipKind, Schema,
    StructuralMapper, Table, TableId,
};
use crate::{Error, Result};

use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use std::sync::Arc;

/// Declares tables, columns and relationships.
///
/// ```
/// # use rowgraph_core::Schema;
/// let schema = Schema::builder()
///     .table("table1", |t| {
///         t.column("id").primary_key().generated();
///         t.column("column1");
///         t.column("many_to_one_object1_id");
///         t.many_to_one("manyToOneObject1", "many_to_one_object1_id", "table1", "id");
///     })
///     .build()
///     .unwrap();
///
/// let table = schema.table("table1").unwrap();
/// assert_eq!(table.column("many_to_one_object1_id").unwrap().property, "manyToOneObject1Id");
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<TableBuilder>,
}

#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnBuilder>,
    relationships: Vec<RelationshipBuilder>,
    mapper: Option<Arc<dyn Mapper>>,
}

#[derive(Debug)]
pub struct ColumnBuilder {
    name: String,
    property: Option<String>,
    primary_key: bool,
    generated: bool,
}

#[derive(Debug)]
pub struct RelationshipBuilder {
    name: String,
    kind: RelationshipKind,
    this_id: String,
    other_table: String,
    other_id: String,
    other_relationship: Option<String>,
}

/// Used to track state during the build process
struct BuildSchema {
    /// Maps table names to identifiers. The identifiers are reserved before
    /// the tables are built so relationships can point forward.
    table_lookup: IndexMap<String, TableId>,

    /// Tables as they are built
    tables: Vec<Table>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table; `f` declares its columns and relationships.
    pub fn table(mut self, name: impl Into<String>, f: impl FnOnce(&mut TableBuilder)) -> Self {
        let mut table = TableBuilder {
            name: name.into(),
            columns: vec![],
            relationships: vec![],
            mapper: None,
        };
        f(&mut table);
        self.tables.push(table);
        self
    }

    /// Resolves every declaration and checks the result.
    ///
    /// Any unresolved name or inconsistent declaration is an
    /// [`invalid schema`](Error::invalid_schema) error.
    pub fn build(self) -> Result<Schema> {
        let mut build = BuildSchema {
            table_lookup: IndexMap::new(),
            tables: vec![],
        };

        for (index, table) in self.tables.iter().enumerate() {
            if build
                .table_lookup
                .insert(table.name.clone(), TableId(index))
                .is_some()
            {
                return Err(Error::invalid_schema(format!(
                    "table `{}` declared more than once",
                    table.name
                )));
            }
        }

        for (index, table) in self.tables.iter().enumerate() {
            let table = build.build_table(TableId(index), table)?;
            build.tables.push(table);
        }

        for (index, table) in self.tables.iter().enumerate() {
            build.build_relationships(TableId(index), table)?;
        }

        for (index, table) in self.tables.iter().enumerate() {
            build.link_other_relationships(TableId(index), table)?;
        }

        let schema = Schema {
            tables: build.tables,
            lookup: build.table_lookup,
        };

        schema.verify()?;
        Ok(schema)
    }
}

impl TableBuilder {
    /// Declares a column. The property name defaults to the lowerCamelCase
    /// form of the column name.
    pub fn column(&mut self, name: impl Into<String>) -> &mut ColumnBuilder {
        self.columns.push(ColumnBuilder {
            name: name.into(),
            property: None,
            primary_key: false,
            generated: false,
        });
        self.columns.last_mut().expect("column just pushed")
    }

    /// Declares a relationship where this table holds the foreign key.
    pub fn many_to_one(
        &mut self,
        name: impl Into<String>,
        this_id: impl Into<String>,
        other_table: impl Into<String>,
        other_id: impl Into<String>,
    ) -> &mut RelationshipBuilder {
        self.relationship(RelationshipKind::ManyToOne, name, this_id, other_table, other_id)
    }

    /// Declares a relationship where the other table holds the foreign key.
    pub fn one_to_many(
        &mut self,
        name: impl Into<String>,
        this_id: impl Into<String>,
        other_table: impl Into<String>,
        other_id: impl Into<String>,
    ) -> &mut RelationshipBuilder {
        self.relationship(RelationshipKind::OneToMany, name, this_id, other_table, other_id)
    }

    /// Installs a custom row/instance conversion for this table.
    pub fn mapper(&mut self, mapper: impl Mapper + 'static) -> &mut Self {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    fn relationship(
        &mut self,
        kind: RelationshipKind,
        name: impl Into<String>,
        this_id: impl Into<String>,
        other_table: impl Into<String>,
        other_id: impl Into<String>,
    ) -> &mut RelationshipBuilder {
        self.relationships.push(RelationshipBuilder {
            name: name.into(),
            kind,
            this_id: this_id.into(),
            other_table: other_table.into(),
            other_id: other_id.into(),
            other_relationship: None,
        });
        self.relationships.last_mut().expect("relationship just pushed")
    }
}

impl ColumnBuilder {
    pub fn primary_key(&mut self) -> &mut Self {
        self.primary_key = true;
        self
    }

    /// The database assigns this key column on insert.
    pub fn generated(&mut self) -> &mut Self {
        self.generated = true;
        self
    }

    pub fn property(&mut self, property: impl Into<String>) -> &mut Self {
        self.property = Some(property.into());
        self
    }
}

impl RelationshipBuilder {
    /// Pairs this many-to-one relationship with a many-to-one relationship on
    /// the other table that points back, forming a one-to-one link.
    pub fn other_relationship(&mut self, name: impl Into<String>) -> &mut Self {
        self.other_relationship = Some(name.into());
        self
    }
}

impl BuildSchema {
    fn build_table(&self, id: TableId, decl: &TableBuilder) -> Result<Table> {
        let mut columns: Vec<Column> = vec![];

        for (index, column) in decl.columns.iter().enumerate() {
            if columns.iter().any(|existing| existing.name == column.name) {
                return Err(Error::invalid_schema(format!(
                    "column `{}` declared more than once on table `{}`",
                    column.name, decl.name
                )));
            }

            columns.push(Column {
                id: ColumnId { table: id, index },
                name: column.name.clone(),
                property: column
                    .property
                    .clone()
                    .unwrap_or_else(|| column.name.to_lower_camel_case()),
                primary_key: column.primary_key,
                generated: column.generated,
            });
        }

        let primary_key = columns
            .iter()
            .filter(|column| column.primary_key)
            .map(|column| column.id)
            .collect();

        Ok(Table {
            id,
            name: decl.name.clone(),
            columns,
            relationships: vec![],
            primary_key,
            mapper: decl
                .mapper
                .clone()
                .unwrap_or_else(|| Arc::new(StructuralMapper)),
        })
    }

    fn build_relationships(&mut self, id: TableId, decl: &TableBuilder) -> Result<()> {
        let mut relationships: Vec<Relationship> = vec![];

        for (index, rel) in decl.relationships.iter().enumerate() {
            if relationships.iter().any(|existing| existing.name == rel.name) {
                return Err(Error::invalid_schema(format!(
                    "relationship `{}` declared more than once on table `{}`",
                    rel.name, decl.name
                )));
            }

            let other_table = *self.table_lookup.get(&rel.other_table).ok_or_else(|| {
                Error::invalid_schema(format!(
                    "relationship `{}.{}` refers to unknown table `{}`",
                    decl.name, rel.name, rel.other_table
                ))
            })?;

            let this_id = self.resolve_column(id, &rel.this_id, &decl.name, &rel.name)?;
            let other_id =
                self.resolve_column(other_table, &rel.other_id, &decl.name, &rel.name)?;

            relationships.push(Relationship {
                id: RelationshipId { table: id, index },
                name: rel.name.clone(),
                kind: rel.kind,
                this_id,
                other_table,
                other_id,
                other_relationship: None,
            });
        }

        self.tables[id.0].relationships = relationships;
        Ok(())
    }

    fn link_other_relationships(&mut self, id: TableId, decl: &TableBuilder) -> Result<()> {
        for (index, rel) in decl.relationships.iter().enumerate() {
            let Some(other_name) = &rel.other_relationship else {
                continue;
            };

            let other_table = self.tables[id.0].relationships[index].other_table;
            let other = self.tables[other_table.0]
                .relationships
                .iter()
                .find(|other| &other.name == other_name)
                .map(|other| other.id)
                .ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "relationship `{}.{}` pairs with unknown relationship `{}.{}`",
                        decl.name, rel.name, self.tables[other_table.0].name, other_name
                    ))
                })?;

            self.tables[id.0].relationships[index].other_relationship = Some(other);
        }

        Ok(())
    }

    fn resolve_column(
        &self,
        table: TableId,
        name: &str,
        owner: &str,
        relationship: &str,
    ) -> Result<ColumnId> {
        let table = &self.tables[table.0];
        table
            .columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.id)
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "relationship `{owner}.{relationship}` refers to unknown column `{}.{name}`",
                    table.name
                ))
            })
    }
}
