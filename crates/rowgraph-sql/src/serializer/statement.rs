use super::{Comma, Ident, Params, ToSql};

use crate::stmt::{self, Direction};

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Statement::Select(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "SELECT ", Comma(&self.columns), " FROM ", &self.from);

        for join in &self.joins {
            fmt!(f, " LEFT JOIN ", &join.table, " ON ", &join.on);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(&self.order_by));
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                fmt!(f, " LIMIT ", limit);
                if let Some(offset) = offset {
                    fmt!(f, " OFFSET ", offset);
                }
            }
            (None, Some(offset)) => {
                // Only PostgreSQL accepts OFFSET without LIMIT.
                if f.serializer.is_sqlite() {
                    fmt!(f, " LIMIT -1");
                } else if f.serializer.is_mysql() {
                    fmt!(f, " LIMIT ", u64::MAX);
                }
                fmt!(f, " OFFSET ", offset);
            }
            (None, None) => {}
        }
    }
}

impl ToSql for &stmt::SelectItem {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::SelectItem::Column { column, label } => {
                fmt!(f, column);
                if let Some(label) = label {
                    fmt!(f, " AS ", Ident(label));
                }
            }
            stmt::SelectItem::Count { distinct, label } => {
                match distinct {
                    Some(column) => fmt!(f, "COUNT(DISTINCT ", column, ")"),
                    None => fmt!(f, "COUNT(*)"),
                }
                fmt!(f, " AS ", Ident(label));
            }
        }
    }
}

impl ToSql for &stmt::TableRef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, Ident(&self.name));

        match &self.alias {
            Some(alias) if *alias != self.name => fmt!(f, " AS ", Ident(alias)),
            _ => {}
        }
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, &self.expr, direction);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "INSERT INTO ", Ident(&self.table));

        if self.columns.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, " () VALUES ()");
            } else {
                fmt!(f, " DEFAULT VALUES");
            }
        } else {
            let columns = Comma(self.columns.iter().map(Ident));
            fmt!(f, " (", columns, ") VALUES (", Comma(&self.values), ")");
        }

        if let Some(returning) = &self.returning {
            fmt!(f, " RETURNING ", Ident(returning));
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let assignments = Comma(self.assignments.iter().map(Assignment));
        fmt!(f, "UPDATE ", Ident(&self.table), " SET ", assignments, " WHERE ", &self.filter);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "DELETE FROM ", Ident(&self.table), " WHERE ", &self.filter);
    }
}

struct Assignment<'a>(&'a (String, rowgraph_core::stmt::Value));

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let (column, value) = self.0;
        fmt!(f, Ident(column), " = ", value);
    }
}
