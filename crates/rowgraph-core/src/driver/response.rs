use crate::{
    stmt::{Record, Value},
    Error, Result,
};

/// What a connection returns for a single statement.
///
/// Drivers report writes in one of two shapes; [`Response::into_mutation`]
/// normalizes both into a [`Mutation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Rows produced by a SELECT.
    Rows(Vec<Record>),

    /// Rows plus a row count. Generated keys are only reported through the
    /// rows of a `RETURNING` clause.
    RowCount { rows: Vec<Record>, row_count: u64 },

    /// Number of affected rows plus the generated key of the last insert.
    AffectedRows {
        affected_rows: u64,
        insert_id: Option<Value>,
    },
}

/// A normalized write result.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub affected_rows: u64,
    pub insert_id: Option<Value>,
}

impl Response {
    pub fn rows(rows: Vec<Record>) -> Response {
        Response::Rows(rows)
    }

    pub fn affected_rows(affected_rows: u64) -> Response {
        Response::AffectedRows {
            affected_rows,
            insert_id: None,
        }
    }

    /// Returns the rows of a SELECT.
    pub fn into_rows(self) -> Result<Vec<Record>> {
        match self {
            Response::Rows(rows) | Response::RowCount { rows, .. } => Ok(rows),
            Response::AffectedRows { .. } => Err(Error::invalid_result(
                "expected rows, got an affected row count",
            )),
        }
    }

    /// Normalizes a write result.
    ///
    /// `returning` names the generated column requested with `RETURNING`; its
    /// value in the first returned row becomes the insert id.
    pub fn into_mutation(self, returning: Option<&str>) -> Result<Mutation> {
        match self {
            Response::AffectedRows {
                affected_rows,
                insert_id,
            } => Ok(Mutation {
                affected_rows,
                insert_id: insert_id.filter(|id| !id.is_null()),
            }),
            Response::RowCount { rows, row_count } => {
                let insert_id = match returning {
                    Some(column) => rows
                        .first()
                        .and_then(|row| row.get(column))
                        .filter(|id| !id.is_null())
                        .cloned(),
                    None => None,
                };

                Ok(Mutation {
                    affected_rows: row_count,
                    insert_id,
                })
            }
            Response::Rows(rows) => Err(Error::invalid_result(format!(
                "expected a write result, got {} rows",
                rows.len()
            ))),
        }
    }
}
