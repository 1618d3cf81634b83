use super::Error;

/// Error when a row's primary key is partially set.
///
/// Detected before any statement is issued for the row.
#[derive(Debug)]
pub(super) struct InconsistentPrimaryKey {
    table: Box<str>,
    message: Box<str>,
}

impl std::error::Error for InconsistentPrimaryKey {}

impl core::fmt::Display for InconsistentPrimaryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "inconsistent primary key on table `{}`: {}",
            self.table, self.message
        )
    }
}

impl Error {
    /// Creates an inconsistent primary key error.
    pub fn inconsistent_primary_key(
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InconsistentPrimaryKey(
            InconsistentPrimaryKey {
                table: table.into().into(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an inconsistent primary key error.
    pub fn is_inconsistent_primary_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InconsistentPrimaryKey(_))
    }
}
