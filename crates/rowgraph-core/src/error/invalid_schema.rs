use super::Error;

/// Error when a schema declaration does not hold together.
///
/// This occurs when:
/// - A table, column or relationship name is declared twice
/// - A table has no primary key, or a non-key column is flagged `generated`
/// - A relationship refers to a table or column that does not exist
/// - An `other_relationship` pairing is not symmetric
///
/// Raised once by `Schema::builder().build()`, never at request time.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSchema(_))
    }
}
