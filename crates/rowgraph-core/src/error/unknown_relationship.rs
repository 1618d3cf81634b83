use super::Error;

#[derive(Debug)]
pub(super) struct UnknownRelationship {
    table: Box<str>,
    relationship: Box<str>,
}

impl std::error::Error for UnknownRelationship {}

impl core::fmt::Display for UnknownRelationship {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown relationship `{}` on table `{}`",
            self.relationship, self.table
        )
    }
}

impl Error {
    /// Creates an unknown relationship error.
    pub fn unknown_relationship(
        table: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnknownRelationship(UnknownRelationship {
            table: table.into().into(),
            relationship: relationship.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown relationship error.
    pub fn is_unknown_relationship(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownRelationship(_))
    }
}
