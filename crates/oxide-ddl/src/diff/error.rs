//! Diff error types.

use thiserror::Error;

use crate::parser::ParseError;

/// Errors returned by the diff engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The two schemas are equivalent. Not a failure: there is nothing to
    /// migrate.
    #[error("no difference between the schemas")]
    NoDifference,

    /// The schemas contain something the engine cannot migrate.
    #[error("cannot diff `{statement}`: {reason}")]
    NotSupported {
        /// The statement or object involved.
        statement: String,
        /// Why it is not supported.
        reason: String,
    },

    /// A schema given as text failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl DiffError {
    pub(crate) fn not_supported(statement: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotSupported {
            statement: statement.into(),
            reason: reason.into(),
        }
    }
}
