//! Error types for table models.
//!
//! Two layers of failure exist:
//!
//! - [`StorageError`]: what the storage collaborator reports. Constraint
//!   violations are distinguishable variants.
//! - [`ModelError`]: the domain error raised by mutating model operations.
//!   It carries a closed [`ErrorKind`] (message key + numeric code) and the
//!   [`ErrorFamily`] it belongs to.
//!
//! [`Failure`] is the union of both and is what the translator consumes.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Closed set of domain error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The model has no primary-key column, or the data lacks its value.
    UnsetPrimaryKey,
    ColumnMustBeUnique,
    ColumnEmptyNotNull,
    ColumnRestrictForeignKey,
    /// Any storage failure that is not a recognized constraint violation.
    ColumnUndefined,
    /// The quota guard tripped.
    MaxNumberReached,
}

impl ErrorKind {
    /// Numeric code reported to callers.
    pub fn code(self) -> u16 {
        match self {
            ErrorKind::UnsetPrimaryKey => 1,
            ErrorKind::ColumnMustBeUnique => 2,
            ErrorKind::ColumnEmptyNotNull => 3,
            ErrorKind::ColumnRestrictForeignKey => 4,
            ErrorKind::ColumnUndefined => 5,
            ErrorKind::MaxNumberReached => 6,
        }
    }

    /// Translation catalog key.
    pub fn message_key(self) -> &'static str {
        match self {
            ErrorKind::UnsetPrimaryKey => "base.dbmodel.unsetPrimaryKey",
            ErrorKind::ColumnMustBeUnique => "base.dbmodel.uniqueColException",
            ErrorKind::ColumnEmptyNotNull => "base.dbmodel.notNullException",
            ErrorKind::ColumnRestrictForeignKey => "base.dbmodel.foreignKeyException",
            ErrorKind::ColumnUndefined => "base.dbmodel.undefinedException",
            ErrorKind::MaxNumberReached => "base.maxNumberReached",
        }
    }

    /// Looks a kind up by its numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(ErrorKind::UnsetPrimaryKey),
            2 => Some(ErrorKind::ColumnMustBeUnique),
            3 => Some(ErrorKind::ColumnEmptyNotNull),
            4 => Some(ErrorKind::ColumnRestrictForeignKey),
            5 => Some(ErrorKind::ColumnUndefined),
            6 => Some(ErrorKind::MaxNumberReached),
            _ => None,
        }
    }
}

/// Names the family a [`ModelError`] belongs to.
///
/// Each model carries one; callers match on it to catch errors of a specific
/// model. Translated constraint violations use [`ErrorFamily::generic`], while
/// errors a model raises itself (unset key, quota) use the model's own family.
///
/// # Examples
///
/// ```
/// use table_model_core::ErrorFamily;
///
/// assert_eq!(ErrorFamily::for_model("Tags").as_str(), "TagsError");
/// assert_eq!(ErrorFamily::generic().as_str(), "ModelError");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorFamily(Cow<'static, str>);

impl ErrorFamily {
    const GENERIC: &'static str = "ModelError";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Default family of a model: `<ModelName>Error`.
    pub fn for_model(model_name: &str) -> Self {
        Self(Cow::Owned(format!("{model_name}Error")))
    }

    /// Family shared by all translated storage failures.
    pub fn generic() -> Self {
        Self(Cow::Borrowed(Self::GENERIC))
    }

    pub fn is_generic(&self) -> bool {
        self.0 == Self::GENERIC
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds an error of `kind` in this family with the kind's message key.
    pub fn error(&self, kind: ErrorKind) -> ModelError {
        ModelError::new(self.clone(), kind)
    }
}

impl Default for ErrorFamily {
    fn default() -> Self {
        Self::generic()
    }
}

impl fmt::Display for ErrorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Domain error raised by mutating model operations.
#[derive(Debug, Error)]
#[error("{family} [{}]: {message}", .kind.code())]
pub struct ModelError {
    family: ErrorFamily,
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<StorageError>,
}

impl ModelError {
    /// Creates an error whose message is the kind's catalog key.
    pub fn new(family: ErrorFamily, kind: ErrorKind) -> Self {
        Self {
            family,
            kind,
            message: kind.message_key().to_string(),
            source: None,
        }
    }

    /// Replaces the message key.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches the storage failure that caused this error.
    #[must_use]
    pub fn with_source(mut self, source: StorageError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn family(&self) -> &ErrorFamily {
        &self.family
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    /// Message key, e.g. `base.dbmodel.uniqueColException`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying storage failure, if this error was translated from one.
    pub fn storage_error(&self) -> Option<&StorageError> {
        self.source.as_ref()
    }
}

/// Failures reported by a storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A `NOT NULL` column received no value.
    #[error("NOT NULL constraint violated: {0}")]
    NotNull(String),

    /// A `UNIQUE` column (or primary key) received a duplicate value.
    #[error("UNIQUE constraint violated: {0}")]
    Unique(String),

    /// A foreign key reference or `RESTRICT` rule was violated.
    #[error("FOREIGN KEY constraint violated: {0}")]
    ForeignKey(String),

    /// A table or column name contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps an arbitrary backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Backend(Box::new(err))
    }
}

/// Anything that can go wrong inside a mutating operation.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] ModelError),
}

/// Convenience alias for read results.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Convenience alias for mutating results.
pub type Result<T> = std::result::Result<T, ModelError>;
