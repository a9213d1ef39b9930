//! Maps storage failures onto the closed domain error set.
//!
//! | failure                                   | result                              |
//! |-------------------------------------------|-------------------------------------|
//! | `StorageError::NotNull`                   | `ColumnEmptyNotNull` (generic)      |
//! | `StorageError::Unique`                    | `ColumnMustBeUnique` (generic)      |
//! | `StorageError::ForeignKey`                | `ColumnRestrictForeignKey` (generic)|
//! | domain error of kind `MaxNumberReached`   | re-raised under the model's family  |
//! | any other domain error                    | unchanged                           |
//! | anything else                             | `ColumnUndefined` (generic)         |

use tracing::warn;

use crate::error::{ErrorFamily, ErrorKind, Failure, ModelError, StorageError};

/// Translates `failure` into exactly one [`ModelError`].
///
/// `family` is the calling model's family. It is only used when a quota
/// error passes through, so callers catching their own family see it.
///
/// # Examples
///
/// ```
/// use table_model_core::{translate, ErrorFamily, ErrorKind, Failure, StorageError};
///
/// let family = ErrorFamily::for_model("Tags");
/// let err = translate(Failure::from(StorageError::Unique("tags.name".into())), &family);
/// assert_eq!(err.kind(), ErrorKind::ColumnMustBeUnique);
/// assert!(err.family().is_generic());
/// ```
pub fn translate(failure: Failure, family: &ErrorFamily) -> ModelError {
    match failure {
        Failure::Domain(err) if err.kind() == ErrorKind::MaxNumberReached => {
            let message = err.message().to_string();
            ModelError::new(family.clone(), ErrorKind::MaxNumberReached).with_message(message)
        }
        Failure::Domain(err) => err,
        Failure::Storage(err) => {
            let kind = classify(&err);
            warn!(error = %err, code = kind.code(), "storage failure translated");
            ErrorFamily::generic().error(kind).with_source(err)
        }
    }
}

fn classify(err: &StorageError) -> ErrorKind {
    match err {
        StorageError::NotNull(_) => ErrorKind::ColumnEmptyNotNull,
        StorageError::Unique(_) => ErrorKind::ColumnMustBeUnique,
        StorageError::ForeignKey(_) => ErrorKind::ColumnRestrictForeignKey,
        StorageError::InvalidIdentifier(_) | StorageError::Backend(_) => ErrorKind::ColumnUndefined,
    }
}
