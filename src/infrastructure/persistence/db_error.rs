//! Translation of SQLx errors into the storage error taxonomy.

use crate::domain::repositories::{StorageError, UniqueConstraint};

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return StorageError::UniqueViolation {
                    constraint: db_err.constraint().and_then(UniqueConstraint::from_name),
                };
            }

            if db_err.is_foreign_key_violation() {
                return StorageError::MissingShortUrl;
            }
        }

        StorageError::Backend(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_backend_errors() {
        let err: StorageError = sqlx::Error::PoolTimedOut.into();

        assert!(matches!(err, StorageError::Backend(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_row_not_found_is_backend_error() {
        let err: StorageError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
