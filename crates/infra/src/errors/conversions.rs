//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use vitalscope_common::storage::StorageError;
use vitalscope_domain::VitalScopeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VitalScopeError);

impl From<InfraError> for VitalScopeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VitalScopeError> for InfraError {
    fn from(value: VitalScopeError) -> Self {
        InfraError(value)
    }
}

trait IntoVitalScopeError {
    fn into_vitalscope(self) -> VitalScopeError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl IntoVitalScopeError for SqlError {
    fn into_vitalscope(self) -> VitalScopeError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        VitalScopeError::Storage("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        VitalScopeError::Storage("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        VitalScopeError::Storage("unique constraint violation".into())
                    }
                    (ErrorCode::NotADatabase, _) => {
                        VitalScopeError::Storage("file is not a database".into())
                    }
                    (ErrorCode::CannotOpen, _) => {
                        VitalScopeError::Storage(format!("unable to open database: {message}"))
                    }
                    _ => VitalScopeError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => VitalScopeError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                VitalScopeError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                VitalScopeError::Storage(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(..) => {
                VitalScopeError::Serialization("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => VitalScopeError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => VitalScopeError::Storage("invalid SQL query".into()),
            other => VitalScopeError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_vitalscope())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(VitalScopeError::Storage(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl IntoVitalScopeError for StorageError {
    fn into_vitalscope(self) -> VitalScopeError {
        match self {
            StorageError::Rusqlite(err) => err.into_vitalscope(),
            StorageError::Io(err) => err.into_vitalscope(),
            StorageError::SerdeJson(err) => err.into(),
            StorageError::InvalidConfig(message) => VitalScopeError::Config(message),
            other => VitalScopeError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_vitalscope())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl IntoVitalScopeError for IoError {
    fn into_vitalscope(self) -> VitalScopeError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => VitalScopeError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                VitalScopeError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData => VitalScopeError::Serialization(self.to_string()),
            _ => VitalScopeError::Storage(format!("I/O failure: {self}")),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_vitalscope())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl From<tokio::task::JoinError> for InfraError {
    fn from(value: tokio::task::JoinError) -> Self {
        InfraError(VitalScopeError::Internal(format!("blocking task failed: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VitalScopeError */
/* -------------------------------------------------------------------------- */

impl IntoVitalScopeError for HttpError {
    fn into_vitalscope(self) -> VitalScopeError {
        if self.is_timeout() {
            return VitalScopeError::Telemetry("HTTP request timed out".into());
        }

        if self.is_connect() {
            return VitalScopeError::Telemetry("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => VitalScopeError::NotFound(message),
                400..=499 => VitalScopeError::InvalidInput(message),
                _ => VitalScopeError::Telemetry(message),
            };
        }

        if self.is_builder() {
            return VitalScopeError::Config(format!("invalid telemetry request: {self}"));
        }

        VitalScopeError::Telemetry(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vitalscope())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
