use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use sqlx::mysql::MySqlDatabaseError;
use tracing::error;

/// Every failure a handler can surface. Messages are shown to the caller,
/// except for `Database` which is logged and redacted.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "{}", _0)]
    InvalidTransition(String),

    #[display(fmt = "Employee is not active")]
    InactiveEmployee,

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable machine-readable code put next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::InactiveEmployee => "inactive_employee",
            AppError::Validation(_) => "validation_error",
            AppError::Database(_) => "internal_error",
        }
    }
}

impl std::error::Error for AppError {}

/// MySQL `ER_DUP_ENTRY`. SQLSTATE 23000 alone also covers foreign key and
/// NOT NULL violations.
const ER_DUP_ENTRY: u16 = 1062;

/// Duplicate keys become a `Conflict` with a fixed message, so key and table
/// names never reach the client.
fn conflict_for(error_number: u16) -> Option<AppError> {
    (error_number == ER_DUP_ENTRY).then(|| AppError::conflict("Record already exists"))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let number = db_err
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(MySqlDatabaseError::number);
            if let Some(conflict) = number.and_then(conflict_for) {
                return conflict;
            }
        }
        AppError::Database(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::InvalidTransition(_)
            | AppError::InactiveEmployee => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(e) => {
                error!(error = %e, "Database operation failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::not_found("Employee not found"), StatusCode::NOT_FOUND)]
    #[case(AppError::conflict("Email already registered"), StatusCode::BAD_REQUEST)]
    #[case(AppError::invalid_transition("Already checked in"), StatusCode::BAD_REQUEST)]
    #[case(AppError::InactiveEmployee, StatusCode::BAD_REQUEST)]
    #[case(AppError::validation("month must be 1..=12"), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(AppError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_follows_variant(#[case] err: AppError, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    #[test]
    fn only_duplicate_entries_become_conflicts() {
        let conflict = conflict_for(1062).unwrap();
        assert!(matches!(conflict, AppError::Conflict(_)));
        assert_eq!(conflict.to_string(), "Record already exists");

        // foreign key and NOT NULL violations share SQLSTATE 23000
        assert!(conflict_for(1452).is_none());
        assert!(conflict_for(1048).is_none());
    }

    #[test]
    fn non_database_sqlx_errors_stay_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }

    #[actix_web::test]
    async fn database_errors_are_redacted() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["error"], "internal_error");
        assert_eq!(value["message"], "Internal Server Error");
    }

    #[actix_web::test]
    async fn client_errors_carry_their_message() {
        let err = AppError::invalid_transition("Already checked in today. Please check out first.");
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["error"], "invalid_transition");
        assert_eq!(
            value["message"],
            "Already checked in today. Please check out first."
        );
    }
}
