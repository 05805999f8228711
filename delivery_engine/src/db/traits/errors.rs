use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Conditional write was rejected: {0}")]
    ConditionFailed(String),
    #[error("Invalid storage configuration: {0}")]
    ConfigurationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConditionFailed(db_err.message().to_string())
            },
            e => Self::DatabaseError(e.to_string()),
        }
    }
}
