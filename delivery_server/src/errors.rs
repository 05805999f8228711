use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use delivery_engine::{AddressApiError, AuthApiError, CatalogApiError, OrderFlowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Could not read request body. {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path. {0}")]
    InvalidRequestPath(String),
    #[error("Authentication error. {0}")]
    Unauthorized(#[from] AuthError),
    #[error("Forbidden. {0}")]
    Forbidden(String),
    #[error("The data was not found. {0}")]
    NotFound(String),
    #[error("Conflict. {0}")]
    Conflict(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("Invalid status transition. {0}")]
    InvalidTransition(String),
    #[error("Could not issue access token. {0}")]
    CouldNotSerializeAccessToken(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CouldNotSerializeAccessToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No bearer token was provided.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Invalid one-time password.")]
    InvalidOtp,
    #[error("The one-time password has expired.")]
    OtpExpired,
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AuthApiError::ValidationError(msg) => Self::ValidationError(msg),
            AuthApiError::PhoneAlreadyRegistered => Self::Conflict(e.to_string()),
            AuthApiError::UserNotFound => Self::NotFound(e.to_string()),
            AuthApiError::InvalidOtp => Self::Unauthorized(AuthError::InvalidOtp),
            AuthApiError::OtpExpired => Self::Unauthorized(AuthError::OtpExpired),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderFlowError::ValidationError(msg) => Self::ValidationError(msg),
            OrderFlowError::AddressNotFound(_) | OrderFlowError::ProductNotFound(_) => {
                Self::UnprocessableEntity(e.to_string())
            },
            OrderFlowError::AddressNotOwned(_) | OrderFlowError::NotOrderOwner(_) => Self::Forbidden(e.to_string()),
            OrderFlowError::OrderNotFound(_) => Self::NotFound(e.to_string()),
            OrderFlowError::InvalidTransition { .. } => Self::InvalidTransition(e.to_string()),
        }
    }
}

impl From<AddressApiError> for ServerError {
    fn from(e: AddressApiError) -> Self {
        match e {
            AddressApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AddressApiError::ValidationError(msg) => Self::ValidationError(msg),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
