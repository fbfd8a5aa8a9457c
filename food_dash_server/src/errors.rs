use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use food_dash_engine::{notifier::NotifierError, DatabaseError, OrderApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Conversion error. {0}")]
    ConversionError(#[from] ConversionError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConversionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

/// A value could not be turned into its wire representation.
#[derive(Debug, Error)]
#[error("Could not convert {0}.")]
pub struct ConversionError(pub String);

impl From<serde_json::Error> for ConversionError {
    fn from(e: serde_json::Error) -> Self {
        Self(format!("value to JSON: {e}"))
    }
}

impl From<DatabaseError> for ServerError {
    fn from(e: DatabaseError) -> Self {
        Self::BackendError(format!("Database error: {e}"))
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::DatabaseError(e) => e.into(),
            OrderApiError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderApiError::CustomerNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderApiError::EmptyUpdate => Self::InvalidRequestBody(e.to_string()),
            OrderApiError::QueryError(_) => Self::InvalidRequestBody(e.to_string()),
            OrderApiError::InvalidPayload(_) => Self::InvalidRequestBody(e.to_string()),
        }
    }
}

impl From<NotifierError> for ServerError {
    fn from(e: NotifierError) -> Self {
        match e {
            NotifierError::LookupNotFound(_) => Self::NoRecordFound(e.to_string()),
            NotifierError::LookupTransientIO(_) => Self::BackendError(e.to_string()),
            NotifierError::SubscriptionError(_) => Self::InitializeError(e.to_string()),
        }
    }
}
