//! Defines the app level error type and its conversion to plain-text HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The fields for an expense were missing or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The expense ID in the request path is not a valid ID.
    ///
    /// Holds the string the client sent.
    #[error("\"{0}\" is not a valid expense ID")]
    InvalidExpenseId(String),

    /// The request body or path parameters could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No expense matches the given ID.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the expense has not already been deleted.
    #[error("Expense not found")]
    NotFound,

    /// The expense store is unreachable or rejected the operation.
    ///
    /// Holds the error message from the underlying store.
    #[error("the expense store could not complete the request: {0}")]
    Store(String),
}

/// The ways the fields of an expense can fail validation.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ValidationError {
    /// A required field was not in the request.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A text field was empty or only contained whitespace.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// Expenses record money spent, so the amount cannot be below zero.
    #[error("amount must be zero or greater, got {0}")]
    NegativeAmount(f64),

    /// The amount was NaN or infinite.
    #[error("amount must be a finite number")]
    InvalidAmount,

    /// The month in a monthly query was not between 1 and 12.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// The year in a monthly query is outside the supported date range.
    #[error("{0} is not a supported year")]
    InvalidYear(i32),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(error: mongodb::error::Error) -> Self {
        Error::Store(error.to_string())
    }
}

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidExpenseId(_) | Error::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {self}");
        } else {
            tracing::debug!("Rejected request: {self}");
        }

        (status_code, self.to_string()).into_response()
    }
}
