use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use serde::Serialize;

use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    retryable: bool,
}

fn status_of(error: &KernelError) -> StatusCode {
    match error {
        KernelError::Concurrency => StatusCode::CONFLICT,
        KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
        KernelError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        KernelError::NotFound(_) => StatusCode::NOT_FOUND,
        KernelError::Validation(_) => StatusCode::BAD_REQUEST,
        KernelError::Conflict(_) => StatusCode::CONFLICT,
        KernelError::Unauthorized => StatusCode::UNAUTHORIZED,
        KernelError::InvalidToken => StatusCode::FORBIDDEN,
        KernelError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        KernelError::Forbidden => StatusCode::FORBIDDEN,
        KernelError::EmptyCart => StatusCode::BAD_REQUEST,
        KernelError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let context = self.0.current_context();
        let status = status_of(context);
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        let message = match context {
            KernelError::Internal => "Something went wrong!".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            message,
            retryable: context.is_transient(),
        };
        (status, Json(body)).into_response()
    }
}
