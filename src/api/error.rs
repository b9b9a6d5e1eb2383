use crate::application::loan::LoanApplicationError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// ワークフローのエラー
    Application(LoanApplicationError),
    /// リクエストボディを解釈できない
    BadRequest(String),
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Application(err) => err,
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse::new("BAD_REQUEST", msg));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        };

        let (status, error_type, message) = match err {
            // 400 Bad Request - 必須項目の欠落
            LoanApplicationError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }

            // 404 Not Found - リクエストされたリソースが存在しない
            LoanApplicationError::LoanNotFound => (
                StatusCode::NOT_FOUND,
                "LOAN_NOT_FOUND",
                "Loan not found".to_string(),
            ),

            // 409 Conflict - 同時更新
            LoanApplicationError::ConcurrentModification => (
                StatusCode::CONFLICT,
                "CONCURRENT_MODIFICATION",
                "Loan was modified by another request, reload and retry".to_string(),
            ),

            // 422 Unprocessable Entity - ビジネスルール違反
            LoanApplicationError::BookNotAvailable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BOOK_NOT_AVAILABLE",
                "Book is not available for loan".to_string(),
            ),
            LoanApplicationError::InvalidLoanStatus(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_LOAN_STATUS", msg)
            }

            // 502 Bad Gateway - 外部サービス障害
            // 原因はログに記録し、クライアントには一般的なメッセージのみを返す
            LoanApplicationError::CollaboratorUnavailable {
                collaborator,
                source,
            } => {
                tracing::error!("{} service error: {}", collaborator, source);
                (
                    StatusCode::BAD_GATEWAY,
                    "COLLABORATOR_UNAVAILABLE",
                    format!("{} service is unavailable, try again later", collaborator),
                )
            }

            // 500 Internal Server Error - システム障害
            LoanApplicationError::RepositoryError(e) => {
                tracing::error!("Loan repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPOSITORY_ERROR",
                    "Failed to access loan records".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
