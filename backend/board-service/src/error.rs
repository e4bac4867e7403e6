use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Registration or payload checks failed; the reason is sent verbatim.
    #[error("{0}")]
    Validation(String),

    /// Sign-in failed. One message for unknown nickname and wrong password.
    #[error("Check your nickname or password.")]
    InvalidCredentials,

    /// No session cookie, or the session is unknown or expired.
    #[error("Sign-in required.")]
    Unauthorized,

    /// Caller is signed in but does not own the resource.
    #[error("You do not own this resource.")]
    Forbidden,

    #[error("{0} not found.")]
    NotFound(String),

    #[error("You have already liked this post.")]
    AlreadyLiked,

    #[error("You have not liked this post.")]
    NotYetLiked,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::PRECONDITION_FAILED,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyLiked | AppError::NotYetLiked => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Don't leak internal details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "message": message,
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_http_surface() {
        assert_eq!(
            AppError::Validation("too short".into()).status_code(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("Post".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::AlreadyLiked.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotYetLiked.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Database("oops".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn internal_errors_are_masked() {
        let resp = AppError::Database("connection refused at 10.0.0.5".into()).error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn validation_reason_is_sent_verbatim() {
        let resp =
            AppError::Validation("Nickname must be at least 3 characters.".into()).error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "Nickname must be at least 3 characters.");
    }
}
