use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Унифицированная структура ответа об ошибке
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub code: &'a str,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbError(_)
            | AppError::PasswordHash(_)
            | AppError::Token(_)
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Детали внутренних ошибок только в лог, клиенту общий текст
        let message = if status.is_server_error() {
            log::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse { code: self.code(), message };
        HttpResponse::build(status).json(body)
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DbError(_) => "DB_ERROR",
            AppError::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            AppError::Token(_) => "TOKEN_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let err = AppError::Conflict("user with this email already exists".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "CONFLICT");
        assert_eq!(json["message"], "user with this email already exists");
    }

    #[actix_web::test]
    async fn server_errors_hide_details() {
        let err = AppError::DbError(DbErr::Custom("connection refused on 10.0.0.5".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "DB_ERROR");
        assert_eq!(json["message"], "Internal server error");
    }
}
