use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Already played in period {0}")]
    AlreadyPlayed(String),

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AlreadyPlayed(period) => {
                log::info!("Draw rejected, already played in {period}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "ALREADY_PLAYED",
                    format!("Already played this month ({period})"),
                )
            }
            AppError::DrawInProgress => {
                log::warn!("Draw rejected, another draw is in progress");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "DRAW_IN_PROGRESS",
                    "A draw is already in progress".to_string(),
                )
            }
            AppError::UrlError(err) => {
                log::warn!("Share link generation failed: {err}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "INVALID_URL",
                    format!("Invalid base URL: {err}"),
                )
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg.clone(),
                )
            }
            AppError::StorageError(_) | AppError::IoError(_) => {
                log::error!("Storage error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
