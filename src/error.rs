use actix_web::{
    http::{header::ToStrError as HEADER_TO_STR_ERROR, StatusCode},
    HttpResponse, ResponseError,
};
use anyhow::Error as ANYHOW_ERROR;
use base64::DecodeError as BASE64_DECODE_ERROR;
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use ece::Error as ECE_ERROR;
use jsonwebtoken::errors::Error as JWT_ERROR;
use reqwest::header::{
    InvalidHeaderName as INVALID_HEADER_NAME,
    InvalidHeaderValue as INVALID_HEADER_VALUE,
};
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::{
    env::VarError,
    io::Error as IO_ERROR,
    num::{ParseIntError, TryFromIntError as TRY_FROM_INT_ERROR},
    str::ParseBoolError as PARSE_BOOL_ERROR,
    string::FromUtf8Error as FROM_UTF8_ERROR,
};
use thiserror::Error;
use tokio::{
    sync::AcquireError as ACQUIRE_ERROR, task::JoinError, time::error::Elapsed,
};
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;
use uuid::Error as UUID_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    TokioElapsedError(#[from] Elapsed),

    #[error("{0}")]
    Base64DecodeError(#[from] BASE64_DECODE_ERROR),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("{0}")]
    UuidError(#[from] UUID_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Task message error: {0}")]
    TaskError(String),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Decode datetime: {0}")]
    DecodeDateTimeError(String),

    #[error("{0}")]
    HeaderToStrError(#[from] HEADER_TO_STR_ERROR),

    #[error("{0}")]
    TryFromIntError(#[from] TRY_FROM_INT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("FromUtf8Error error: {0}")]
    FromUtf8Error(#[from] FROM_UTF8_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("{0}")]
    InvalidHeaderName(#[from] INVALID_HEADER_NAME),

    #[error("{0}")]
    InvalidHeaderValue(#[from] INVALID_HEADER_VALUE),

    #[error("Invalid option {option}")]
    InvalidOption { option: String },

    #[error("{0}")]
    EceError(#[from] ECE_ERROR),

    #[error("{0}")]
    JWT(#[from] JWT_ERROR),

    #[error("InvalidHeader error: {0}")]
    InvalidHeader(String),

    #[error("Missing params: {0}")]
    MissingParams(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    AcquireError(#[from] ACQUIRE_ERROR),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParams(_)
            | Error::InvalidOption { .. }
            | Error::ParseBoolError(_)
            | Error::INT(_)
            | Error::BigDecimalError(_)
            | Error::DecodeDateTimeError(_)
            | Error::UuidError(_)
            | Error::URL(_)
            | Error::HeaderToStrError(_)
            | Error::Base64DecodeError(_) => StatusCode::BAD_REQUEST,

            Error::Unauthorized(_) | Error::JWT(_) => StatusCode::UNAUTHORIZED,

            Error::NotFound(_) => StatusCode::NOT_FOUND,

            Error::ReqwestError(_) | Error::EceError(_) => {
                StatusCode::BAD_GATEWAY
            },

            Error::TokioElapsedError(_) => StatusCode::GATEWAY_TIMEOUT,

            Error::ConfigurationError(_)
            | Error::SQL(_)
            | Error::Io(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::JsonError(_)
            | Error::ServerError(_)
            | Error::TaskError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::TryFromIntError(_)
            | Error::AnyHowError(_)
            | Error::FromUtf8Error(_)
            | Error::InvalidHeaderName(_)
            | Error::InvalidHeaderValue(_)
            | Error::InvalidHeader(_)
            | Error::AcquireError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}
