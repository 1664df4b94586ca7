// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::models::attachment::AttachmentError;
use crate::domain::models::task::DomainError;
use crate::domain::repositories::repository::RepositoryError;
use crate::domain::services::task_service::ServiceError;

/// 请求解析错误
///
/// 在调用服务之前，由处理器在解析路径、表单时产生
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("malformed multipart body: {0}")]
    Multipart(String),

    #[error("missing multipart field: {0}")]
    MissingField(&'static str),

    #[error("malformed {field} field: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("path id {path} does not match body id {body}")]
    IdMismatch { path: uuid::Uuid, body: uuid::Uuid },

    #[error("task not found: {0}")]
    NotFound(uuid::Uuid),
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 错误对应的HTTP状态码
    pub fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            service_status(err)
        } else if let Some(err) = self.0.downcast_ref::<RequestError>() {
            match err {
                RequestError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidRequest { .. }
        | ServiceError::UnexpectedData { .. }
        | ServiceError::Filter(_) => StatusCode::BAD_REQUEST,
        ServiceError::Domain(DomainError::InvalidStateTransition { .. }) => StatusCode::CONFLICT,
        ServiceError::Domain(DomainError::ValidationError(_)) => StatusCode::BAD_REQUEST,
        ServiceError::Repository(RepositoryError::NoResults { .. }) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::InvalidFilter(_)) => StatusCode::BAD_REQUEST,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceError::Attachment(err) => match err {
            AttachmentError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AttachmentError::FileRead(_) | AttachmentError::MissingFilename => {
                StatusCode::BAD_REQUEST
            }
            AttachmentError::NoImagesFound => StatusCode::NOT_FOUND,
            AttachmentError::Upload(_)
            | AttachmentError::List(_)
            | AttachmentError::Get(_)
            | AttachmentError::Delete(_) => StatusCode::BAD_GATEWAY,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 存储层细节只进入日志
        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Request failed with internal error");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
