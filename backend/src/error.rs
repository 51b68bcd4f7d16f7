use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use serde::Serialize;
use shared::error::{Error, ErrorCode};
use shared::validation::ValidationError;
use thiserror::Error;
use tracing::{error, warn};
use crate::ledger::LedgerError;
use crate::service::{RejectReason, ServiceError};

#[derive(Error, Debug, Serialize)]
pub enum ApiError {
    #[error("Unknown category")]
    InvalidCategory,
    #[error("Unknown nominee for this category")]
    InvalidNominee,
    #[error("Already voted in this category")]
    AlreadyVoted,
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Storage temporarily unavailable")]
    StorageUnavailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidCategory => Status::BadRequest,
            ApiError::InvalidNominee => Status::BadRequest,
            ApiError::AlreadyVoted => Status::Forbidden,
            ApiError::NotFound => Status::NotFound,
            ApiError::Unauthorized => Status::Unauthorized,
            ApiError::StorageUnavailable => Status::ServiceUnavailable,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidCategory => ErrorCode::InvalidCategory,
            ApiError::InvalidNominee => ErrorCode::InvalidNominee,
            ApiError::AlreadyVoted => ErrorCode::AlreadyVoted,
            ApiError::NotFound => ErrorCode::NotFound,
            ApiError::Unauthorized => ErrorCode::Unauthorized,
            ApiError::StorageUnavailable => ErrorCode::StorageUnavailable,
            ApiError::Internal(_) => ErrorCode::SystemError,
        }
    }
}

impl From<RejectReason> for ApiError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InvalidCategory => ApiError::InvalidCategory,
            RejectReason::InvalidNominee => ApiError::InvalidNominee,
            RejectReason::AlreadyVoted => ApiError::AlreadyVoted,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        match e.code() {
            ErrorCode::InvalidNominee => ApiError::InvalidNominee,
            _ => ApiError::InvalidCategory,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        warn!("{}", e);
        ApiError::StorageUnavailable
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Storage(e) => e.into(),
            ServiceError::TallyInvariant(e) => {
                error!("{}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        // Internal details stay in the log.
        let message = match &self {
            ApiError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };

        rocket::Response::build_from(Json(Error::new(self.code(), message)).respond_to(req)?)
            .status(status)
            .ok()
    }
}
