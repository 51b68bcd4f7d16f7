use crate::error::ErrorCode;
use crate::models::VoteRequest;

pub const MAX_ID_LENGTH: usize = 64;
pub const MAX_USER_KEY_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Category id is empty")]
    EmptyCategory,
    #[error("Category id exceeds maximum length of {MAX_ID_LENGTH}")]
    CategoryTooLong,
    #[error("Nominee id is empty")]
    EmptyNominee,
    #[error("Nominee id exceeds maximum length of {MAX_ID_LENGTH}")]
    NomineeTooLong,
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyCategory | Self::CategoryTooLong => ErrorCode::InvalidCategory,
            Self::EmptyNominee | Self::NomineeTooLong => ErrorCode::InvalidNominee,
        }
    }
}

pub fn validate_vote_request(request: &VoteRequest) -> Result<(), ValidationError> {
    if request.category_id.trim().is_empty() { return Err(ValidationError::EmptyCategory); }
    if request.category_id.len() > MAX_ID_LENGTH { return Err(ValidationError::CategoryTooLong); }
    if request.nominee_id.trim().is_empty() { return Err(ValidationError::EmptyNominee); }
    if request.nominee_id.len() > MAX_ID_LENGTH { return Err(ValidationError::NomineeTooLong); }
    Ok(())
}

/// Cookie values outside this shape are treated as absent and replaced.
pub fn is_valid_user_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_USER_KEY_LENGTH
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
