//! The submit sequence: normalize → compress → transmit.
//!
//! Runs once per submit attempt. Nothing here retries; a retry is a new
//! `SubmitRequested` from the user.

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::{ApiClient, ApiError, ProfileSubmission};
use crate::form::ProfileDraft;
use crate::preprocess::{run_preprocessor, CompressionOptions, ImagePreprocessor, PreprocessError};
use crate::record::SubmissionResult;
use crate::store::StoreError;

pub const ALREADY_EXISTS_MESSAGE: &str = "User already exists";
pub const UNEXPECTED_MESSAGE: &str = "Unexpected error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum SubmitError {
    /// HTTP 400: the profile is already registered.
    #[error("Duplicate user: {message}")]
    DuplicateUser { message: String },

    /// Any other non-2xx status.
    #[error("Server rejected submission with {status}: {message}")]
    Server { status: u16, message: String },

    /// No usable response.
    #[error(transparent)]
    Network(ApiError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("Failed to persist record: {0}")]
    Persist(#[from] StoreError),
}

impl SubmitError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateUser { message } => message.clone(),
            Self::Server { message, .. } => format!("Error submitting form: {}", message),
            Self::Network(_) | Self::Preprocess(_) | Self::Persist(_) => {
                UNEXPECTED_MESSAGE.to_string()
            }
        }
    }
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status {
                status: 400, body, ..
            } => Self::DuplicateUser {
                message: body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| ALREADY_EXISTS_MESSAGE.to_string()),
            },
            ApiError::Status { status, body, .. } => Self::Server {
                status,
                message: body.detail().map(str::to_string).unwrap_or_else(|| {
                    StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("unknown error")
                        .to_string()
                }),
            },
            other => Self::Network(other),
        }
    }
}

/// Trimmed strings, lower-cased email. The image is passed through as-is.
pub fn normalize(draft: &ProfileDraft) -> ProfileSubmission {
    ProfileSubmission {
        email: draft.email.trim().to_lowercase(),
        name: draft.name.trim().to_string(),
        age: draft.age.trim().to_string(),
        role: draft.role.trim().to_string(),
        companyname: draft.company.trim().to_string(),
        file: draft.image.clone(),
    }
}

#[derive(Clone)]
pub struct SubmissionPipeline {
    api: ApiClient,
    preprocessor: Arc<dyn ImagePreprocessor>,
    options: CompressionOptions,
}

impl SubmissionPipeline {
    pub fn new(
        api: ApiClient,
        preprocessor: Arc<dyn ImagePreprocessor>,
        options: CompressionOptions,
    ) -> Self {
        Self {
            api,
            preprocessor,
            options,
        }
    }

    /// Sends an already validated draft and returns the server's record.
    pub async fn submit(&self, draft: &ProfileDraft) -> Result<SubmissionResult, SubmitError> {
        let mut submission = normalize(draft);

        if let Some(file) = submission.file.take() {
            let compressed =
                run_preprocessor(self.preprocessor.clone(), file, self.options).await?;
            submission.file = Some(compressed);
        }

        tracing::debug!(email = %submission.email, "posting profile");
        let record = self.api.add_user(submission).await?;
        Ok(record)
    }
}
