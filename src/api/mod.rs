//! HTTP client for the profile backend.
//!
//! One method per endpoint. Non-2xx responses are decoded into
//! [`ErrorBody`] and returned as [`ApiError::Status`]; callers decide how a
//! given status is presented.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody};
pub use types::{ProfileSubmission, UserList};
