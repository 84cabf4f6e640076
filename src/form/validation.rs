//! Field validators.
//!
//! Every function here is pure: it looks at a raw value and returns the
//! error to show next to the field, if any.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::form::draft::{Field, ImageFile, ProfileDraft};

/// Domains accepted after the `@`. Compared case-sensitively.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 4] =
    ["gmail.com", "yahoo.com", "outlook.com", "aaludra.com"];

pub const MAX_NAME_CHARS: usize = 50;

/// Upper bound for an uploaded image before compression (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,3}$").expect("valid age regex"));

/// Validation failure for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{} is required", .0.label())]
    Required(Field),

    #[error("Invalid email format")]
    InvalidFormat,

    #[error("Only Aaludra, Gmail, Yahoo, and Outlook domains are allowed")]
    DomainNotAllowed,

    #[error("Name should be maximum 50 characters long")]
    TooLong,

    #[error("Age should be a number with 2 or 3 digits")]
    BadFormat,

    #[error("Only image files are allowed")]
    NotAnImage,

    #[error("File size should not exceed 5 MB")]
    TooLarge,
}

/// Error slot for every field of the form.
///
/// Backed by a fixed table so every field always has an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldErrors {
    slots: [Option<FieldError>; 6],
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.slots[field.index()]
    }

    pub fn set(&mut self, field: Field, error: Option<FieldError>) {
        self.slots[field.index()] = error;
    }

    pub fn has_errors(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Fields with an error, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        Field::ALL
            .iter()
            .filter_map(|field| self.get(*field).map(|error| (*field, error)))
    }
}

pub fn validate_email(email: &str) -> Option<FieldError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Some(FieldError::InvalidFormat);
    }
    let domain = email.split('@').nth(1).unwrap_or_default();
    if !ALLOWED_EMAIL_DOMAINS.contains(&domain) {
        return Some(FieldError::DomainNotAllowed);
    }
    None
}

pub fn validate_name(name: &str) -> Option<FieldError> {
    (name.chars().count() > MAX_NAME_CHARS).then_some(FieldError::TooLong)
}

/// Accepts exactly two or three ASCII digits.
///
/// Single-digit ages are rejected even though the age input allows 1-999.
pub fn validate_age(age: &str) -> Option<FieldError> {
    (!AGE_PATTERN.is_match(age)).then_some(FieldError::BadFormat)
}

pub fn validate_image(image: &ImageFile) -> Option<FieldError> {
    if !image.mime().starts_with("image/") {
        return Some(FieldError::NotAnImage);
    }
    if image.size() > MAX_IMAGE_BYTES {
        return Some(FieldError::TooLarge);
    }
    None
}

/// Rule applied while the user edits one field.
///
/// Role and company are free choices and have no rule of their own; empty
/// values are only caught by [`validate_draft`].
pub fn validate_field(field: Field, draft: &ProfileDraft) -> Option<FieldError> {
    match field {
        Field::Email => validate_email(&draft.email),
        Field::Name => validate_name(&draft.name),
        Field::Age => validate_age(&draft.age),
        Field::Role | Field::Company => None,
        Field::Image => draft.image.as_ref().and_then(validate_image),
    }
}

/// Rule applied on submit: every field is required, then checked by its own
/// validator. Nothing from earlier keystrokes is reused.
pub fn validate_draft(draft: &ProfileDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for field in Field::ALL {
        let missing = match draft.text(field) {
            Some(text) => text.trim().is_empty(),
            None => draft.image.is_none(),
        };
        let error = if missing {
            Some(FieldError::Required(field))
        } else {
            validate_field(field, draft)
        };
        errors.set(field, error);
    }
    errors
}
