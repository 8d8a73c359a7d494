//! Configuration validation

use crate::schema::{RawConfig, RawMockData, RawProviderConfig, RawRefreshConfig};
use crate::settings::ProviderKind;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown provider kind '{0}' (expected \"mock\" or \"remote\")")]
    UnknownProviderKind(String),

    #[error("Remote provider requires provider.base_url")]
    MissingBaseUrl,

    #[error("Invalid base URL '{value}': {message}")]
    InvalidBaseUrl { value: String, message: String },

    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },

    #[error("Duplicate mock student ID: {0}")]
    DuplicateStudentId(String),

    #[error("Duplicate mock class ID: {0}")]
    DuplicateClassId(String),

    #[error("Mock {what} has an empty id")]
    EmptyId { what: &'static str },
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_provider(&config.provider));
    errors.extend(validate_refresh(&config.refresh));

    if let Some(mock) = &config.mock {
        errors.extend(validate_mock(mock));
    }

    errors
}

fn validate_provider(provider: &RawProviderConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let kind = match provider.kind.as_deref() {
        None => Some(ProviderKind::Mock),
        Some(raw) => match raw.parse::<ProviderKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.push(ValidationError::UnknownProviderKind(raw.to_string()));
                None
            }
        },
    };

    match (&provider.base_url, kind) {
        (Some(url), _) => {
            if let Err(message) = check_base_url(url) {
                errors.push(ValidationError::InvalidBaseUrl {
                    value: url.clone(),
                    message,
                });
            }
        }
        (None, Some(ProviderKind::Remote)) => errors.push(ValidationError::MissingBaseUrl),
        (None, _) => {}
    }

    if provider.timeout_seconds == Some(0) {
        errors.push(ValidationError::ZeroInterval {
            field: "provider.timeout_seconds",
        });
    }

    errors
}

fn validate_refresh(refresh: &RawRefreshConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if refresh.current_class_seconds == Some(0) {
        errors.push(ValidationError::ZeroInterval {
            field: "refresh.current_class_seconds",
        });
    }
    if refresh.clock_seconds == Some(0) {
        errors.push(ValidationError::ZeroInterval {
            field: "refresh.clock_seconds",
        });
    }

    errors
}

fn validate_mock(mock: &RawMockData) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen_students = HashSet::new();
    for student in &mock.students {
        if student.id.as_str().trim().is_empty() {
            errors.push(ValidationError::EmptyId { what: "student" });
        } else if !seen_students.insert(student.id.as_str()) {
            errors.push(ValidationError::DuplicateStudentId(student.id.to_string()));
        }
    }

    let mut seen_classes = HashSet::new();
    for class in &mock.classes {
        if class.id.as_str().trim().is_empty() {
            errors.push(ValidationError::EmptyId { what: "class" });
        } else if !seen_classes.insert(class.id.as_str()) {
            errors.push(ValidationError::DuplicateClassId(class.id.to_string()));
        }
    }

    errors
}

/// Check that a base URL is an absolute http(s) URL with a host
///
/// Uses the same parser the remote provider builds its endpoint with.
pub fn check_base_url(url: &str) -> Result<(), String> {
    timesheet_provider::parse_base_url(url).map(|_| ())
}
