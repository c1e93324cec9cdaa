//! Configuration validation

use crate::schema::{RawConfig, RawUser};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("User '{user_id}': {message}")]
    UserError { user_id: String, message: String },

    #[error("Duplicate user ID: {0}")]
    DuplicateUserId(String),

    #[error("Duplicate user email: {0}")]
    DuplicateEmail(String),

    #[error("Storage config error: {0}")]
    StorageError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen_ids = HashSet::new();
    let mut seen_emails = HashSet::new();
    for user in &config.users {
        if !seen_ids.insert(&user.id) {
            errors.push(ValidationError::DuplicateUserId(user.id.clone()));
        }
        // Login matches emails exactly, so only exact duplicates collide
        if !seen_emails.insert(&user.email) {
            errors.push(ValidationError::DuplicateEmail(user.email.clone()));
        }
    }

    for user in &config.users {
        errors.extend(validate_user(user));
    }

    if let Some(database) = &config.storage.database {
        if database.trim().is_empty() {
            errors.push(ValidationError::StorageError(
                "database file name cannot be empty".into(),
            ));
        } else if database.contains('/') || database.contains('\\') {
            errors.push(ValidationError::StorageError(format!(
                "database '{}' must be a file name, not a path",
                database
            )));
        }
    }

    errors
}

fn validate_user(user: &RawUser) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut fail = |message: &str| {
        errors.push(ValidationError::UserError {
            user_id: user.id.clone(),
            message: message.into(),
        })
    };

    if user.id.trim().is_empty() {
        fail("id cannot be empty");
    }
    if user.name.trim().is_empty() {
        fail("name cannot be empty");
    }
    if user.email.trim().is_empty() {
        fail("email cannot be empty");
    } else if !user.email.contains('@') {
        fail("email must contain '@'");
    }
    if user.password.is_empty() {
        fail("password cannot be empty");
    }

    errors
}
