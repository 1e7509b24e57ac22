//! Error handler for scripts.

use std::any::Any;

use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ScriptError>;

/// Enum representing script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("the user object or user email is missing")]
    MissingUser,

    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error("malformed user payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("user id {user_id:?} is already bound to another email than {email:?}")]
    IdentifierCollision { user_id: String, email: String },

    #[error("unexpected error, {details}")]
    Unexpected {
        details: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Broad family of a [`ScriptError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    Unexpected,
}

impl ScriptError {
    /// Wrap any error raised while processing.
    pub fn unexpected<E>(details: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unexpected {
            details: details.to_owned(),
            source: Some(Box::new(err)),
        }
    }

    /// Convert a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let details = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "script panicked".to_owned());

        Self::Unexpected {
            details,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::MissingUser
            | ScriptError::Validation(_)
            | ScriptError::Payload(_) => ErrorKind::Validation,
            ScriptError::IdentifierCollision { .. } => ErrorKind::Conflict,
            ScriptError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

/// Error as delivered to the platform.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    kind: ErrorKind,
    message: String,
    errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    /// Update `message` field.
    pub fn message(mut self, message: &str) -> Self {
        self.message = message.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }
}

impl Default for ErrorBody {
    fn default() -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            message: "Script Error: something went wrong.".to_owned(),
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue
                    .message
                    .as_ref()
                    .map_or_else(|| issue.code.to_string(), |m| m.to_string()),
            })
        })
        .collect()
}

impl From<&ScriptError> for ErrorBody {
    fn from(err: &ScriptError) -> Self {
        let body = ErrorBody {
            kind: err.kind(),
            ..Default::default()
        }
        .message(&format!("Script Error: {err}."));

        match err {
            ScriptError::Validation(validation_errors) => {
                body.errors(validation_errors)
            },

            // Details stay in logs.
            ScriptError::Unexpected { .. } => ErrorBody::default(),

            _ => body,
        }
    }
}
