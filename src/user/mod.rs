mod id;

pub use id::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{Result, ScriptError};

/// User payload sent by the platform to the `create` script.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(
        required(message = "The user email is missing."),
        length(min = 1, message = "The user email is missing.")
    )]
    pub email: Option<String>,
    /// Platform-supplied fields, kept untouched and ignored.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewUser {
    /// Create a [`NewUser`] with only an email.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Read a raw platform payload.
    ///
    /// JSON `null` means the platform sent no user at all.
    pub fn from_value(value: Value) -> Result<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(ScriptError::Payload)
    }
}

/// User profile returned to the platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub email: String,
    /// Always asserted: the caller already verified the address upstream.
    pub email_verified: bool,
    pub app_metadata: Map<String, Value>,
}

impl UserRecord {
    /// Create a verified [`UserRecord`] with empty metadata.
    pub fn verified(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            email_verified: true,
            app_metadata: Map::new(),
        }
    }
}

/// Result of a lookup.
///
/// Absence is not an error: the platform falls back to `create`.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    Found(UserRecord),
    NotFound,
}

impl LookupOutcome {
    /// Convert into an [`Option`], `None` meaning not found.
    pub fn into_option(self) -> Option<UserRecord> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            LookupOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

impl From<Option<UserRecord>> for LookupOutcome {
    fn from(record: Option<UserRecord>) -> Self {
        record.map_or(LookupOutcome::NotFound, LookupOutcome::Found)
    }
}

/// Opaque request context given by the platform on lookups.
///
/// Carried through, never read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupContext(Value);

impl LookupContext {
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_user_from_null() {
        assert_eq!(NewUser::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_new_user_keeps_extra_fields() {
        let user = NewUser::from_value(json!({
            "email": "jane.doe@example.com",
            "password": "hunter2",
            "tenant": "dev",
        }))
        .unwrap()
        .unwrap();

        assert_eq!(user.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(user.extra.get("tenant"), Some(&json!("dev")));
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_new_user_validation() {
        assert!(NewUser::default().validate().is_err());
        assert!(NewUser::with_email("").validate().is_err());
        assert!(NewUser::with_email("x").validate().is_ok());
    }

    #[test]
    fn test_new_user_wrong_shape() {
        assert!(matches!(
            NewUser::from_value(json!({ "email": 42 })),
            Err(ScriptError::Payload(_))
        ));
        assert!(matches!(
            NewUser::from_value(json!("jane.doe@example.com")),
            Err(ScriptError::Payload(_))
        ));
    }

    #[test]
    fn test_record_serialization() {
        let record = UserRecord::verified(
            UserId::derive("jane.doe@example.com"),
            "jane.doe@example.com",
        );

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "user_id": "jane_doe",
                "email": "jane.doe@example.com",
                "email_verified": true,
                "app_metadata": {},
            })
        );
    }

    #[test]
    fn test_lookup_outcome_option() {
        assert_eq!(LookupOutcome::from(None), LookupOutcome::NotFound);
        assert_eq!(LookupOutcome::NotFound.into_option(), None);

        let record = UserRecord::verified(UserId::derive("a@b"), "a@b");
        let outcome = LookupOutcome::from(Some(record.clone()));
        assert!(outcome.is_found());
        assert_eq!(outcome.into_option(), Some(record));
    }
}
