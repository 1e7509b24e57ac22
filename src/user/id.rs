//! ID logic management.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Anything outside of ASCII letters and digits.
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9]").expect("static pattern is valid")
});

const PLACEHOLDER: &str = "_";

/// Value object of a user identifier derived from an email address.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Derive a [`UserId`] from the local part of an email address.
    ///
    /// The local part is everything before the first `@`, or the whole
    /// string if there is none. Every character outside `[A-Za-z0-9]` is
    /// replaced by `_`, once per UTF-16 code unit so that identifiers match
    /// those computed by JavaScript platform code (`😀` gives `__`). Case is
    /// preserved and nothing is truncated, so two addresses sharing a local
    /// part on different domains give the same identifier.
    ///
    /// ```
    /// use customdb::user::UserId;
    ///
    /// assert_eq!(UserId::derive("jane.doe@example.com").as_str(), "jane_doe");
    /// ```
    pub fn derive(email: &str) -> Self {
        let local_part = email.split('@').next().unwrap_or_default();
        let id = UNSAFE_CHARS.replace_all(local_part, |caps: &Captures<'_>| {
            PLACEHOLDER.repeat(caps[0].encode_utf16().count())
        });
        Self(id.into_owned())
    }

    /// Returns the same string as a string slice `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_local_part() {
        assert_eq!(UserId::derive("jane.doe@example.com").as_str(), "jane_doe");
        assert_eq!(UserId::derive("John+Tag@x.io").as_str(), "John_Tag");
        assert_eq!(UserId::derive("a-b_c@d").as_str(), "a_b_c");
    }

    #[test]
    fn test_derive_splits_on_first_at() {
        assert_eq!(UserId::derive("a@b@c").as_str(), "a");
        assert_eq!(UserId::derive("@example.com").as_str(), "");
    }

    #[test]
    fn test_derive_without_at() {
        assert_eq!(UserId::derive("not-an-email").as_str(), "not_an_email");
        assert_eq!(UserId::derive("").as_str(), "");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let emails = ["jane.doe@example.com", "Ünïcødé@example.com", "x"];
        for email in emails {
            assert_eq!(UserId::derive(email), UserId::derive(&email.to_owned()));
        }
    }

    #[test]
    fn test_derive_charset() {
        let emails = [
            "jane.doe@example.com",
            "ünï cødé!#$%&'*+/=?^`{|}~@example.com",
            "emoji😀@x.com",
            "\t\n@",
        ];
        for email in emails {
            let id = UserId::derive(email);
            assert!(
                id.as_str()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "{id} holds an unsafe character"
            );
        }
        // One placeholder per UTF-16 code unit, not per byte.
        assert_eq!(UserId::derive("é@x").as_str(), "_");
    }

    #[test]
    fn test_derive_astral_chars_use_two_placeholders() {
        assert_eq!(UserId::derive("😀@x.com").as_str(), "__");
        assert_eq!(UserId::derive("a😀b.c@x.com").as_str(), "a__b_c");
        assert_eq!(UserId::derive("𝔘ser@x.com").as_str(), "__ser");
    }

    #[test]
    fn test_collision_across_domains() {
        assert_eq!(UserId::derive("a@x.com"), UserId::derive("a@y.com"));
    }

    #[test]
    fn test_serialize_as_string() {
        let id = UserId::derive("jane.doe@example.com");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""jane_doe""#);
    }
}
