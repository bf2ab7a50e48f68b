//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cache_key::Cacheable;
use crate::constants::{CACHE_PREFIX_USER, CACHE_PREFIX_USER_LIST};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Store-assigned identifier
    pub id: i32,
    /// Display name
    pub name: String,
    /// Unique email address
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cacheable for User {
    const ENTITY_PREFIX: &'static str = CACHE_PREFIX_USER;
    const LIST_PREFIX: &'static str = CACHE_PREFIX_USER_LIST;
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateUser {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "Ana"))]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[cfg_attr(feature = "openapi", schema(example = "ana@example.com"))]
    pub email: String,
}

/// User update data transfer object.
///
/// Absent fields keep their stored value. An empty string is treated the
/// same as an absent field, so a name or email can never be cleared through
/// an update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateUser {
    /// Drop values that count as "not provided".
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|name| !name.is_empty()),
            email: self.email.filter(|email| !email.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_empty_strings() {
        let patch = UpdateUser {
            name: Some(String::new()),
            email: Some("new@example.com".to_string()),
        }
        .normalized();

        assert_eq!(patch.name, None);
        assert_eq!(patch.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_create_user_validation() {
        let valid = CreateUser {
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_name = CreateUser {
            name: String::new(),
            email: "a@x.com".to_string(),
        };
        assert!(missing_name.validate().is_err());

        let bad_email = CreateUser {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_user_cache_keys() {
        assert_eq!(User::entity_key(7), "user:7");
    }
}
