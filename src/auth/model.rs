use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthResult;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a login or signup attempt, as handed to UI code.
///
/// Failures never surface as a panic or an `Err`; callers check `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl<T> From<AuthResult<T>> for AuthOutcome {
    fn from(result: AuthResult<T>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use chrono::TimeZone;

    #[test]
    fn outcome_from_error_carries_message() {
        let outcome = AuthOutcome::from(Err::<(), _>(AuthError::FieldsRequired));
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("All fields are required"));
    }

    #[test]
    fn successful_outcome_omits_error_field() {
        let json = serde_json::to_value(AuthOutcome::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: "mock-user-id".to_string(),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 18, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["createdAt"], "2024-03-09T18:00:00Z");
        assert_eq!(json["username"], "alice");
    }
}
