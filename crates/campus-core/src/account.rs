// Account domain type
//
// The public view of a credential record. The password hash stays in the
// storage row and is never part of this type, so it cannot leak into a
// response or a log line by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::role::Role;

/// Public view of an account, as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_serializes_camel_case() {
        let account = Account {
            id: Uuid::nil(),
            email: "alice@example.com".to_string(),
            role: Role::Teacher,
            first_name: "Alice".to_string(),
            last_name: "Ngo".to_string(),
            photo: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["lastName"], "Ngo");
        assert_eq!(json["role"], "teacher");
        // No hash field exists on the public view
        assert!(json.get("passwordHash").is_none());
        // Photo is omitted when absent
        assert!(json.get("photo").is_none());
    }
}
