use super::UserRole;
use crate::format::{option_date, option_timestamp};
use crate::ids::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Account profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: UserRole,
    #[serde(default, with = "option_date")]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub role: UserRole,
    #[serde(default, with = "option_date")]
    pub birth_date: Option<NaiveDate>,
}

impl From<&UserResponse> for UserUpdateRequest {
    fn from(user: &UserResponse) -> Self {
        Self {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            birth_date: user.birth_date,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilterRequest {
    #[serde(default)]
    pub user_ids: Vec<UserId>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default, with = "option_timestamp")]
    pub birth_date_from: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub birth_date_to: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub created_at_from: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub created_at_to: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_with_string_role_and_no_birth_date() {
        let user: UserResponse = serde_json::from_value(json!({
            "id": "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11",
            "fullName": "Root",
            "email": "root@example.com",
            "role": "Admin",
            "birthDate": ""
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.birth_date, None);
        assert!(user.phone.is_empty());
    }

    #[test]
    fn test_update_from_profile() {
        let user: UserResponse = serde_json::from_value(json!({
            "id": "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11",
            "fullName": "Anna",
            "email": "anna@example.com",
            "phone": "+70000000000",
            "role": 0,
            "birthDate": "1990-04-12"
        }))
        .unwrap();
        let update = UserUpdateRequest::from(&user);
        assert_eq!(
            serde_json::to_value(&update).unwrap()["birthDate"],
            json!("1990-04-12")
        );
        assert_eq!(update.role, UserRole::User);
    }
}
