use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Buyer,
    Realtor,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Buyer => "BUYER",
            UserType::Realtor => "REALTOR",
            UserType::Admin => "ADMIN",
        }
    }
}

/// Full stored user row. Deliberately not Serialize: responses go through
/// the UserProfile projection so the password hash can never leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, with storage names re-exposed as camelCase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            user_type: user.user_type,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 53,
            name: "Damola".to_string(),
            email: "damola@example.com".to_string(),
            phone: "(816) 363 5839".to_string(),
            password: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            user_type: UserType::Realtor,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn profile_excludes_password_and_uses_camel_case() {
        let profile = UserProfile::from(sample_user());
        let json = serde_json::to_value(&profile).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["userType"], "REALTOR");
        assert_eq!(json["id"], 53);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("user_type").is_none());
    }

    #[test]
    fn user_type_round_trips_through_serde() {
        let parsed: UserType = serde_json::from_str("\"REALTOR\"").unwrap();
        assert_eq!(parsed, UserType::Realtor);
        assert_eq!(parsed.as_str(), "REALTOR");
    }
}
