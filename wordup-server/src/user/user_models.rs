use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Anything that is not exactly `admin` is a regular user.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Professional,
    Broadcaster,
    Teacher,
    #[default]
    Other,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "student",
            UserType::Professional => "professional",
            UserType::Broadcaster => "broadcaster",
            UserType::Teacher => "teacher",
            UserType::Other => "other",
        }
    }

    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "student" => UserType::Student,
            "professional" => UserType::Professional,
            "broadcaster" => UserType::Broadcaster,
            "teacher" => UserType::Teacher,
            _ => UserType::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UsageContext {
    Educational,
    Practice,
    Professional,
    Personal,
    #[default]
    Other,
}

impl UsageContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageContext::Educational => "educational",
            UsageContext::Practice => "practice",
            UsageContext::Professional => "professional",
            UsageContext::Personal => "personal",
            UsageContext::Other => "other",
        }
    }

    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "educational" => UsageContext::Educational,
            "practice" => UsageContext::Practice,
            "professional" => UsageContext::Professional,
            "personal" => UsageContext::Personal,
            _ => UsageContext::Other,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: usize,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub user_type: UserType,
    pub usage_context: UsageContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub user_type: UserType,
    pub usage_context: UsageContext,
}

/// Lookups and storage always go through the normalized form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_tags_fall_back_to_other() {
        assert_eq!(UserType::parse_lossy("Teacher"), UserType::Teacher);
        assert_eq!(UserType::parse_lossy("astronaut"), UserType::Other);
        assert_eq!(UsageContext::parse_lossy(" personal "), UsageContext::Personal);
        assert_eq!(UsageContext::parse_lossy(""), UsageContext::Other);
    }

    #[test]
    fn serializes_user_in_camel_case() {
        let user = User {
            id: 3,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: UserRole::Admin,
            user_type: UserType::Student,
            usage_context: UsageContext::Educational,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["userType"], "student");
        assert_eq!(json["usageContext"], "educational");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
