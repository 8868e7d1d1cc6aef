//! User records, request payloads and validation rules.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::{encode_component, Identified, ListQuery};

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("username pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const USERNAME_RULE: &str =
    "Username must be 3-20 characters and contain only letters, numbers, and underscores";
pub const EMAIL_RULE: &str = "Please provide a valid email address";
pub const FIRST_NAME_RULE: &str = "First name is required";
pub const LAST_NAME_RULE: &str = "Last name is required";
pub const PASSWORD_RULE: &str = "Password must be at least 6 characters long";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Moderator,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Moderator => "moderator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The username, or the full name when the username is empty.
    pub fn display_name(&self) -> String {
        if self.username.is_empty() {
            self.full_name()
        } else {
            self.username.clone()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_moderator(&self) -> bool {
        self.role == UserRole::Moderator
    }

    pub fn can_moderate(&self) -> bool {
        self.is_admin() || self.is_moderator()
    }

    /// The stored avatar, or a generated initials avatar.
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(avatar) if !avatar.is_empty() => avatar.clone(),
            _ => format!(
                "https://ui-avatars.com/api/?name={}&background=random",
                encode_component(&self.full_name())
            ),
        }
    }

    /// Copy of this user with every field present in `updates` applied.
    pub fn with_updates(&self, updates: &UpdateUserRequest) -> User {
        let mut next = self.clone();
        if let Some(username) = &updates.username {
            next.username = username.clone();
        }
        if let Some(email) = &updates.email {
            next.email = email.clone();
        }
        if let Some(first_name) = &updates.first_name {
            next.first_name = first_name.clone();
        }
        if let Some(last_name) = &updates.last_name {
            next.last_name = last_name.clone();
        }
        if let Some(avatar) = &updates.avatar {
            next.avatar = Some(avatar.clone());
        }
        if let Some(role) = updates.role {
            next.role = role;
        }
        if let Some(is_active) = updates.is_active {
            next.is_active = is_active;
        }
        next
    }
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl CreateUserRequest {
    /// Every rule the request violates, in a fixed order. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !validate_username(&self.username) {
            errors.push(USERNAME_RULE.to_string());
        }
        if !validate_email(&self.email) {
            errors.push(EMAIL_RULE.to_string());
        }
        if self.first_name.trim().is_empty() {
            errors.push(FIRST_NAME_RULE.to_string());
        }
        if self.last_name.trim().is_empty() {
            errors.push(LAST_NAME_RULE.to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(PASSWORD_RULE.to_string());
        }
        errors
    }
}

/// Partial update; omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl ListQuery for UserListParams {
    fn merged(&self, overrides: &Self) -> Self {
        Self {
            page: overrides.page.or(self.page),
            limit: overrides.limit.or(self.limit),
            role: overrides.role.or(self.role),
            search: overrides.search.clone().or_else(|| self.search.clone()),
            is_active: overrides.is_active.or(self.is_active),
        }
    }

    fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            query.append_pair("page", &page.to_string());
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(role) = self.role {
            query.append_pair("role", role.as_str());
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.append_pair("search", search);
        }
        if let Some(is_active) = self.is_active {
            query.append_pair("isActive", &is_active.to_string());
        }
        query.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateUserRequest {
        CreateUserRequest {
            username: "ada_lovelace".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "engine".to_string(),
            role: None,
        }
    }

    fn user() -> User {
        serde_json::from_str(
            r#"{"id":"u1","username":"ada","email":"ada@example.com","firstName":"Ada",
                "lastName":"Lovelace","role":"moderator","isActive":true,
                "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z"}"#,
        )
        .unwrap()
    }

    #[test]
    fn valid_request_has_no_violations() {
        assert!(valid_request().validate().is_empty());
    }

    #[test]
    fn each_single_violation_reports_exactly_one_message() {
        fn short_username(r: &mut CreateUserRequest) {
            r.username = "ab".to_string();
        }
        fn spaced_username(r: &mut CreateUserRequest) {
            r.username = "has space".to_string();
        }
        fn bad_email(r: &mut CreateUserRequest) {
            r.email = "not-an-email".to_string();
        }
        fn blank_first_name(r: &mut CreateUserRequest) {
            r.first_name = "   ".to_string();
        }
        fn empty_last_name(r: &mut CreateUserRequest) {
            r.last_name = String::new();
        }
        fn short_password(r: &mut CreateUserRequest) {
            r.password = "12345".to_string();
        }

        let cases: [(fn(&mut CreateUserRequest), &str); 6] = [
            (short_username, USERNAME_RULE),
            (spaced_username, USERNAME_RULE),
            (bad_email, EMAIL_RULE),
            (blank_first_name, FIRST_NAME_RULE),
            (empty_last_name, LAST_NAME_RULE),
            (short_password, PASSWORD_RULE),
        ];
        for (mutate, expected) in cases {
            let mut req = valid_request();
            mutate(&mut req);
            assert_eq!(req.validate(), vec![expected.to_string()]);
        }
    }

    #[test]
    fn username_pattern_bounds() {
        assert!(validate_username("abc"));
        assert!(validate_username("a_very_long_name_20c"));
        assert!(!validate_username("a_very_long_name_21ch"));
        assert!(!validate_username("dash-name"));
    }

    #[test]
    fn derived_fields_follow_record() {
        let u = user();
        assert_eq!(u.full_name(), "Ada Lovelace");
        assert_eq!(u.display_name(), "ada");
        assert!(u.is_moderator());
        assert!(!u.is_admin());
        assert!(u.can_moderate());
        assert!(u.avatar_url().starts_with("https://ui-avatars.com/api/?name=Ada+Lovelace"));
    }

    #[test]
    fn display_name_falls_back_to_full_name() {
        let mut u = user();
        u.username.clear();
        assert_eq!(u.display_name(), "Ada Lovelace");
    }

    #[test]
    fn with_updates_leaves_original_untouched() {
        let original = user();
        let updated = original.with_updates(&UpdateUserRequest {
            email: Some("new@example.com".to_string()),
            is_active: Some(false),
            ..Default::default()
        });
        assert_eq!(updated.email, "new@example.com");
        assert!(!updated.is_active);
        assert_eq!(original, user());
    }

    #[test]
    fn record_serializes_back_to_the_same_json() {
        let u = user();
        let json = serde_json::to_value(&u).unwrap();
        let back: User = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, u);
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["role"], "moderator");
        assert!(json.get("avatar").is_none());
    }

    #[test]
    fn list_params_merge_and_encode() {
        let base = UserListParams {
            page: Some(1),
            limit: Some(10),
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        let merged = base.merged(&UserListParams {
            page: Some(3),
            search: Some("a b".to_string()),
            ..Default::default()
        });
        assert_eq!(merged.page, Some(3));
        assert_eq!(merged.role, Some(UserRole::Admin));
        assert_eq!(merged.to_query(), "page=3&limit=10&role=admin&search=a+b");
        assert_eq!(UserListParams::default().to_query(), "");
    }
}
