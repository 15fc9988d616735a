use crate::models::user::{Role, StudentStatus, UserRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload. `course_of_study` and `enrollment_year` are
/// serialized as null for admin accounts; the backend treats null and absent
/// the same way here.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
    pub course_of_study: Option<String>,
    pub enrollment_year: Option<i32>,
}

/// `{token, user}` returned by login and register.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub struct StudentsResponse {
    pub students: Vec<UserRecord>,
}

/// Partial profile update; absent fields are left untouched by the backend.
#[derive(Debug, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_year: Option<i32>,
}

/// Create/update payload for admin CRUD over student records.
///
/// On update the password is omitted entirely when blank so the backend keeps
/// the current one.
#[derive(Debug, Serialize)]
pub struct StudentPayload {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub course_of_study: String,
    pub enrollment_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StudentStatus>,
}

impl StudentPayload {
    /// Normalize a possibly-blank password into the omit-when-blank form.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = if password.is_empty() {
            None
        } else {
            Some(password.to_string())
        };
        self
    }
}

#[derive(Debug, Serialize)]
pub struct RoleChange {
    pub role: Role,
}
