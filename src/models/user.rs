use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    Active,
    Graduated,
    Dropped,
}

impl StudentStatus {
    pub fn parse(s: &str) -> Option<StudentStatus> {
        match s {
            "Active" => Some(StudentStatus::Active),
            "Graduated" => Some(StudentStatus::Graduated),
            "Dropped" => Some(StudentStatus::Dropped),
            _ => None,
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentStatus::Active => write!(f, "Active"),
            StudentStatus::Graduated => write!(f, "Graduated"),
            StudentStatus::Dropped => write!(f, "Dropped"),
        }
    }
}

/// User record as owned by the backend. The client only ever holds a cached
/// copy; staleness is bounded by explicit refetches.
///
/// `course_of_study`, `enrollment_year` and `status` apply to students only
/// and are `None` for admin accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub course_of_study: Option<String>,
    #[serde(default)]
    pub enrollment_year: Option<i32>,
    #[serde(default)]
    pub status: Option<StudentStatus>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
