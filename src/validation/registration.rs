use crate::models::requests::RegisterRequest;
use crate::models::user::Role;
use thiserror::Error;

/// Client-side validation failures. These block submission locally; a form
/// that fails here never produces a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("{0} is required")]
    MissingField(&'static str),
}

impl From<ValidationError> for crate::core::error::ApiError {
    fn from(err: ValidationError) -> Self {
        crate::core::error::ApiError::Validation(err.to_string())
    }
}

/// Raw registration form as entered in the console.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub course_of_study: Option<String>,
    pub enrollment_year: Option<i32>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingField("Full name"));
        }

        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("Email"));
        }

        // Mismatch is reported before length, matching what users see first
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        if self.password.chars().count() < 6 {
            return Err(ValidationError::PasswordTooShort);
        }

        if self.role == Role::Student {
            if self.course_of_study.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err(ValidationError::MissingField("Course of study"));
            }
            if self.enrollment_year.is_none() {
                return Err(ValidationError::MissingField("Enrollment year"));
            }
        }

        Ok(())
    }

    /// Validate, then build the wire request. Student-only fields are sent
    /// only for students; admins get both as absent rather than empty.
    pub fn into_request(self) -> Result<RegisterRequest, ValidationError> {
        self.validate()?;

        let (course_of_study, enrollment_year) = match self.role {
            Role::Student => (self.course_of_study, self.enrollment_year),
            Role::Admin => (None, None),
        };

        Ok(RegisterRequest {
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            password: self.password,
            role: self.role,
            course_of_study,
            enrollment_year,
        })
    }
}
