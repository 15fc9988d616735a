use crate::access::gate::{self, GateOutcome};
use crate::console::commands::{parse, Command};
use crate::console::render;
use crate::core::error::ApiError;
use crate::models::requests::{ProfileUpdate, StudentPayload};
use crate::models::user::{StudentStatus, UserRecord};
use crate::session::manager::SessionManager;
use crate::validation::registration::RegistrationForm;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Text(String),
    Quit,
    Silent,
}

/// The console view layer. Every command goes through the access gate before
/// it runs; the gate outcome decides whether the command body executes at all.
pub struct Console {
    session: SessionManager,
}

impl Console {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub async fn run(&self) -> Result<()> {
        self.session.initialize();

        println!("Student Management Console. Type 'help' for commands.");
        if let Some(user) = self.session.current_user() {
            println!("Signed in as {} ({})", user.full_name, user.role);
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break; // EOF
            };

            match self.handle_line(&line).await {
                Outcome::Text(text) => println!("{text}"),
                Outcome::Silent => {}
                Outcome::Quit => break,
            }
        }

        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Outcome {
        match parse(line) {
            Ok(None) => Outcome::Silent,
            Err(usage) => Outcome::Text(usage),
            Ok(Some(command)) => self.dispatch(command).await,
        }
    }

    async fn dispatch(&self, command: Command) -> Outcome {
        match gate::evaluate(&self.session.snapshot(), command.guard()) {
            GateOutcome::Loading => Outcome::Text(render::LOADING.to_string()),
            GateOutcome::RedirectToLogin => Outcome::Text(render::LOGIN_REQUIRED.to_string()),
            GateOutcome::Deny => Outcome::Text(render::ACCESS_DENIED.to_string()),
            GateOutcome::Render => self.execute(command).await,
        }
    }

    async fn execute(&self, command: Command) -> Outcome {
        match command {
            Command::Help => Outcome::Text(render::help_text()),
            Command::Quit => Outcome::Quit,

            Command::Login { email, password } => {
                match self.session.login(&email, &password).await {
                    Ok(user) => Outcome::Text(format!(
                        "Logged in as {} ({})",
                        user.full_name, user.role
                    )),
                    Err(e) => err_text(e),
                }
            }

            Command::Register {
                role,
                full_name,
                email,
                password,
                confirm_password,
                course_of_study,
                enrollment_year,
                phone,
            } => {
                let form = RegistrationForm {
                    full_name,
                    email,
                    phone,
                    password,
                    confirm_password,
                    role,
                    course_of_study,
                    enrollment_year,
                };
                match self.session.register(form).await {
                    Ok(user) => Outcome::Text(format!(
                        "Welcome, {}! You are registered as {}.",
                        user.full_name, user.role
                    )),
                    Err(e) => err_text(e),
                }
            }

            Command::Logout => {
                self.session.logout().await;
                Outcome::Text("Logged out.".to_string())
            }

            Command::Whoami => match self.session.current_user() {
                Some(user) => Outcome::Text(format!("{} ({})", user.full_name, user.role)),
                // Unreachable past the gate, but the command stays total
                None => Outcome::Text(render::LOGIN_REQUIRED.to_string()),
            },

            Command::ShowProfile => match self.session.refresh_profile().await {
                Ok(Some(user)) => Outcome::Text(render::format_user(&user)),
                Ok(None) => Outcome::Text("Session changed, profile not updated.".to_string()),
                Err(e) => err_text(e),
            },

            Command::SetProfileField { field, value } => {
                let mut update = ProfileUpdate::default();
                match field.as_str() {
                    "name" => update.full_name = Some(value),
                    "email" => update.email = Some(value),
                    "phone" => update.phone = Some(value),
                    "course" => update.course_of_study = Some(value),
                    "year" => match value.parse() {
                        Ok(year) => update.enrollment_year = Some(year),
                        Err(_) => {
                            return Outcome::Text("Enrollment year must be a number".to_string())
                        }
                    },
                    other => {
                        return Outcome::Text(format!(
                            "Unknown profile field '{other}'. Fields: name, email, phone, course, year"
                        ))
                    }
                }
                match self.session.update_profile(&update).await {
                    Ok(Some(user)) => Outcome::Text(render::format_user(&user)),
                    Ok(None) => Outcome::Text("Session changed, profile not updated.".to_string()),
                    Err(e) => err_text(e),
                }
            }

            Command::ListStudents => match self.session.api().list_students().await {
                Ok(students) => Outcome::Text(render::format_students(&students)),
                Err(e) => err_text(e),
            },

            Command::ShowStudent { id } => match self.session.api().get_student(&id).await {
                Ok(student) => Outcome::Text(render::format_user(&student)),
                Err(e) => err_text(e),
            },

            Command::AddStudent {
                full_name,
                email,
                password,
                course_of_study,
                enrollment_year,
                phone,
            } => {
                let payload = StudentPayload {
                    full_name,
                    email,
                    phone,
                    password: None,
                    course_of_study,
                    enrollment_year,
                    status: None,
                }
                .with_password(&password);

                match self.session.api().create_student(&payload).await {
                    Ok(student) => Outcome::Text(format!("Created student {}", student.id)),
                    Err(e) => err_text(e),
                }
            }

            Command::EditStudent { id, field, value } => {
                match self.edit_student(&id, &field, &value).await {
                    Ok(student) => Outcome::Text(render::format_user(&student)),
                    Err(e) => err_text(e),
                }
            }

            Command::RemoveStudent { id } => {
                match self.session.api().delete_student(&id).await {
                    Ok(()) => Outcome::Text("Student removed.".to_string()),
                    Err(e) => err_text(e),
                }
            }

            Command::ChangeRole { id, role } => {
                match self.session.api().change_role(&id, role).await {
                    Ok(()) => Outcome::Text(format!("Role changed to {role}.")),
                    Err(e) => err_text(e),
                }
            }
        }
    }

    /// Edit one field of a student record: fetch the current record, carry
    /// its other fields through, and leave the password untouched unless it
    /// is the field being set (blank passwords are never sent).
    async fn edit_student(
        &self,
        id: &str,
        field: &str,
        value: &str,
    ) -> Result<UserRecord, ApiError> {
        let current = self.session.api().get_student(id).await?;

        let mut payload = StudentPayload {
            full_name: current.full_name,
            email: current.email,
            phone: current.phone,
            password: None,
            course_of_study: current.course_of_study.unwrap_or_default(),
            enrollment_year: current.enrollment_year.unwrap_or_default(),
            status: current.status,
        };

        match field {
            "name" => payload.full_name = value.to_string(),
            "email" => payload.email = value.to_string(),
            "phone" => payload.phone = Some(value.to_string()),
            "course" => payload.course_of_study = value.to_string(),
            "year" => {
                payload.enrollment_year = value
                    .parse()
                    .map_err(|_| ApiError::Validation("Enrollment year must be a number".to_string()))?;
            }
            "password" => payload = payload.with_password(value),
            "status" => {
                payload.status = Some(StudentStatus::parse(value).ok_or_else(|| {
                    ApiError::Validation(
                        "Status must be Active, Graduated or Dropped".to_string(),
                    )
                })?);
            }
            other => {
                return Err(ApiError::Validation(format!(
                    "Unknown student field '{other}'. Fields: name, email, phone, course, year, status, password"
                )))
            }
        }

        self.session.api().update_student(id, &payload).await
    }
}

fn err_text(e: ApiError) -> Outcome {
    Outcome::Text(e.to_string())
}
