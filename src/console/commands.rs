use crate::access::gate::RouteGuard;
use crate::models::user::Role;

/// Console commands, each declaring its access requirements up front so the
/// dispatcher can run every request through the access gate before any work
/// happens.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Login {
        email: String,
        password: String,
    },
    Register {
        role: Role,
        full_name: String,
        email: String,
        password: String,
        confirm_password: String,
        course_of_study: Option<String>,
        enrollment_year: Option<i32>,
        phone: Option<String>,
    },
    Logout,
    Whoami,
    ShowProfile,
    SetProfileField {
        field: String,
        value: String,
    },
    ListStudents,
    ShowStudent {
        id: String,
    },
    AddStudent {
        full_name: String,
        email: String,
        password: String,
        course_of_study: String,
        enrollment_year: i32,
        phone: Option<String>,
    },
    EditStudent {
        id: String,
        field: String,
        value: String,
    },
    RemoveStudent {
        id: String,
    },
    ChangeRole {
        id: String,
        role: Role,
    },
}

impl Command {
    pub fn guard(&self) -> RouteGuard {
        match self {
            Command::Help | Command::Quit | Command::Login { .. } | Command::Register { .. } => {
                RouteGuard::PUBLIC
            }
            Command::Logout
            | Command::Whoami
            | Command::ShowProfile
            | Command::SetProfileField { .. } => RouteGuard::PROTECTED,
            Command::ListStudents
            | Command::ShowStudent { .. }
            | Command::AddStudent { .. }
            | Command::EditStudent { .. }
            | Command::RemoveStudent { .. }
            | Command::ChangeRole { .. } => RouteGuard::ADMIN,
        }
    }
}

/// Split a command line into tokens, honoring double quotes so full names can
/// contain spaces: `student add "Ada Lovelace" ada@x.edu pw Maths 2025`.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                if in_quotes {
                    tokens.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let tokens = tokenize(line);
    let mut args = tokens.iter().map(String::as_str);

    let Some(head) = args.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = args.collect();

    let command = match (head, rest.as_slice()) {
        ("help", []) => Command::Help,
        ("quit", []) | ("exit", []) => Command::Quit,

        ("login", [email, password]) => Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ("login", _) => return Err("Usage: login <email> <password>".to_string()),

        ("register", [role, full_name, email, password, confirm, tail @ ..]) => {
            let role =
                Role::parse(role).ok_or("Role must be 'student' or 'admin'".to_string())?;
            let (course_of_study, enrollment_year, phone) = match (role, tail) {
                (Role::Student, [course, year, phone @ ..]) => {
                    let year: i32 = year
                        .parse()
                        .map_err(|_| "Enrollment year must be a number".to_string())?;
                    (
                        Some(course.to_string()),
                        Some(year),
                        phone.first().map(|p| p.to_string()),
                    )
                }
                (Role::Student, _) => {
                    return Err(
                        "Usage: register student <full_name> <email> <password> <confirm> <course> <year> [phone]"
                            .to_string(),
                    )
                }
                (Role::Admin, phone) => (None, None, phone.first().map(|p| p.to_string())),
            };

            Command::Register {
                role,
                full_name: full_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm.to_string(),
                course_of_study,
                enrollment_year,
                phone,
            }
        }
        ("register", _) => {
            return Err(
                "Usage: register <role> <full_name> <email> <password> <confirm> [<course> <year>] [phone]"
                    .to_string(),
            )
        }

        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::Whoami,

        ("profile", []) => Command::ShowProfile,
        ("profile", ["set", field, value]) => Command::SetProfileField {
            field: field.to_string(),
            value: value.to_string(),
        },
        ("profile", _) => return Err("Usage: profile | profile set <field> <value>".to_string()),

        ("students", []) => Command::ListStudents,

        ("student", ["show", id]) => Command::ShowStudent { id: id.to_string() },
        ("student", ["add", full_name, email, password, course, year, tail @ ..]) => {
            let enrollment_year: i32 = year
                .parse()
                .map_err(|_| "Enrollment year must be a number".to_string())?;
            Command::AddStudent {
                full_name: full_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                course_of_study: course.to_string(),
                enrollment_year,
                phone: tail.first().map(|p| p.to_string()),
            }
        }
        ("student", ["edit", id, field, value]) => Command::EditStudent {
            id: id.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        },
        ("student", ["rm", id]) => Command::RemoveStudent { id: id.to_string() },
        ("student", ["role", id, role]) => Command::ChangeRole {
            id: id.to_string(),
            role: Role::parse(role).ok_or("Role must be 'student' or 'admin'".to_string())?,
        },
        ("student", _) => {
            return Err(
                "Usage: student show|add|edit|rm|role ... (see 'help' for details)".to_string(),
            )
        }

        _ => return Err(format!("Unknown command '{head}'. Try 'help'.")),
    };

    Ok(Some(command))
}
