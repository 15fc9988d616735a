use crate::models::user::UserRecord;

pub const LOADING: &str = "Loading session...";
pub const LOGIN_REQUIRED: &str = "You are not logged in. Use: login <email> <password>";
pub const ACCESS_DENIED: &str = "Access denied. You don't have permission to perform this action.";

pub fn help_text() -> String {
    [
        "Commands:",
        "  login <email> <password>",
        "  register <role> <full_name> <email> <password> <confirm> [<course> <year>] [phone]",
        "  logout",
        "  whoami",
        "  profile                          show your profile (refetched)",
        "  profile set <field> <value>      field: name|email|phone|course|year",
        "  students                         list all students (admin)",
        "  student show <id>                (admin)",
        "  student add <full_name> <email> <password> <course> <year> [phone]   (admin)",
        "  student edit <id> <field> <value>   field: name|email|phone|course|year|status|password (admin)",
        "  student rm <id>                  (admin)",
        "  student role <id> <role>         (admin)",
        "  help, quit",
        "",
        "Quote multi-word values: student add \"Ada Lovelace\" ada@x.edu pw Maths 2025",
    ]
    .join("\n")
}

pub fn format_user(user: &UserRecord) -> String {
    let mut lines = vec![
        format!("Name:   {}", user.full_name),
        format!("Email:  {}", user.email),
        format!("Role:   {}", user.role),
    ];

    if let Some(phone) = &user.phone {
        lines.push(format!("Phone:  {phone}"));
    }
    if let Some(course) = &user.course_of_study {
        lines.push(format!("Course: {course}"));
    }
    if let Some(year) = user.enrollment_year {
        lines.push(format!("Year:   {year}"));
    }
    if let Some(status) = user.status {
        lines.push(format!("Status: {status}"));
    }

    lines.join("\n")
}

pub fn format_students(students: &[UserRecord]) -> String {
    if students.is_empty() {
        return "No students found.".to_string();
    }

    let mut lines = vec![format!(
        "{:<10} {:<24} {:<28} {:<18} {:<6} {}",
        "ID", "NAME", "EMAIL", "COURSE", "YEAR", "STATUS"
    )];

    for s in students {
        lines.push(format!(
            "{:<10} {:<24} {:<28} {:<18} {:<6} {}",
            s.id,
            s.full_name,
            s.email,
            s.course_of_study.as_deref().unwrap_or("-"),
            s.enrollment_year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            s.status.map(|st| st.to_string()).unwrap_or_else(|| "-".to_string()),
        ));
    }

    lines.join("\n")
}
