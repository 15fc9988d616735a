//! In-process stub of the student-management REST backend, used by the
//! client and session tests. Speaks just enough of the contract: bearer
//! tokens, 401 on bad/revoked tokens, 403 for non-admins on /students.

use crate::models::user::{Role, StudentStatus, UserRecord};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub struct StoredUser {
    pub password: String,
    pub record: UserRecord,
}

#[derive(Default)]
pub struct StubState {
    users: Mutex<HashMap<String, StoredUser>>,
    tokens: Mutex<HashMap<String, String>>,
    next_id: AtomicU64,
}

impl StubState {
    pub fn seed_user(&self, record: UserRecord, password: &str) {
        self.users.lock().unwrap().insert(
            record.id.clone(),
            StoredUser {
                password: password.to_string(),
                record,
            },
        );
    }

    pub fn issue_token(&self, user_id: &str) -> String {
        let token = format!("tok-{}-{}", user_id, self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user_id.to_string());
        token
    }

    /// Simulate server-side session invalidation; the next authenticated
    /// request gets a 401.
    pub fn revoke_all_tokens(&self) {
        self.tokens.lock().unwrap().clear();
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn user_record(&self, user_id: &str) -> Option<UserRecord> {
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .map(|u| u.record.clone())
    }

    fn authenticate(&self, headers: &HeaderMap) -> Option<UserRecord> {
        let auth = headers.get("authorization")?.to_str().ok()?;
        let token = auth.strip_prefix("Bearer ")?;
        let user_id = self.tokens.lock().unwrap().get(token)?.clone();
        self.user_record(&user_id)
    }

    fn fresh_id(&self) -> String {
        format!("u{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState::default());

        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/logout", post(logout))
            .route("/api/users/profile", get(get_profile).put(update_profile))
            .route("/api/students", get(list_students).post(create_student))
            .route(
                "/api/students/{id}",
                get(get_student).put(update_student).delete(delete_student),
            )
            .route("/api/students/{id}/role", put(change_role))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub backend serve");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }
}

pub fn sample_student(id: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        full_name: format!("Student {id}"),
        email: format!("{id}@example.edu"),
        role: Role::Student,
        phone: None,
        course_of_study: Some("Physics".to_string()),
        enrollment_year: Some(2024),
        status: Some(StudentStatus::Active),
    }
}

pub fn sample_admin(id: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        full_name: format!("Admin {id}"),
        email: format!("{id}@example.edu"),
        role: Role::Admin,
        phone: None,
        course_of_study: None,
        enrollment_year: None,
        status: None,
    }
}

type Reply = (StatusCode, Json<Value>);

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Not authorized"})),
    )
}

fn forbidden() -> Reply {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"message": "Admin access required"})),
    )
}

fn not_found() -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Student not found"})),
    )
}

fn str_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

async fn login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Reply {
    let email = str_field(&body, "email").unwrap_or_default();
    let password = str_field(&body, "password").unwrap_or_default();

    let user_id = state.users.lock().unwrap().values().find_map(|u| {
        (u.record.email == email && u.password == password).then(|| u.record.id.clone())
    });

    match user_id {
        Some(id) => {
            let token = state.issue_token(&id);
            let user = state.user_record(&id).unwrap();
            (
                StatusCode::OK,
                Json(json!({"token": token, "user": user})),
            )
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        ),
    }
}

async fn register(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Reply {
    let email = str_field(&body, "email").unwrap_or_default();

    let taken = state
        .users
        .lock()
        .unwrap()
        .values()
        .any(|u| u.record.email == email);
    if taken {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Email already registered"})),
        );
    }

    let role = str_field(&body, "role")
        .and_then(|r| Role::parse(&r))
        .unwrap_or(Role::Student);

    let record = UserRecord {
        id: state.fresh_id(),
        full_name: str_field(&body, "full_name").unwrap_or_default(),
        email,
        role,
        phone: str_field(&body, "phone"),
        course_of_study: str_field(&body, "course_of_study"),
        enrollment_year: body
            .get("enrollment_year")
            .and_then(Value::as_i64)
            .map(|y| y as i32),
        status: (role == Role::Student).then_some(StudentStatus::Active),
    };

    let password = str_field(&body, "password").unwrap_or_default();
    state.seed_user(record.clone(), &password);
    let token = state.issue_token(&record.id);

    (
        StatusCode::CREATED,
        Json(json!({"token": token, "user": record})),
    )
}

async fn logout(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"message": "Logged out"})))
}

async fn get_profile(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    match state.authenticate(&headers) {
        Some(user) => (StatusCode::OK, Json(json!(user))),
        None => unauthorized(),
    }
}

async fn update_profile(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let Some(user) = state.authenticate(&headers) else {
        return unauthorized();
    };

    let mut users = state.users.lock().unwrap();
    let stored = users.get_mut(&user.id).unwrap();
    apply_fields(&mut stored.record, &body);

    (StatusCode::OK, Json(json!(stored.record)))
}

async fn list_students(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    match state.authenticate(&headers) {
        Some(user) if user.is_admin() => {
            let students: Vec<UserRecord> = state
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| u.record.role == Role::Student)
                .map(|u| u.record.clone())
                .collect();
            (StatusCode::OK, Json(json!({"students": students})))
        }
        Some(_) => forbidden(),
        None => unauthorized(),
    }
}

async fn create_student(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    match state.authenticate(&headers) {
        Some(user) if user.is_admin() => {}
        Some(_) => return forbidden(),
        None => return unauthorized(),
    }

    let record = UserRecord {
        id: state.fresh_id(),
        full_name: str_field(&body, "full_name").unwrap_or_default(),
        email: str_field(&body, "email").unwrap_or_default(),
        role: Role::Student,
        phone: str_field(&body, "phone"),
        course_of_study: str_field(&body, "course_of_study"),
        enrollment_year: body
            .get("enrollment_year")
            .and_then(Value::as_i64)
            .map(|y| y as i32),
        status: Some(StudentStatus::Active),
    };

    let password = str_field(&body, "password").unwrap_or_default();
    state.seed_user(record.clone(), &password);

    (StatusCode::CREATED, Json(json!(record)))
}

async fn get_student(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    match state.authenticate(&headers) {
        Some(user) if user.is_admin() => match state.user_record(&id) {
            Some(record) => (StatusCode::OK, Json(json!(record))),
            None => not_found(),
        },
        Some(_) => forbidden(),
        None => unauthorized(),
    }
}

async fn update_student(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    match state.authenticate(&headers) {
        Some(user) if user.is_admin() => {}
        Some(_) => return forbidden(),
        None => return unauthorized(),
    }

    let mut users = state.users.lock().unwrap();
    let Some(stored) = users.get_mut(&id) else {
        return not_found();
    };

    apply_fields(&mut stored.record, &body);
    if let Some(password) = str_field(&body, "password") {
        stored.password = password;
    }

    (StatusCode::OK, Json(json!(stored.record)))
}

async fn delete_student(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    match state.authenticate(&headers) {
        Some(user) if user.is_admin() => {}
        Some(_) => return forbidden(),
        None => return unauthorized(),
    }

    if state.users.lock().unwrap().remove(&id).is_none() {
        return not_found();
    }
    (StatusCode::OK, Json(json!({"message": "Student deleted"})))
}

async fn change_role(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    match state.authenticate(&headers) {
        Some(user) if user.is_admin() => {}
        Some(_) => return forbidden(),
        None => return unauthorized(),
    }

    let Some(role) = str_field(&body, "role").and_then(|r| Role::parse(&r)) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid role"})),
        );
    };

    let mut users = state.users.lock().unwrap();
    let Some(stored) = users.get_mut(&id) else {
        return not_found();
    };
    stored.record.role = role;

    (StatusCode::OK, Json(json!({"message": "Role updated"})))
}

fn apply_fields(record: &mut UserRecord, body: &Value) {
    if let Some(full_name) = str_field(body, "full_name") {
        record.full_name = full_name;
    }
    if let Some(email) = str_field(body, "email") {
        record.email = email;
    }
    if let Some(phone) = str_field(body, "phone") {
        record.phone = Some(phone);
    }
    if let Some(course) = str_field(body, "course_of_study") {
        record.course_of_study = Some(course);
    }
    if let Some(year) = body.get("enrollment_year").and_then(Value::as_i64) {
        record.enrollment_year = Some(year as i32);
    }
    if let Some(status) = str_field(body, "status").and_then(|s| StudentStatus::parse(&s)) {
        record.status = Some(status);
    }
}
