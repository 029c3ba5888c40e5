// Storage row types
//
// Row structs mirror the table layout; Create*/Update* structs are the write
// inputs. Roles are stored as text and parsed back through the closed enum.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Credential record row (accounts table)
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct CreateAccountRow {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
}

/// Student profile row (students table)
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a student profile
#[derive(Debug, Clone)]
pub struct CreateStudentRow {
    pub account_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo: Option<String>,
    pub gender: Option<String>,
}

/// Partial update for a student profile
#[derive(Debug, Clone, Default)]
pub struct UpdateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub gender: Option<String>,
}

/// Teacher profile row (teachers table)
#[derive(Debug, Clone, FromRow)]
pub struct TeacherRow {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a teacher profile
#[derive(Debug, Clone)]
pub struct CreateTeacherRow {
    pub account_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo: Option<String>,
    pub gender: Option<String>,
}

/// Partial update for a teacher profile
#[derive(Debug, Clone, Default)]
pub struct UpdateTeacher {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub gender: Option<String>,
}

/// Per-gender student tally for the dashboard counts
#[derive(Debug, Clone, FromRow)]
pub struct GenderCountRow {
    pub gender: Option<String>,
    pub count: i64,
}
