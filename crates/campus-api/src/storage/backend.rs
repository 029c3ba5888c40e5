// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// A unified StorageBackend that works with either Postgres (production) or
// the in-memory store (dev mode and tests).

use std::sync::Arc;
use uuid::Uuid;

use super::error::StorageResult;
use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either Postgres or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// Postgres database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a Postgres storage backend from a database URL
    pub async fn postgres(database_url: &str) -> StorageResult<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    // ============================================
    // Accounts
    // ============================================

    pub async fn create_account(&self, input: CreateAccountRow) -> StorageResult<AccountRow> {
        match self {
            Self::Postgres(db) => db.create_account(input).await,
            Self::InMemory(db) => db.create_account(input).await,
        }
    }

    pub async fn get_account_by_email(&self, email: &str) -> StorageResult<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.get_account_by_email(email).await,
            Self::InMemory(db) => db.get_account_by_email(email).await,
        }
    }

    pub async fn get_account(&self, id: Uuid) -> StorageResult<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.get_account(id).await,
            Self::InMemory(db) => db.get_account(id).await,
        }
    }

    pub async fn delete_account(&self, id: Uuid) -> StorageResult<bool> {
        match self {
            Self::Postgres(db) => db.delete_account(id).await,
            Self::InMemory(db) => db.delete_account(id).await,
        }
    }

    pub async fn count_accounts(&self) -> StorageResult<i64> {
        match self {
            Self::Postgres(db) => db.count_accounts().await,
            Self::InMemory(db) => db.count_accounts().await,
        }
    }

    // ============================================
    // Students
    // ============================================

    pub async fn create_student(&self, input: CreateStudentRow) -> StorageResult<StudentRow> {
        match self {
            Self::Postgres(db) => db.create_student(input).await,
            Self::InMemory(db) => db.create_student(input).await,
        }
    }

    pub async fn get_student(&self, id: Uuid) -> StorageResult<Option<StudentRow>> {
        match self {
            Self::Postgres(db) => db.get_student(id).await,
            Self::InMemory(db) => db.get_student(id).await,
        }
    }

    pub async fn list_students(&self, limit: i64, offset: i64) -> StorageResult<Vec<StudentRow>> {
        match self {
            Self::Postgres(db) => db.list_students(limit, offset).await,
            Self::InMemory(db) => db.list_students(limit, offset).await,
        }
    }

    pub async fn update_student(
        &self,
        id: Uuid,
        input: UpdateStudent,
    ) -> StorageResult<Option<StudentRow>> {
        match self {
            Self::Postgres(db) => db.update_student(id, input).await,
            Self::InMemory(db) => db.update_student(id, input).await,
        }
    }

    pub async fn delete_student(&self, id: Uuid) -> StorageResult<bool> {
        match self {
            Self::Postgres(db) => db.delete_student(id).await,
            Self::InMemory(db) => db.delete_student(id).await,
        }
    }

    pub async fn count_students(&self) -> StorageResult<i64> {
        match self {
            Self::Postgres(db) => db.count_students().await,
            Self::InMemory(db) => db.count_students().await,
        }
    }

    pub async fn count_students_by_gender(&self) -> StorageResult<Vec<GenderCountRow>> {
        match self {
            Self::Postgres(db) => db.count_students_by_gender().await,
            Self::InMemory(db) => db.count_students_by_gender().await,
        }
    }

    // ============================================
    // Teachers
    // ============================================

    pub async fn create_teacher(&self, input: CreateTeacherRow) -> StorageResult<TeacherRow> {
        match self {
            Self::Postgres(db) => db.create_teacher(input).await,
            Self::InMemory(db) => db.create_teacher(input).await,
        }
    }

    pub async fn get_teacher(&self, id: Uuid) -> StorageResult<Option<TeacherRow>> {
        match self {
            Self::Postgres(db) => db.get_teacher(id).await,
            Self::InMemory(db) => db.get_teacher(id).await,
        }
    }

    pub async fn list_teachers(&self, limit: i64, offset: i64) -> StorageResult<Vec<TeacherRow>> {
        match self {
            Self::Postgres(db) => db.list_teachers(limit, offset).await,
            Self::InMemory(db) => db.list_teachers(limit, offset).await,
        }
    }

    pub async fn update_teacher(
        &self,
        id: Uuid,
        input: UpdateTeacher,
    ) -> StorageResult<Option<TeacherRow>> {
        match self {
            Self::Postgres(db) => db.update_teacher(id, input).await,
            Self::InMemory(db) => db.update_teacher(id, input).await,
        }
    }

    pub async fn delete_teacher(&self, id: Uuid) -> StorageResult<bool> {
        match self {
            Self::Postgres(db) => db.delete_teacher(id).await,
            Self::InMemory(db) => db.delete_teacher(id).await,
        }
    }

    pub async fn count_teachers(&self) -> StorageResult<i64> {
        match self {
            Self::Postgres(db) => db.count_teachers().await,
            Self::InMemory(db) => db.count_teachers().await,
        }
    }
}
