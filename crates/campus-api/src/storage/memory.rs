// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Provides a Postgres-compatible API backed by in-memory HashMaps, allowing
// the server to run without a database for development and tests. Uniqueness
// checks happen inside the write-lock section, which makes them atomic with
// the insert - the same guarantee the UNIQUE constraints give in Postgres.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::error::{StorageError, StorageResult};
use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    accounts: RwLock<HashMap<Uuid, AccountRow>>,
    students: RwLock<HashMap<Uuid, StudentRow>>,
    teachers: RwLock<HashMap<Uuid, TeacherRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Accounts
    // ============================================

    pub async fn create_account(&self, input: CreateAccountRow) -> StorageResult<AccountRow> {
        let mut accounts = self.accounts.write();
        if accounts.values().any(|a| a.email == input.email) {
            return Err(StorageError::DuplicateEmail);
        }

        let now = Self::now();
        let id = Uuid::now_v7();
        let row = AccountRow {
            id,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            first_name: input.first_name,
            last_name: input.last_name,
            photo: input.photo,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_account_by_email(&self, email: &str) -> StorageResult<Option<AccountRow>> {
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    pub async fn get_account(&self, id: Uuid) -> StorageResult<Option<AccountRow>> {
        Ok(self.accounts.read().get(&id).cloned())
    }

    pub async fn delete_account(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.accounts.write().remove(&id).is_some())
    }

    pub async fn count_accounts(&self) -> StorageResult<i64> {
        Ok(self.accounts.read().len() as i64)
    }

    // ============================================
    // Students
    // ============================================

    pub async fn create_student(&self, input: CreateStudentRow) -> StorageResult<StudentRow> {
        let mut students = self.students.write();
        if students.values().any(|s| s.email == input.email) {
            return Err(StorageError::DuplicateEmail);
        }

        let id = Uuid::now_v7();
        let row = StudentRow {
            id,
            account_id: input.account_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            photo: input.photo,
            gender: input.gender,
            created_at: Self::now(),
        };
        students.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_student(&self, id: Uuid) -> StorageResult<Option<StudentRow>> {
        Ok(self.students.read().get(&id).cloned())
    }

    pub async fn list_students(&self, limit: i64, offset: i64) -> StorageResult<Vec<StudentRow>> {
        let students = self.students.read();
        let mut result: Vec<_> = students.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    pub async fn update_student(
        &self,
        id: Uuid,
        input: UpdateStudent,
    ) -> StorageResult<Option<StudentRow>> {
        let mut students = self.students.write();
        if let Some(student) = students.get_mut(&id) {
            if let Some(first_name) = input.first_name {
                student.first_name = first_name;
            }
            if let Some(last_name) = input.last_name {
                student.last_name = last_name;
            }
            if let Some(photo) = input.photo {
                student.photo = Some(photo);
            }
            if let Some(gender) = input.gender {
                student.gender = Some(gender);
            }
            return Ok(Some(student.clone()));
        }
        Ok(None)
    }

    pub async fn delete_student(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.students.write().remove(&id).is_some())
    }

    pub async fn count_students(&self) -> StorageResult<i64> {
        Ok(self.students.read().len() as i64)
    }

    pub async fn count_students_by_gender(&self) -> StorageResult<Vec<GenderCountRow>> {
        let students = self.students.read();
        let mut tallies: HashMap<Option<String>, i64> = HashMap::new();
        for student in students.values() {
            *tallies.entry(student.gender.clone()).or_default() += 1;
        }
        let mut rows: Vec<_> = tallies
            .into_iter()
            .map(|(gender, count)| GenderCountRow { gender, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    // ============================================
    // Teachers
    // ============================================

    pub async fn create_teacher(&self, input: CreateTeacherRow) -> StorageResult<TeacherRow> {
        let mut teachers = self.teachers.write();
        if teachers.values().any(|t| t.email == input.email) {
            return Err(StorageError::DuplicateEmail);
        }

        let id = Uuid::now_v7();
        let row = TeacherRow {
            id,
            account_id: input.account_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            photo: input.photo,
            gender: input.gender,
            created_at: Self::now(),
        };
        teachers.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_teacher(&self, id: Uuid) -> StorageResult<Option<TeacherRow>> {
        Ok(self.teachers.read().get(&id).cloned())
    }

    pub async fn list_teachers(&self, limit: i64, offset: i64) -> StorageResult<Vec<TeacherRow>> {
        let teachers = self.teachers.read();
        let mut result: Vec<_> = teachers.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    pub async fn update_teacher(
        &self,
        id: Uuid,
        input: UpdateTeacher,
    ) -> StorageResult<Option<TeacherRow>> {
        let mut teachers = self.teachers.write();
        if let Some(teacher) = teachers.get_mut(&id) {
            if let Some(first_name) = input.first_name {
                teacher.first_name = first_name;
            }
            if let Some(last_name) = input.last_name {
                teacher.last_name = last_name;
            }
            if let Some(photo) = input.photo {
                teacher.photo = Some(photo);
            }
            if let Some(gender) = input.gender {
                teacher.gender = Some(gender);
            }
            return Ok(Some(teacher.clone()));
        }
        Ok(None)
    }

    pub async fn delete_teacher(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.teachers.write().remove(&id).is_some())
    }

    pub async fn count_teachers(&self) -> StorageResult<i64> {
        Ok(self.teachers.read().len() as i64)
    }
}
