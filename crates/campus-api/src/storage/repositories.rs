// Repository layer for Postgres
//
// Email uniqueness on accounts, students, and teachers is enforced by UNIQUE
// constraints in the schema; inserts map violation 23505 to DuplicateEmail.
// Two concurrent registrations for the same email therefore cannot both
// succeed, regardless of any prior read-check in the service layer.

use sqlx::PgPool;
use uuid::Uuid;

use super::error::{StorageError, StorageResult};
use super::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run pending migrations
    pub async fn from_url(database_url: &str) -> StorageResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Accounts
    // ============================================

    pub async fn create_account(&self, input: CreateAccountRow) -> StorageResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, password_hash, role, first_name, last_name, photo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, role, first_name, last_name, photo, created_at, updated_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.photo)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(row)
    }

    pub async fn get_account_by_email(&self, email: &str) -> StorageResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, role, first_name, last_name, photo, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_account(&self, id: Uuid) -> StorageResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, role, first_name, last_name, photo, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Compensating delete used by the registration rollback
    pub async fn delete_account(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Students
    // ============================================

    pub async fn create_student(&self, input: CreateStudentRow) -> StorageResult<StudentRow> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (account_id, first_name, last_name, email, photo, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, first_name, last_name, email, photo, gender, created_at
            "#,
        )
        .bind(input.account_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.photo)
        .bind(&input.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(row)
    }

    pub async fn get_student(&self, id: Uuid) -> StorageResult<Option<StudentRow>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, account_id, first_name, last_name, email, photo, gender, created_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_students(&self, limit: i64, offset: i64) -> StorageResult<Vec<StudentRow>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, account_id, first_name, last_name, email, photo, gender, created_at
            FROM students
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_student(
        &self,
        id: Uuid,
        input: UpdateStudent,
    ) -> StorageResult<Option<StudentRow>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            UPDATE students
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                photo = COALESCE($4, photo),
                gender = COALESCE($5, gender)
            WHERE id = $1
            RETURNING id, account_id, first_name, last_name, email, photo, gender, created_at
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.photo)
        .bind(&input.gender)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_student(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_students(&self) -> StorageResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn count_students_by_gender(&self) -> StorageResult<Vec<GenderCountRow>> {
        let rows = sqlx::query_as::<_, GenderCountRow>(
            r#"
            SELECT gender, COUNT(*) AS count
            FROM students
            GROUP BY gender
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Teachers
    // ============================================

    pub async fn create_teacher(&self, input: CreateTeacherRow) -> StorageResult<TeacherRow> {
        let row = sqlx::query_as::<_, TeacherRow>(
            r#"
            INSERT INTO teachers (account_id, first_name, last_name, email, photo, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, first_name, last_name, email, photo, gender, created_at
            "#,
        )
        .bind(input.account_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.photo)
        .bind(&input.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(row)
    }

    pub async fn get_teacher(&self, id: Uuid) -> StorageResult<Option<TeacherRow>> {
        let row = sqlx::query_as::<_, TeacherRow>(
            r#"
            SELECT id, account_id, first_name, last_name, email, photo, gender, created_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_teachers(&self, limit: i64, offset: i64) -> StorageResult<Vec<TeacherRow>> {
        let rows = sqlx::query_as::<_, TeacherRow>(
            r#"
            SELECT id, account_id, first_name, last_name, email, photo, gender, created_at
            FROM teachers
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_teacher(
        &self,
        id: Uuid,
        input: UpdateTeacher,
    ) -> StorageResult<Option<TeacherRow>> {
        let row = sqlx::query_as::<_, TeacherRow>(
            r#"
            UPDATE teachers
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                photo = COALESCE($4, photo),
                gender = COALESCE($5, gender)
            WHERE id = $1
            RETURNING id, account_id, first_name, last_name, email, photo, gender, created_at
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.photo)
        .bind(&input.gender)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_teacher(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_teachers(&self) -> StorageResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teachers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn count_accounts(&self) -> StorageResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
