// Auth service: the one rollback-safe implementation of register and login
//
// Every entry point goes through this service, so the
// check-hash-persist-profile-token sequence exists exactly once. Duplicate
// detection rides on the storage layer's unique constraint rather than a
// read-then-write check, which closes the race between two concurrent
// registrations for the same email.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use campus_core::{Account, Role};

use super::jwt::TokenService;
use super::password::{hash_password, verify_password};
use crate::storage::{
    AccountRow, CreateAccountRow, CreateStudentRow, CreateTeacherRow, StorageBackend, StorageError,
};

/// Terminal failures of the register/login flows
#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// Registration with an email already held by an account or profile
    #[error("an account with this email already exists")]
    DuplicateAccount,

    /// Login email unknown
    #[error("account not found")]
    AccountNotFound,

    /// Password mismatch
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Storage-layer failure; for registration this has already triggered the
    /// compensating account delete by the time it surfaces
    #[error("storage failure")]
    Persistence(#[source] StorageError),

    /// Hashing or token issuance failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registration input, role plus the identity fields shared with the profile
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub gender: Option<String>,
}

pub struct AuthService {
    db: StorageBackend,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(db: StorageBackend, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }

    /// Register a new account. Student and teacher roles also get a linked
    /// profile record; if that second step fails, the just-created account is
    /// deleted before the error surfaces, so either both records exist or
    /// neither does.
    pub async fn register(&self, input: RegisterInput) -> Result<(Account, String), AuthFlowError> {
        let password_hash = hash_password(&input.password)?;

        let account = self
            .db
            .create_account(CreateAccountRow {
                email: input.email.clone(),
                password_hash,
                role: input.role.to_string(),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                photo: input.photo.clone(),
            })
            .await
            .map_err(|e| match e {
                StorageError::DuplicateEmail => AuthFlowError::DuplicateAccount,
                other => AuthFlowError::Persistence(other),
            })?;

        if let Err(err) = self.create_linked_profile(&input, account.id).await {
            // Compensating delete: never leave an orphaned credential behind.
            // The original error is what surfaces; a failed rollback is logged
            // so operators can reconcile by hand.
            if let Err(rollback_err) = self.db.delete_account(account.id).await {
                tracing::error!(
                    account_id = %account.id,
                    error = %rollback_err,
                    "rollback of orphaned account failed after profile creation error"
                );
            } else {
                tracing::warn!(
                    account_id = %account.id,
                    "registration rolled back after profile creation failure"
                );
            }
            return Err(match err {
                StorageError::DuplicateEmail => AuthFlowError::DuplicateAccount,
                other => AuthFlowError::Persistence(other),
            });
        }

        let token = self
            .tokens
            .issue(account.id, &account.email, input.role)?;

        Ok((Self::row_to_account(account, input.role), token))
    }

    /// Authenticate against stored credentials and issue a token
    pub async fn login(&self, email: &str, password: &str) -> Result<(Account, String), AuthFlowError> {
        let account = self
            .db
            .get_account_by_email(email)
            .await
            .map_err(AuthFlowError::Persistence)?
            .ok_or(AuthFlowError::AccountNotFound)?;

        let valid = verify_password(password, &account.password_hash)?;
        if !valid {
            return Err(AuthFlowError::InvalidCredentials);
        }

        let role = Role::parse(&account.role)
            .ok_or_else(|| anyhow::anyhow!("stored role {:?} outside the closed set", account.role))?;

        let token = self.tokens.issue(account.id, &account.email, role)?;

        Ok((Self::row_to_account(account, role), token))
    }

    /// Look up an account's public view by id
    pub async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AuthFlowError> {
        let row = self
            .db
            .get_account(id)
            .await
            .map_err(AuthFlowError::Persistence)?;

        match row {
            Some(row) => {
                let role = Role::parse(&row.role).ok_or_else(|| {
                    anyhow::anyhow!("stored role {:?} outside the closed set", row.role)
                })?;
                Ok(Some(Self::row_to_account(row, role)))
            }
            None => Ok(None),
        }
    }

    /// Create the profile record a student/teacher registration is linked to.
    /// Other roles have no linked profile.
    async fn create_linked_profile(
        &self,
        input: &RegisterInput,
        account_id: Uuid,
    ) -> Result<(), StorageError> {
        match input.role {
            Role::Student => {
                self.db
                    .create_student(CreateStudentRow {
                        account_id: Some(account_id),
                        first_name: input.first_name.clone(),
                        last_name: input.last_name.clone(),
                        email: input.email.clone(),
                        photo: input.photo.clone(),
                        gender: input.gender.clone(),
                    })
                    .await?;
            }
            Role::Teacher => {
                self.db
                    .create_teacher(CreateTeacherRow {
                        account_id: Some(account_id),
                        first_name: input.first_name.clone(),
                        last_name: input.last_name.clone(),
                        email: input.email.clone(),
                        photo: input.photo.clone(),
                        gender: input.gender.clone(),
                    })
                    .await?;
            }
            Role::Admin | Role::Parent => {}
        }
        Ok(())
    }

    fn row_to_account(row: AccountRow, role: Role) -> Account {
        Account {
            id: row.id,
            email: row.email,
            role,
            first_name: row.first_name,
            last_name: row.last_name,
            photo: row.photo,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::AuthConfig;

    fn service() -> AuthService {
        let config = AuthConfig::for_tests("unit-test-secret");
        AuthService::new(
            StorageBackend::in_memory(),
            Arc::new(TokenService::new(&config.jwt)),
        )
    }

    fn input(email: &str, role: Role) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            role,
            first_name: "Alice".to_string(),
            last_name: "Ngo".to_string(),
            photo: None,
            gender: Some("female".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_preserves_role() {
        let svc = service();
        let (account, token) = svc
            .register(input("alice@example.com", Role::Teacher))
            .await
            .unwrap();
        assert_eq!(account.role, Role::Teacher);
        assert!(!token.is_empty());

        let (account, _) = svc
            .login("alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(account.role, Role::Teacher);
        assert_eq!(account.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected_without_mutation() {
        let svc = service();
        svc.register(input("bob@example.com", Role::Parent))
            .await
            .unwrap();

        let err = svc
            .register(input("bob@example.com", Role::Parent))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFlowError::DuplicateAccount));

        assert_eq!(svc.db.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let svc = service();
        svc.register(input("carol@example.com", Role::Student))
            .await
            .unwrap();

        let err = svc
            .login("carol@example.com", "not-the-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFlowError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let svc = service();
        let err = svc.login("nobody@example.com", "whatever").await.unwrap_err();
        assert!(matches!(err, AuthFlowError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_student_registration_creates_linked_profile() {
        let svc = service();
        let (account, _) = svc
            .register(input("dana@example.com", Role::Student))
            .await
            .unwrap();

        assert_eq!(svc.db.count_students().await.unwrap(), 1);
        let students = svc.db.list_students(10, 0).await.unwrap();
        assert_eq!(students[0].account_id, Some(account.id));
        assert_eq!(students[0].email, "dana@example.com");
    }

    #[tokio::test]
    async fn test_profile_failure_rolls_back_account() {
        let svc = service();

        // Occupy the teacher profile email so the linked-profile step fails
        // after the account insert succeeds
        svc.db
            .create_teacher(CreateTeacherRow {
                account_id: None,
                first_name: "Prior".to_string(),
                last_name: "Teacher".to_string(),
                email: "erin@example.com".to_string(),
                photo: None,
                gender: None,
            })
            .await
            .unwrap();

        let err = svc
            .register(input("erin@example.com", Role::Teacher))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFlowError::DuplicateAccount));

        // Either both records exist or neither: the account must be gone
        assert_eq!(svc.db.count_accounts().await.unwrap(), 0);
        assert!(svc
            .db
            .get_account_by_email("erin@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_admin_registration_has_no_profile() {
        let svc = service();
        svc.register(input("frank@example.com", Role::Admin))
            .await
            .unwrap();

        assert_eq!(svc.db.count_students().await.unwrap(), 0);
        assert_eq!(svc.db.count_teachers().await.unwrap(), 0);
    }
}
