//! Registration service - turns a valid registration form into an account.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use common::AppResult;
use domain::{CleanedRegistration, RegistrationForm, User, FIELD_USERNAME, MSG_USERNAME_TAKEN};

use crate::repository::UserRepository;

/// Registration use case.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create the account described by a bound form.
    ///
    /// Returns `Ok(None)` when the form is invalid, leaving its errors for
    /// the caller. That includes a username that turns out to be taken by
    /// the time the account is created, which is reported on the form's
    /// `username` field. Any other storage failure is returned as is.
    async fn save(&self, form: &mut RegistrationForm) -> AppResult<Option<User>>;
}

/// Repository-backed registration.
pub struct Registrar {
    repo: Arc<dyn UserRepository>,
}

impl Registrar {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn create_account(&self, cleaned: &CleanedRegistration) -> AppResult<User> {
        let mut user = self
            .repo
            .create_user(
                cleaned.username.clone(),
                cleaned.email.clone(),
                cleaned.password1.clone(),
            )
            .await?;
        user.set_names(cleaned.first_name.clone(), cleaned.last_name.clone());

        self.repo.save(&user).await
    }
}

#[async_trait]
impl RegistrationService for Registrar {
    async fn save(&self, form: &mut RegistrationForm) -> AppResult<Option<User>> {
        let cleaned = match form.cleaned_data() {
            Some(cleaned) if form.is_valid() => cleaned.clone(),
            _ => {
                debug!(
                    fields = ?form.errors().fields().collect::<Vec<_>>(),
                    "Registration rejected by validation"
                );
                return Ok(None);
            }
        };

        match self.create_account(&cleaned).await {
            Ok(user) => {
                info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(Some(user))
            }
            Err(err) => {
                // Duplicates are detected here rather than during validation,
                // since two submissions can race for the same name.
                if self.repo.find_by_username(&cleaned.username).await?.is_some() {
                    warn!(username = %cleaned.username, "Registration lost race for username");
                    form.set_field_errors(FIELD_USERNAME, vec![MSG_USERNAME_TAKEN.to_string()]);
                    Ok(None)
                } else {
                    error!(username = %cleaned.username, error = %err, "Registration failed");
                    Err(err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::AppError;
    use domain::{Password, RegistrationData, FIELD_PASSWORD2, MSG_PASSWORDS_MUST_MATCH};
    use mockall::predicate::eq;
    use uuid::Uuid;

    use crate::repository::MockUserRepository;

    fn valid_form() -> RegistrationForm {
        RegistrationForm::bind(RegistrationData {
            username: "jane".to_string(),
            password1: "s3cret".to_string(),
            password2: "s3cret".to_string(),
            email: "jane@Example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        })
    }

    fn stored_user(username: &str, email: &str, password: &str) -> User {
        let hash = Password::new(password).unwrap().into_string();
        User::new(Uuid::new_v4(), username.to_string(), email.to_string(), hash)
    }

    #[tokio::test]
    async fn test_save_creates_user_with_names() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .with(
                eq("jane".to_string()),
                eq("jane@example.com".to_string()),
                eq("s3cret".to_string()),
            )
            .times(1)
            .returning(|username, email, password| Ok(stored_user(&username, &email, &password)));
        repo.expect_save()
            .withf(|user| user.first_name == "Jane" && user.last_name == "Doe")
            .times(1)
            .returning(|user| Ok(user.clone()));
        repo.expect_find_by_username().never();

        let registrar = Registrar::new(Arc::new(repo));
        let mut form = valid_form();
        let user = registrar.save(&mut form).await.unwrap().unwrap();

        assert_eq!(user.username, "jane");
        assert_eq!(user.full_name(), "Jane Doe");
        assert!(user.check_password("s3cret"));
        assert!(form.is_valid());
    }

    #[tokio::test]
    async fn test_save_skips_invalid_form() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().never();
        repo.expect_save().never();
        repo.expect_find_by_username().never();

        let registrar = Registrar::new(Arc::new(repo));
        let mut form = RegistrationForm::bind(RegistrationData {
            password2: "other".to_string(),
            ..valid_form().data().clone()
        });

        let result = registrar.save(&mut form).await.unwrap();

        assert!(result.is_none());
        assert_eq!(
            form.errors().get(FIELD_PASSWORD2).unwrap(),
            [MSG_PASSWORDS_MUST_MATCH]
        );
    }

    #[tokio::test]
    async fn test_create_failure_with_existing_username_reports_taken() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .returning(|_, _, _| Err(AppError::internal("unique constraint violated")));
        repo.expect_save().never();
        repo.expect_find_by_username()
            .withf(|username| username.to_string() == "jane")
            .times(1)
            .returning(|username| {
                Ok(Some(stored_user(username, "other@example.com", "whatever")))
            });

        let registrar = Registrar::new(Arc::new(repo));
        let mut form = valid_form();
        let result = registrar.save(&mut form).await.unwrap();

        assert!(result.is_none());
        assert!(!form.is_valid());
        assert_eq!(form.errors().get(FIELD_USERNAME).unwrap(), [MSG_USERNAME_TAKEN]);
    }

    #[tokio::test]
    async fn test_create_failure_without_existing_user_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .returning(|_, _, _| Err(AppError::internal("disk full")));
        repo.expect_find_by_username().returning(|_| Ok(None));

        let registrar = Registrar::new(Arc::new(repo));
        let mut form = valid_form();
        let result = registrar.save(&mut form).await;

        match result {
            Err(AppError::Internal(msg)) => assert_eq!(msg, "disk full"),
            other => panic!("expected original error, got {:?}", other),
        }
        assert!(form.is_valid());
    }

    #[tokio::test]
    async fn test_save_failure_after_create_checks_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .returning(|username, email, password| Ok(stored_user(&username, &email, &password)));
        repo.expect_save()
            .returning(|_| Err(AppError::internal("connection reset")));
        repo.expect_find_by_username().times(1).returning(|_| Ok(None));

        let registrar = Registrar::new(Arc::new(repo));
        let mut form = valid_form();

        assert!(registrar.save(&mut form).await.is_err());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .returning(|_, _, _| Err(AppError::internal("insert failed")));
        repo.expect_find_by_username()
            .returning(|_| Err(AppError::internal("lookup failed")));

        let registrar = Registrar::new(Arc::new(repo));
        let mut form = valid_form();

        match registrar.save(&mut form).await {
            Err(AppError::Internal(msg)) => assert_eq!(msg, "lookup failed"),
            other => panic!("expected lookup error, got {:?}", other),
        }
    }
}
