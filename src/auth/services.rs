use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{CredentialStore, StoreError};
use crate::auth::repo_types::User;
use crate::session::store::SessionStore;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already exists. Please log in.")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Hashes the plaintext once and inserts the record. A duplicate email fails
/// without writing anything.
pub async fn signup(
    users: &dyn CredentialStore,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<User, AuthError> {
    let hash = hash_password(password)?;
    match users.create(email, &hash, first_name, last_name).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user created");
            Ok(user)
        }
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %email, "signup with existing email");
            Err(AuthError::DuplicateEmail)
        }
        Err(StoreError::Other(e)) => Err(AuthError::Internal(e)),
    }
}

/// Verifies credentials and establishes a fresh session association.
/// Unknown email and wrong password are deliberately collapsed into the same
/// error so callers cannot probe which accounts exist.
pub async fn login(
    users: &dyn CredentialStore,
    sessions: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Result<(String, User), AuthError> {
    let Some(user) = users.find_by_email(email).await? else {
        warn!("login with unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = sessions.create(user.id).await;
    info!(user_id = %user.id, "user logged in");
    Ok((token, user))
}

/// Idempotent: clearing a token that is not present is a no-op.
pub async fn logout(sessions: &dyn SessionStore, token: &str) {
    sessions.clear(token).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::MemoryCredentialStore;
    use crate::session::store::MemorySessionStore;

    #[test]
    fn email_validation_accepts_basic_shapes() {
        assert!(is_valid_email("a@example.com"));
        assert!(is_valid_email("name.surname@example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[tokio::test]
    async fn signup_then_login_resolves_same_user() {
        let users = MemoryCredentialStore::default();
        let sessions = MemorySessionStore::default();

        let created = signup(&users, "alice@example.com", "hunter2hunter2", None, None)
            .await
            .expect("signup");
        let (token, user) = login(&users, &sessions, "alice@example.com", "hunter2hunter2")
            .await
            .expect("login");

        assert_eq!(user.id, created.id);
        assert_eq!(sessions.get(&token).await, Some(created.id));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let users = MemoryCredentialStore::default();
        let sessions = MemorySessionStore::default();
        signup(&users, "bob@example.com", "pw-correct-1", None, None)
            .await
            .expect("signup");

        let wrong_password = login(&users, &sessions, "bob@example.com", "pw-wrong")
            .await
            .unwrap_err();
        let unknown_email = login(&users, &sessions, "nobody@example.com", "pw-correct-1")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_keeps_exactly_one_record() {
        let users = MemoryCredentialStore::default();

        let first = signup(&users, "carol@example.com", "first-password", None, None)
            .await
            .expect("first signup");
        let err = signup(&users, "carol@example.com", "second-password", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(users.user_count().await, 1);
        let stored = users
            .find_by_email("carol@example.com")
            .await
            .expect("lookup")
            .expect("record remains");
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn email_is_matched_case_sensitively_as_stored() {
        let users = MemoryCredentialStore::default();
        let sessions = MemorySessionStore::default();
        signup(&users, "Dan@Example.com", "some-password", None, None)
            .await
            .expect("signup");

        let err = login(&users, &sessions, "dan@example.com", "some-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        login(&users, &sessions, "Dan@Example.com", "some-password")
            .await
            .expect("exact spelling logs in");
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let users = MemoryCredentialStore::default();
        let sessions = MemorySessionStore::default();
        signup(&users, "eve@example.com", "another-password", None, None)
            .await
            .expect("signup");
        let (token, _) = login(&users, &sessions, "eve@example.com", "another-password")
            .await
            .expect("login");

        logout(&sessions, &token).await;
        assert_eq!(sessions.get(&token).await, None);

        // A second logout, or one for a token that never existed, is a no-op.
        logout(&sessions, &token).await;
        logout(&sessions, "never-issued").await;
    }
}
