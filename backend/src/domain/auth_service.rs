//! Authentication and the signed-in session.
//!
//! Credential checks go through the [`AuthProvider`] trait. The only adapter,
//! [`DemoAuthProvider`], accepts a single demo account after an artificial
//! delay and issues throwaway ids on registration. [`AuthService`] owns the
//! session and mirrors it into preference storage so it survives restarts.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::commands::auth::{LoginCommand, RegisterCommand};
use super::lock_state;
use super::models::user::User;
use crate::storage::{load_json, save_json, PreferenceStorage, AUTH_SESSION_KEY};

pub const DEMO_EMAIL: &str = "patient@medipass.com";
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,
    #[error("Les mots de passe ne correspondent pas")]
    PasswordMismatch,
    #[error("Veuillez remplir tous les champs obligatoires")]
    MissingFields,
    #[error("Veuillez vous connecter")]
    NotAuthenticated,
}

/// Verifies credentials and creates accounts
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, command: &LoginCommand) -> Result<User, AuthError>;
    async fn register(&self, command: &RegisterCommand) -> Result<User, AuthError>;
}

/// Accepts only the demo account; every call waits `latency` first
pub struct DemoAuthProvider {
    latency: Duration,
}

impl DemoAuthProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_network(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl AuthProvider for DemoAuthProvider {
    async fn authenticate(&self, command: &LoginCommand) -> Result<User, AuthError> {
        self.simulate_network().await;

        if command.email != DEMO_EMAIL || command.password != DEMO_PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(User {
            id: "1".to_string(),
            name: "Jean Dupont".to_string(),
            email: command.email.clone(),
            avatar: None,
            phone: Some("+33 6 12 34 56 78".to_string()),
            location: None,
            date_of_birth: None,
            bio: None,
        })
    }

    async fn register(&self, command: &RegisterCommand) -> Result<User, AuthError> {
        if command.password != command.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if command.name.trim().is_empty()
            || command.email.trim().is_empty()
            || command.password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }

        self.simulate_network().await;

        let id: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
        Ok(User {
            id,
            name: command.name.trim().to_string(),
            email: command.email.trim().to_string(),
            avatar: None,
            phone: command
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            location: None,
            date_of_birth: None,
            bio: None,
        })
    }
}

/// Owns the session user
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    storage: Arc<dyn PreferenceStorage>,
    session: Arc<Mutex<Option<User>>>,
}

impl AuthService {
    /// Create the service, restoring a persisted session if one is readable.
    pub fn new(provider: Arc<dyn AuthProvider>, storage: Arc<dyn PreferenceStorage>) -> Self {
        let restored: Option<User> = load_json(storage.as_ref(), AUTH_SESSION_KEY);
        if let Some(user) = &restored {
            info!("Restored session for user {}", user.id);
        }

        Self {
            provider,
            storage,
            session: Arc::new(Mutex::new(restored)),
        }
    }

    pub async fn login(&self, command: LoginCommand) -> Result<User, AuthError> {
        info!("Login attempt for {}", command.email);
        let user = self.provider.authenticate(&command).await.map_err(|e| {
            warn!("Login failed for {}: {}", command.email, e);
            e
        })?;

        self.start_session(user.clone());
        info!("User {} signed in", user.id);
        Ok(user)
    }

    pub async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        info!("Registration attempt for {}", command.email);
        let user = self.provider.register(&command).await?;

        self.start_session(user.clone());
        info!("Registered and signed in user {}", user.id);
        Ok(user)
    }

    pub fn logout(&self) {
        let previous = lock_state(&self.session).take();
        if let Some(user) = previous {
            info!("User {} signed out", user.id);
        }
        if let Err(e) = self.storage.remove(AUTH_SESSION_KEY) {
            warn!("Failed to clear stored session: {}", e);
        }
    }

    pub fn current_user(&self) -> Option<User> {
        lock_state(&self.session).clone()
    }

    pub fn require_user(&self) -> Result<User, AuthError> {
        self.current_user().ok_or(AuthError::NotAuthenticated)
    }

    /// Swap the session user for an updated copy, e.g. after a profile edit.
    pub fn replace_user(&self, user: User) -> Result<(), AuthError> {
        let mut session = lock_state(&self.session);
        if session.is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        *session = Some(user.clone());
        drop(session);

        self.persist(&user);
        Ok(())
    }

    fn start_session(&self, user: User) {
        *lock_state(&self.session) = Some(user.clone());
        self.persist(&user);
    }

    fn persist(&self, user: &User) {
        if let Err(e) = save_json(self.storage.as_ref(), AUTH_SESSION_KEY, user) {
            warn!("Failed to persist session for user {}: {}", user.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferenceStore;

    fn service_with(storage: Arc<dyn PreferenceStorage>) -> AuthService {
        AuthService::new(Arc::new(DemoAuthProvider::new(Duration::ZERO)), storage)
    }

    fn demo_login() -> LoginCommand {
        LoginCommand {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }
    }

    fn registration(password: &str, confirm: &str) -> RegisterCommand {
        RegisterCommand {
            name: "Awa Diop".to_string(),
            email: "awa@example.sn".to_string(),
            phone: Some("+221 77 000 00 00".to_string()),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_demo_login_starts_session() {
        let service = service_with(Arc::new(MemoryPreferenceStore::new()));
        assert!(service.current_user().is_none());

        let user = service.login(demo_login()).await.unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "Jean Dupont");
        assert_eq!(user.phone.as_deref(), Some("+33 6 12 34 56 78"));
        assert_eq!(service.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let service = service_with(Arc::new(MemoryPreferenceStore::new()));
        let result = service
            .login(LoginCommand {
                email: DEMO_EMAIL.to_string(),
                password: "nope".to_string(),
            })
            .await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Email ou mot de passe incorrect"
        );
        assert!(service.current_user().is_none());
    }

    #[tokio::test]
    async fn test_register_validates_passwords_and_fields() {
        let service = service_with(Arc::new(MemoryPreferenceStore::new()));
        assert_eq!(
            service.register(registration("secret", "other")).await,
            Err(AuthError::PasswordMismatch)
        );

        let mut missing = registration("secret", "secret");
        missing.name = "  ".to_string();
        assert_eq!(service.register(missing).await, Err(AuthError::MissingFields));

        let user = service.register(registration("secret", "secret")).await.unwrap();
        assert_eq!(user.id.len(), 9);
        assert_eq!(user.name, "Awa Diop");
        assert_eq!(service.current_user().map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_password_mismatch_is_reported_before_the_delay() {
        let provider = DemoAuthProvider::new(Duration::from_secs(30));
        let started = std::time::Instant::now();
        let result = provider.register(&registration("a", "b")).await;
        assert_eq!(result, Err(AuthError::PasswordMismatch));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_login_waits_for_simulated_latency() {
        let provider = DemoAuthProvider::new(Duration::from_millis(50));
        let started = std::time::Instant::now();
        provider.authenticate(&demo_login()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_session_survives_restart_and_logout_clears_it() {
        let storage: Arc<dyn PreferenceStorage> = Arc::new(MemoryPreferenceStore::new());
        let service = service_with(storage.clone());
        service.login(demo_login()).await.unwrap();

        let restarted = service_with(storage.clone());
        assert_eq!(restarted.current_user().map(|u| u.id), Some("1".to_string()));

        restarted.logout();
        assert!(restarted.current_user().is_none());
        assert!(service_with(storage).current_user().is_none());
    }

    #[test]
    fn test_malformed_stored_session_is_ignored() {
        let storage = Arc::new(MemoryPreferenceStore::new());
        storage.set(AUTH_SESSION_KEY, "{\"state\":").unwrap();
        let service = service_with(storage);
        assert_eq!(service.require_user(), Err(AuthError::NotAuthenticated));
    }
}
