use admin_service::config::{
    AdminConfig, SeedConfig, SessionConfig, SmtpConfig, TokenTtlConfig,
};
use admin_service::dtos::auth::SignupRequest;
use admin_service::services::{EmailProvider, JwtSessionIssuer, MockEmailService, ServiceError};
use admin_service::store::MemoryStore;
use admin_service::AppState;
use service_core::async_trait::async_trait;
use service_core::config::Environment;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub email: Arc<MockEmailService>,
    pub sessions: Arc<JwtSessionIssuer>,
}

pub fn test_config() -> AdminConfig {
    AdminConfig {
        environment: Environment::Dev,
        service_name: "admin-service-test".to_string(),
        log_level: "debug".to_string(),
        tokens: TokenTtlConfig {
            email_verification_minutes: 60,
            password_reset_minutes: 60,
            register_invite_hours: 48,
            email_change_minutes: 60,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            user: "test@localhost".to_string(),
            password: String::new(),
            from_email: "test@localhost".to_string(),
            base_url: "http://localhost:3000".to_string(),
        },
        session: SessionConfig {
            jwt_secret: "test-session-secret".to_string(),
            session_expiry_minutes: 60,
        },
        seed: SeedConfig {
            super_admin_id: Uuid::new_v4(),
            super_admin_email: "super@test.com".to_string(),
            super_admin_password: "super-secret-1".to_string(),
        },
    }
}

pub fn setup() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let email = Arc::new(MockEmailService::new());
    let sessions = Arc::new(JwtSessionIssuer::new(store.clone(), &config.session));

    let state = AppState::new(config, store.clone(), email.clone(), sessions.clone());

    TestApp {
        state,
        store,
        email,
        sessions,
    }
}

/// Provider that rejects every send, for exercising the
/// delivery-failure paths.
pub struct FailingEmailService;

impl FailingEmailService {
    fn refuse(&self) -> Result<(), ServiceError> {
        Err(ServiceError::Email("connection refused".to_string()))
    }
}

#[async_trait]
impl EmailProvider for FailingEmailService {
    async fn send_verification_email(
        &self,
        _to_email: &str,
        _token: &str,
    ) -> Result<(), ServiceError> {
        self.refuse()
    }

    async fn send_password_reset_email(
        &self,
        _to_email: &str,
        _token: &str,
    ) -> Result<(), ServiceError> {
        self.refuse()
    }

    async fn send_invite_email(&self, _to_email: &str, _token: &str) -> Result<(), ServiceError> {
        self.refuse()
    }

    async fn send_email_change_email(
        &self,
        _to_email: &str,
        _token: &str,
    ) -> Result<(), ServiceError> {
        self.refuse()
    }
}

pub struct FailingEmailApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

/// Like [`setup`], but every outbound email fails.
pub fn setup_failing_email() -> FailingEmailApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let sessions = Arc::new(JwtSessionIssuer::new(store.clone(), &config.session));

    let state = AppState::new(config, store.clone(), Arc::new(FailingEmailService), sessions);

    FailingEmailApp { state, store }
}

/// Sign up and complete email verification, returning the user's email.
pub async fn signup_verified(app: &TestApp, email: &str, name: &str, password: &str) -> String {
    app.state
        .auth
        .signup(SignupRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        })
        .await
        .expect("signup failed");

    let token = app.email.last_token().expect("no verification email sent");
    app.state
        .auth
        .verify_email(&token)
        .await
        .expect("verification failed");

    email.to_lowercase()
}
