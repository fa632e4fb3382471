//! Seed runner: provisions the super-admin account (and, outside
//! production, a dev admin with a root Dashboard menu).

use admin_service::config::AdminConfig;
use admin_service::services::{JwtSessionIssuer, MockEmailService, SmtpEmailService};
use admin_service::store::{MemoryStore, UserStore};
use admin_service::AppState;
use service_core::observability::init_tracing;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AdminConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        environment = ?config.environment,
        "Starting admin service seed"
    );

    let store = Arc::new(MemoryStore::new());
    let users: Arc<dyn UserStore> = store.clone();

    let email: Arc<dyn admin_service::services::EmailProvider> =
        if config.environment.is_prod() {
            Arc::new(SmtpEmailService::new(&config.smtp)?)
        } else {
            Arc::new(MockEmailService::new())
        };

    let sessions = Arc::new(JwtSessionIssuer::new(users, &config.session));

    let state = AppState::new(config, store, email, sessions);

    state.seed.seed_super_admin().await?;

    if !state.config.environment.is_prod() {
        state.seed.seed_dev_admin().await?;
    }

    tracing::info!("Seed completed");

    Ok(())
}
