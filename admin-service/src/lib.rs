pub mod config;
pub mod dtos;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use crate::config::AdminConfig;
use crate::services::{
    AuthService, CredentialService, EmailProvider, PermissionService, SeedService, SessionIssuer,
    TokenLifecycle,
};
use crate::store::{MenuStore, TokenStore, UserStore};
use std::sync::Arc;

/// Wired-up application services sharing one store.
#[derive(Clone)]
pub struct AppState {
    pub config: AdminConfig,
    pub tokens: TokenLifecycle,
    pub credentials: CredentialService,
    pub auth: AuthService,
    pub permissions: PermissionService,
    pub seed: SeedService,
}

impl AppState {
    pub fn new<S>(
        config: AdminConfig,
        store: Arc<S>,
        email: Arc<dyn EmailProvider>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self
    where
        S: UserStore + TokenStore + MenuStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let token_store: Arc<dyn TokenStore> = store.clone();
        let menus: Arc<dyn MenuStore> = store;

        let tokens = TokenLifecycle::new(token_store, config.tokens.clone());
        let credentials = CredentialService::new(users.clone(), tokens.clone());
        let auth = AuthService::new(
            users.clone(),
            tokens.clone(),
            credentials.clone(),
            email,
            sessions,
        );
        let permissions = PermissionService::new(users.clone(), menus.clone());
        let seed = SeedService::new(users, menus, config.seed.clone());

        Self {
            config,
            tokens,
            credentials,
            auth,
            permissions,
            seed,
        }
    }
}
