//! Shared application state.

use defter_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// State shared by every handler. Cloning is cheap: the database holds a
/// pooled connection handle and the JWT manager is a few strings.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        );
        AppState { db, jwt, config }
    }
}
