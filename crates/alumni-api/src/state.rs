//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use alumni_auth::password::{PasswordHasher, PasswordValidator};
use alumni_core::config::AppConfig;
use alumni_database::Stores;
#[cfg(feature = "dev-endpoints")]
use alumni_service::DevTools;
use alumni_service::{
    AlumniService, AssignmentLedger, Authenticator, CredentialStore, RegistrationService,
    RoleRegistry, UserAdminService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Store handles, also used by the health check
    pub stores: Stores,

    // ── Services ─────────────────────────────────────────────
    pub credentials: Arc<CredentialStore>,
    pub authenticator: Arc<Authenticator>,
    pub registration: Arc<RegistrationService>,
    pub roles: Arc<RoleRegistry>,
    pub ledger: Arc<AssignmentLedger>,
    pub users: Arc<UserAdminService>,
    pub alumni: Arc<AlumniService>,
    #[cfg(feature = "dev-endpoints")]
    pub devtools: Arc<DevTools>,
}

impl AppState {
    /// Wire every service over the given stores.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let auth = &config.auth;

        let credentials = CredentialStore::new(
            stores.users.clone(),
            stores.assignments.clone(),
            PasswordHasher::new(),
            PasswordValidator::new(auth),
        );
        let ledger = AssignmentLedger::new(
            stores.users.clone(),
            stores.roles.clone(),
            stores.assignments.clone(),
            auth.admin_floor,
        );
        let authenticator = Authenticator::new(credentials.clone(), stores.roles.clone(), auth);
        let registration = RegistrationService::new(
            credentials.clone(),
            ledger.clone(),
            stores.users.clone(),
            stores.roles.clone(),
            auth,
        );
        let roles = RoleRegistry::new(stores.roles.clone(), stores.assignments.clone());
        let users = UserAdminService::new(
            stores.users.clone(),
            stores.roles.clone(),
            stores.assignments.clone(),
            auth.admin_floor,
        );
        let alumni = AlumniService::new(stores.alumni.clone());

        #[cfg(feature = "dev-endpoints")]
        let devtools = DevTools::new(
            credentials.clone(),
            ledger.clone(),
            stores.users.clone(),
            stores.roles.clone(),
            stores.assignments.clone(),
        );

        Self {
            credentials: Arc::new(credentials),
            authenticator: Arc::new(authenticator),
            registration: Arc::new(registration),
            roles: Arc::new(roles),
            ledger: Arc::new(ledger),
            users: Arc::new(users),
            alumni: Arc::new(alumni),
            #[cfg(feature = "dev-endpoints")]
            devtools: Arc::new(devtools),
            stores,
            config: Arc::new(config),
        }
    }
}
