//! Service wiring over the in-memory store, for unit tests.

use alumni_auth::password::{PasswordHasher, PasswordValidator};
use alumni_core::config::{AdminFloor, AuthConfig};
use alumni_database::{MemoryStore, Stores};
use alumni_entity::role::Role;

use crate::alumni::AlumniService;
use crate::assignment::AssignmentLedger;
use crate::auth::Authenticator;
use crate::credential::{CredentialStore, NewUser};
use crate::registration::{Registration, RegistrationService};
use crate::role::RoleRegistry;
use crate::user::UserAdminService;

pub(crate) struct TestServices {
    pub memory: MemoryStore,
    pub stores: Stores,
    pub config: AuthConfig,
    pub credentials: CredentialStore,
    pub roles: RoleRegistry,
    pub ledger: AssignmentLedger,
    pub authenticator: Authenticator,
    pub registration: RegistrationService,
    pub users: UserAdminService,
    pub alumni: AlumniService,
}

impl TestServices {
    /// Built-in roles seeded, per-user admin floor.
    pub fn new() -> Self {
        Self::build(MemoryStore::with_builtin_roles(), test_config())
    }

    pub fn with_floor(floor: AdminFloor) -> Self {
        let mut config = test_config();
        config.admin_floor = floor;
        Self::build(MemoryStore::with_builtin_roles(), config)
    }

    pub fn build(memory: MemoryStore, config: AuthConfig) -> Self {
        let stores = Stores::memory(memory.clone());
        let credentials = CredentialStore::new(
            stores.users.clone(),
            stores.assignments.clone(),
            PasswordHasher::new(),
            PasswordValidator::new(&config),
        );
        let roles = RoleRegistry::new(stores.roles.clone(), stores.assignments.clone());
        let ledger = AssignmentLedger::new(
            stores.users.clone(),
            stores.roles.clone(),
            stores.assignments.clone(),
            config.admin_floor,
        );
        let authenticator =
            Authenticator::new(credentials.clone(), stores.roles.clone(), &config);
        let registration = RegistrationService::new(
            credentials.clone(),
            ledger.clone(),
            stores.users.clone(),
            stores.roles.clone(),
            &config,
        );
        let users = UserAdminService::new(
            stores.users.clone(),
            stores.roles.clone(),
            stores.assignments.clone(),
            config.admin_floor,
        );
        let alumni = AlumniService::new(stores.alumni.clone());

        Self {
            memory,
            stores,
            config,
            credentials,
            roles,
            ledger,
            authenticator,
            registration,
            users,
            alumni,
        }
    }

    pub async fn role(&self, name: &str) -> Role {
        self.roles
            .get_role_by_name(name)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("role {name} missing"))
    }

    /// Register `username` (password `secret1`) with the given role.
    pub async fn user_with_role(&self, username: &str, role: &str) -> uuid::Uuid {
        let outcome = self
            .registration
            .register(registration(username, Some(role)))
            .await
            .unwrap();
        outcome.user_id
    }
}

pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "service-test-secret".into(),
        ..AuthConfig::default()
    }
}

pub(crate) fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@x.com"),
        password: "secret1".to_string(),
        first_name: None,
        last_name: None,
        phone: None,
    }
}

pub(crate) fn registration(username: &str, role: Option<&str>) -> Registration {
    Registration {
        username: username.to_string(),
        email: format!("{username}@x.com"),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
        first_name: None,
        last_name: None,
        phone: None,
        selected_role: role.map(str::to_string),
    }
}
