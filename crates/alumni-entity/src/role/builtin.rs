//! The closed set of roles seeded at provisioning time.
//!
//! Built-in status is decided by exact name membership, never by a flag on
//! the stored record.

/// Name of the administrative role.
pub const ADMIN_ROLE: &str = "admin";

/// Roles that cannot be renamed, replaced or deleted.
pub const BUILT_IN_ROLES: [&str; 4] = [ADMIN_ROLE, "manager", "alumni", "guest"];

/// Whether `name` is one of the built-in roles. Case-sensitive.
pub fn is_built_in(name: &str) -> bool {
    BUILT_IN_ROLES.contains(&name)
}

/// Description and initial permission set of each built-in role.
pub fn seed_definitions() -> [(&'static str, &'static str, &'static [&'static str]); 4] {
    [
        (
            ADMIN_ROLE,
            "Full administrative access",
            &[
                "manage_users",
                "manage_roles",
                "manage_alumni",
                "view_reports",
                "view_alumni",
                "view_directory",
            ],
        ),
        (
            "manager",
            "Manages alumni records and reports",
            &["manage_alumni", "view_reports", "view_alumni", "view_directory"],
        ),
        (
            "alumni",
            "Registered alumnus",
            &["view_alumni", "view_directory"],
        ),
        ("guest", "Read-only visitor", &["view_directory"]),
    ]
}
