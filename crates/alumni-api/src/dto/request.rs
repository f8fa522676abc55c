//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use alumni_entity::alumni::AlumniFields;
use alumni_entity::role::UpdateRole;
use alumni_entity::user::UpdateUser;
use alumni_service::Registration;

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1 to 50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 255, message = "Email is required"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub selected_role: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            selected_role: req.selected_role,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Caller's own profile changes. Omitted fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 50, message = "Role name must be 1 to 50 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Omitted fields are kept; `permissions`, when present, replaces the set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl From<UpdateRoleRequest> for UpdateRole {
    fn from(req: UpdateRoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            permissions: req.permissions.map(|p| p.into_iter().collect()),
        }
    }
}

/// Body of add-permission and remove-permission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PermissionRequest {
    #[validate(length(min = 1, max = 100, message = "Permission is required"))]
    pub permission: String,
}

/// Body of assign-role and remove-role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleAssignmentRequest {
    pub role_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            is_active: req.is_active,
        }
    }
}

/// Alumni record, for both create and full update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AlumniRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Valid email is required"), length(max = 255))]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "Graduation year must be between 1900 and 2100"))]
    pub graduation_year: i32,
    #[validate(length(min = 1, max = 100, message = "Degree is required"))]
    pub degree: String,
    #[validate(length(min = 1, max = 100, message = "Field of study is required"))]
    pub field_of_study: String,
    #[validate(length(max = 255))]
    pub current_company: Option<String>,
    #[validate(length(max = 255))]
    pub current_position: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

impl From<AlumniRequest> for AlumniFields {
    fn from(req: AlumniRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            graduation_year: req.graduation_year,
            degree: req.degree,
            field_of_study: req.field_of_study,
            current_company: req.current_company,
            current_position: req.current_position,
            city: req.city,
            country: req.country,
        }
    }
}

/// `?q=` for directory search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
