use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum UserRole {
        #[default]
        Employee => "employee",
        Admin => "admin",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub department: String,
    pub position: Option<String>,
    pub employee_number: Option<String>,
    /// Team lead this user reports to.
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(input: CreateUserInput, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash,
            name: input.name,
            role: input.role.unwrap_or_default(),
            department: input.department,
            position: input.position,
            employee_number: input.employee_number,
            manager_id: input.manager_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_employee(&self) -> bool {
        self.role == UserRole::Employee
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Option<UserRole>,
    pub department: String,
    pub position: Option<String>,
    pub employee_number: Option<String>,
    pub manager_id: Option<Uuid>,
}

impl CreateUserInput {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("Invalid email address".to_string());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.department.trim().is_empty() {
            return Err("Department is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub department: String,
    pub position: Option<String>,
    pub employee_number: Option<String>,
    pub manager_id: Option<Uuid>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            department: user.department,
            position: user.position,
            employee_number: user.employee_number,
            manager_id: user.manager_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}
