use serde::{Deserialize, Serialize};

/// Authenticated user, normalized from the backend's user shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Lower-cased role, "user" when the backend sends none
    pub role: String,
}

impl User {
    /// Roles allowed into the venue-owner panel
    pub fn is_admin_like(&self) -> bool {
        matches!(self.role.as_str(), "superadmin" | "admin_general" | "admin")
    }
}

/// Sign-up form for `POST /auth/register`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}
