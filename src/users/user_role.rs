use serde::{Deserialize, Serialize};

/// Role of the user as reported by the host platform.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator, can read and modify any key.
    Admin,
    /// Regular user.
    User,
    /// User awaiting approval, or any role unknown to this service.
    #[serde(other)]
    Pending,
}

impl UserRole {
    /// Returns `true` if the role is allowed to manage LiteLLM keys at all.
    pub fn can_manage_keys(&self) -> bool {
        matches!(self, Self::Admin | Self::User)
    }

    /// Returns the role as it's stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Pending => "pending",
        }
    }
}
