use crate::users::UserRole;
use serde::Deserialize;

/// User as it's returned by the host platform for the authenticated session.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HostUser {
    pub id: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Pending
}
