use serde::Deserialize;

/// Group as it's returned by the host platform.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HostGroup {
    pub id: String,
    #[serde(default)]
    pub user_ids: Option<Vec<String>>,
}

impl HostGroup {
    /// Returns `true` if the group lists the user among its members.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.user_ids
            .as_ref()
            .is_some_and(|user_ids| user_ids.iter().any(|id| id == user_id))
    }
}
