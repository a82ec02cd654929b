use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    ops::Deref,
};

/// Identifier of a host platform user. It's opaque to this service and only compared for equality.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID, rejecting blank values.
    pub fn new<I: Into<String>>(id: I) -> anyhow::Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            anyhow::bail!("User ID cannot be empty.");
        }

        Ok(Self(id))
    }
}

impl Deref for UserId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}
