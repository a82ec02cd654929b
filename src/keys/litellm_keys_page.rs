use crate::{error::Error as LiteLlmKeysError, keys::LiteLlmKey};
use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_LIMIT: usize = 100;
/// Maximum page size.
const MAX_LIMIT: usize = 1000;

/// Page of the LiteLLM keys along with the total number of keys matching the query.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LiteLlmKeysPage {
    pub keys: Vec<LiteLlmKey>,
    pub total: usize,
}

/// Pagination parameters of the key listings.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeysPageParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl KeysPageParams {
    pub fn validate(&self) -> Result<(), LiteLlmKeysError> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(LiteLlmKeysError::client(format!(
                "Limit must be between 1 and {MAX_LIMIT}."
            )));
        }

        Ok(())
    }

    /// Returns the page of the items that are already loaded into memory.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.limit).collect()
    }
}

impl Default for KeysPageParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}
