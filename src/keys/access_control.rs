use crate::{error::Error as LiteLlmKeysError, keys::LiteLlmKey, users::Caller};

/// Checks whether the caller can see the key: owners and admins always can, other users only if
/// they share at least one group with the key.
pub fn can_read(caller: &Caller, key: &LiteLlmKey) -> bool {
    caller.id == key.user_id || caller.is_admin() || caller.is_member_of_any(&key.group_ids)
}

/// Checks whether the caller can modify or delete the key. Group membership never grants write
/// access.
pub fn can_write(caller: &Caller, key: &LiteLlmKey) -> bool {
    caller.id == key.user_id || caller.is_admin()
}

/// Fails with a not found error if the caller cannot see the key, so reads never reveal whether
/// keys of other users exist.
pub fn ensure_readable(caller: &Caller, key: &LiteLlmKey) -> Result<(), LiteLlmKeysError> {
    if can_read(caller, key) {
        Ok(())
    } else {
        Err(LiteLlmKeysError::not_found(format!(
            "LiteLLM key ('{}') not found.",
            key.id
        )))
    }
}

/// Fails with an access forbidden error if the caller cannot modify the key.
pub fn ensure_writable(caller: &Caller, key: &LiteLlmKey) -> Result<(), LiteLlmKeysError> {
    if can_write(caller, key) {
        Ok(())
    } else {
        Err(LiteLlmKeysError::access_forbidden())
    }
}

/// Fails with a client error if the caller tries to share the key with groups they don't belong
/// to.
pub fn ensure_group_membership(
    caller: &Caller,
    group_ids: &[String],
) -> Result<(), LiteLlmKeysError> {
    let foreign_groups = caller.foreign_groups(group_ids);
    if foreign_groups.is_empty() {
        Ok(())
    } else {
        Err(LiteLlmKeysError::client(format!(
            "User is not a member of groups: {}.",
            foreign_groups.join(", ")
        )))
    }
}
