mod access_control;
mod api_ext;
mod database_ext;
mod encryption;
mod key_store;
mod litellm_key;
mod litellm_key_create_params;
mod litellm_key_update_params;
mod litellm_keys_page;
mod masking;
mod stored_litellm_key;
mod validation;

pub use self::{
    access_control::{ensure_group_membership, ensure_readable, ensure_writable},
    api_ext::KeysApiExt,
    encryption::ApiKeyEncryption,
    litellm_key::LiteLlmKey,
    litellm_key_create_params::LiteLlmKeyCreateParams,
    litellm_key_update_params::LiteLlmKeyUpdateParams,
    litellm_keys_page::{KeysPageParams, LiteLlmKeysPage},
    masking::mask_api_key,
    stored_litellm_key::StoredLiteLlmKey,
};
pub(crate) use self::validation::DEFAULT_KEY_TYPE;
