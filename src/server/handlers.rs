mod litellm_keys_connection;
mod litellm_keys_create;
mod litellm_keys_delete;
mod litellm_keys_get;
mod litellm_keys_list;
mod litellm_keys_update;
mod status_get;

pub use self::{
    litellm_keys_connection::litellm_keys_connection,
    litellm_keys_create::litellm_keys_create,
    litellm_keys_delete::litellm_keys_delete,
    litellm_keys_get::{litellm_keys_get, litellm_keys_status},
    litellm_keys_list::{litellm_keys_list, litellm_keys_list_accessible, litellm_keys_list_all},
    litellm_keys_update::litellm_keys_update,
    status_get::status_get,
};
