//! Integration with the LiteLLM gateway.
//!
//! With the `gateway` backend, key records live in the gateway and every call to it is made with
//! the single master credential from the configuration. The gateway itself doesn't know about
//! the users of the host platform: ownership and sharing are recorded as plain `user_id` and
//! `groups` fields of the gateway records, and all per-user scoping (filtering listings, checking
//! ownership before updates and deletions) is performed by this service. Anyone holding the
//! master credential can bypass this scoping entirely by talking to the gateway directly.

mod api_ext;
mod connection_status;
mod gateway_api;
mod gateway_key;
mod key_status;

pub use self::{
    api_ext::GatewayKeysApiExt, connection_status::ConnectionStatus, key_status::KeyStatus,
};
