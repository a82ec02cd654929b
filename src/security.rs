//! Resolution of the caller identity through the host platform. The host authenticates users and
//! owns group memberships, this service only asks it who is behind the bearer token.

mod api_ext;
mod host_group;
mod host_user;
