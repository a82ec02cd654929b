mod caller;
mod database_ext;
mod user_id;
mod user_role;

pub use self::{caller::Caller, user_id::UserId, user_role::UserRole};
