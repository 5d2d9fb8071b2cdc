pub mod rbac;
pub mod user;

pub use rbac::{Permission, Role, RoleForm};
pub use user::User;
