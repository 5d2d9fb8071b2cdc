pub mod api;
pub mod rbac_service;
pub mod user_service;

pub use api::{ApiResponse, IdPolicy, ResourceApi, ResponseStatus};
pub use rbac_service::{RbacService, RoleDirectory};
pub use user_service::UserService;
