pub mod role_management;

pub use role_management::{ModalState, Notice, RoleManagementView};
