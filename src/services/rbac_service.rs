// src/services/rbac_service.rs

use async_trait::async_trait;
use serde_json::json;
use validator::Validate;

use crate::common::error::AppError;
use crate::db::RecordId;
use crate::models::rbac::{Permission, Role, RoleForm};
use crate::services::api::ResourceApi;

// A semente do registro de permissões. O bucket é a única representação
// de permissões; a tela resolve labels contra ele, nunca contra uma lista
// estática paralela.
const DEFAULT_PERMISSIONS: [(&str, &str); 4] = [
    ("create_user", "Create User"),
    ("edit_user", "Edit User"),
    ("delete_user", "Delete User"),
    ("manage_roles", "Manage Roles"),
];

// A interface única de repositório consumida pela tela de cargos: toda
// mutação da view passa por aqui, nunca por estado local próprio.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<Role>, AppError>;
    async fn create_role(&self, form: RoleForm) -> Result<Role, AppError>;
    async fn update_role(&self, id: u64, form: RoleForm) -> Result<Role, AppError>;
    async fn delete_role(&self, id: u64) -> Result<u64, AppError>;
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError>;
}

#[derive(Clone)]
pub struct RbacService {
    roles: ResourceApi,
    permissions: ResourceApi,
}

impl RbacService {
    pub fn new(roles: ResourceApi, permissions: ResourceApi) -> Self {
        Self { roles, permissions }
    }

    // Semeia o catálogo padrão quando o registro está vazio. Idempotente:
    // um registro já populado (mesmo parcialmente) não é tocado.
    pub async fn seed_default_permissions(&self) -> Result<usize, AppError> {
        let existing = self.permissions.list().await?.data;
        if !existing.is_empty() {
            return Ok(0);
        }

        for (id, label) in DEFAULT_PERMISSIONS {
            self.permissions
                .create(json!({"id": id, "label": label}))
                .await?;
        }

        tracing::info!(
            "✅ Registro de permissões semeado com {} entradas.",
            DEFAULT_PERMISSIONS.len()
        );
        Ok(DEFAULT_PERMISSIONS.len())
    }

    pub async fn create_permission(&self, permission: Permission) -> Result<Permission, AppError> {
        let created = self
            .permissions
            .create(serde_json::to_value(&permission)?)
            .await?;
        Ok(serde_json::from_value(created.data)?)
    }

    pub async fn rename_permission(&self, id: &str, label: &str) -> Result<Permission, AppError> {
        let merged = self
            .permissions
            .update(&RecordId::from(id), json!({"label": label}))
            .await?;
        Ok(serde_json::from_value(merged.data)?)
    }

    // Sem cascata: cargos que citam o slug continuam citando; a tela exibe
    // o slug cru quando o label não resolve mais.
    pub async fn delete_permission(&self, id: &str) -> Result<(), AppError> {
        self.permissions.delete(&RecordId::from(id)).await?;
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for RbacService {
    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let records = self.roles.list().await?.data;
        records
            .into_iter()
            .map(|r| serde_json::from_value(r).map_err(AppError::from))
            .collect()
    }

    async fn create_role(&self, form: RoleForm) -> Result<Role, AppError> {
        form.validate()?;
        let created = self.roles.create(serde_json::to_value(&form)?).await?;
        Ok(serde_json::from_value(created.data)?)
    }

    async fn update_role(&self, id: u64, form: RoleForm) -> Result<Role, AppError> {
        form.validate()?;
        let merged = self
            .roles
            .update(&RecordId::Num(id), serde_json::to_value(&form)?)
            .await?;
        Ok(serde_json::from_value(merged.data)?)
    }

    async fn delete_role(&self, id: u64) -> Result<u64, AppError> {
        self.roles.delete(&RecordId::Num(id)).await?;
        Ok(id)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let records = self.permissions.list().await?.data;
        records
            .into_iter()
            .map(|r| serde_json::from_value(r).map_err(AppError::from))
            .collect()
    }
}
