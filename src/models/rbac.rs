// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

// Um cargo persistido no bucket "roles".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: u64,

    pub name: String,

    // A descrição pode ficar vazia; o formulário não a exige.
    #[serde(default)]
    pub description: String,

    // Ids de permissões por convenção — não há integridade referencial:
    // apagar uma permissão não remove o slug dos cargos que o citam.
    #[serde(default)]
    pub permissions: Vec<String>,
}

// Uma permissão do registro autoritativo (bucket "permissions").
// O id é um slug estável ("create_user"); o label é o texto de exibição.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,
    pub label: String,
}

// O formulário do modal de cargos; serve de payload tanto para criar
// quanto para editar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleForm {
    #[validate(length(min = 1, message = "O nome do cargo é obrigatório."))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub permissions: Vec<String>,
}

impl RoleForm {
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
            permissions: role.permissions.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
