// src/services/user_service.rs

use serde_json::{Map, Value};

use crate::common::error::AppError;
use crate::db::RecordId;
use crate::models::user::User;
use crate::services::api::ResourceApi;

// CRUD tipado de usuários sobre a API simulada do bucket "users".
// O perfil é livre: qualquer campo que o formulário enviar é persistido.
#[derive(Clone)]
pub struct UserService {
    users: ResourceApi,
}

impl UserService {
    pub fn new(users: ResourceApi) -> Self {
        Self { users }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let records = self.users.list().await?.data;
        records
            .into_iter()
            .map(|r| serde_json::from_value(r).map_err(AppError::from))
            .collect()
    }

    pub async fn create_user(&self, profile: Map<String, Value>) -> Result<User, AppError> {
        let created = self.users.create(Value::Object(profile)).await?;
        Ok(serde_json::from_value(created.data)?)
    }

    pub async fn update_user(
        &self,
        id: u64,
        partial: Map<String, Value>,
    ) -> Result<User, AppError> {
        let merged = self
            .users
            .update(&RecordId::Num(id), Value::Object(partial))
            .await?;
        Ok(serde_json::from_value(merged.data)?)
    }

    pub async fn delete_user(&self, id: u64) -> Result<u64, AppError> {
        self.users.delete(&RecordId::Num(id)).await?;
        Ok(id)
    }
}
