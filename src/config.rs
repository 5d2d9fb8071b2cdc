// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::{BucketRepository, IdSource, KvStore};
use crate::services::api::{IdPolicy, ResourceApi};
use crate::services::rbac_service::RbacService;
use crate::services::user_service::UserService;

// Os três buckets do substrato, um por tipo de recurso.
pub const USERS_BUCKET: &str = "users";
pub const ROLES_BUCKET: &str = "roles";
pub const PERMISSIONS_BUCKET: &str = "permissions";

// Latência simulada padrão: 500 ms por chamada, como uma ida e volta real.
const DEFAULT_API_DELAY_MS: u64 = 500;

// Configuração carregada do ambiente (arquivo .env via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    // Caminho do arquivo de armazenamento; ausente = somente memória.
    pub storage_path: Option<PathBuf>,
    // Latência artificial uniforme de cada chamada simulada.
    pub api_delay: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let storage_path = env::var("STORAGE_PATH").ok().map(PathBuf::from);
        let api_delay = match env::var("API_DELAY_MS") {
            Ok(raw) => Duration::from_millis(
                raw.parse()
                    .map_err(|e| anyhow::anyhow!("API_DELAY_MS inválido: {e}"))?,
            ),
            Err(_) => Duration::from_millis(DEFAULT_API_DELAY_MS),
        };

        Ok(Self {
            storage_path,
            api_delay,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação.
#[derive(Clone)]
pub struct AppState {
    pub store: KvStore,
    pub users_api: ResourceApi,
    pub roles_api: ResourceApi,
    pub permissions_api: ResourceApi,
    pub user_service: UserService,
    pub rbac_service: RbacService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(Config::from_env()?).await
    }

    pub async fn with_config(config: Config) -> anyhow::Result<Self> {
        let store = match &config.storage_path {
            Some(path) => {
                tracing::info!("✅ Armazenamento com write-through em {:?}.", path);
                KvStore::open(path)
            }
            None => {
                tracing::info!(
                    "ℹ️ Armazenamento somente em memória (STORAGE_PATH não definido)."
                );
                KvStore::in_memory()
            }
        };

        // Um emissor central para todos os buckets de id numérico.
        let ids = IdSource::new();

        let users_api = ResourceApi::new(
            BucketRepository::new(store.clone(), USERS_BUCKET),
            IdPolicy::Generated(ids.clone()),
            config.api_delay,
        );
        let roles_api = ResourceApi::new(
            BucketRepository::new(store.clone(), ROLES_BUCKET),
            IdPolicy::Generated(ids),
            config.api_delay,
        );
        let permissions_api = ResourceApi::new(
            BucketRepository::new(store.clone(), PERMISSIONS_BUCKET),
            IdPolicy::SlugField,
            config.api_delay,
        );

        let user_service = UserService::new(users_api.clone());
        let rbac_service = RbacService::new(roles_api.clone(), permissions_api.clone());

        // Garante o registro autoritativo de permissões na subida.
        rbac_service.seed_default_permissions().await?;

        Ok(Self {
            store,
            users_api,
            roles_api,
            permissions_api,
            user_service,
            rbac_service,
        })
    }

    // Estado para testes e demonstração: memória pura e latência zero.
    pub async fn new_in_memory() -> anyhow::Result<Self> {
        Self::with_config(Config {
            storage_path: None,
            api_delay: Duration::ZERO,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_state_comes_up_seeded() {
        let state = AppState::new_in_memory().await.unwrap();

        let catalog = state.permissions_api.list().await.unwrap().data;
        assert_eq!(catalog.len(), 4);

        // O bucket de permissões é o único pré-populado.
        assert!(state.users_api.list().await.unwrap().data.is_empty());
        assert!(state.roles_api.list().await.unwrap().data.is_empty());
    }
}
