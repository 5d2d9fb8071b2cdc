// src/services/api.rs

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::common::error::AppError;
use crate::db::{BucketRepository, IdSource, RecordId};

// O envelope de sucesso devolvido por toda chamada simulada.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
}

// Política de emissão de id na criação.
#[derive(Clone)]
pub enum IdPolicy {
    // Ids numéricos do emissor central (users, roles).
    Generated(IdSource),
    // O próprio registro traz um slug no campo `id` (permissions).
    SlugField,
}

// A API remota simulada de um tipo de recurso. As quatro operações têm a
// mesma forma: latência fixa de ida e volta, depois o envelope de sucesso —
// ou a falha genérica, quando o handle foi criado com `failing()`.
// Não há cancelamento: uma chamada em voo sempre completa após a latência.
#[derive(Clone)]
pub struct ResourceApi {
    repo: BucketRepository,
    id_policy: IdPolicy,
    delay: Duration,
    simulate_failure: bool,
}

impl ResourceApi {
    pub fn new(repo: BucketRepository, id_policy: IdPolicy, delay: Duration) -> Self {
        Self {
            repo,
            id_policy,
            delay,
            simulate_failure: false,
        }
    }

    pub fn bucket(&self) -> &'static str {
        self.repo.bucket()
    }

    // Handle que rejeita toda operação após a mesma latência — o caminho de
    // simulação de erro, opt-in por ponto de chamada.
    pub fn failing(&self) -> Self {
        Self {
            simulate_failure: true,
            ..self.clone()
        }
    }

    async fn round_trip(&self) -> Result<(), AppError> {
        tokio::time::sleep(self.delay).await;
        if self.simulate_failure {
            return Err(AppError::SimulatedFailure);
        }
        Ok(())
    }

    fn envelope<T>(&self, data: T) -> ApiResponse<T> {
        ApiResponse {
            status: ResponseStatus::Success,
            data,
            timestamp: Utc::now(),
        }
    }

    // Nunca falha fora do caminho de erro opt-in.
    pub async fn list(&self) -> Result<ApiResponse<Vec<Value>>, AppError> {
        self.round_trip().await?;
        let records = self.repo.list_all().await?;
        Ok(self.envelope(records))
    }

    pub async fn create(&self, mut record: Value) -> Result<ApiResponse<Value>, AppError> {
        self.round_trip().await?;

        match &self.id_policy {
            IdPolicy::Generated(source) => {
                let obj = record.as_object_mut().ok_or_else(|| {
                    AppError::InvalidRecord("esperado um objeto JSON".to_owned())
                })?;
                // O chamador não escolhe o id: qualquer `id` enviado é sobrescrito.
                obj.insert("id".to_owned(), json!(source.next()));
            }
            IdPolicy::SlugField => {
                let has_slug =
                    matches!(record.get("id"), Some(Value::String(slug)) if !slug.is_empty());
                if !has_slug {
                    return Err(AppError::InvalidRecord(
                        "permissão sem slug no campo `id`".to_owned(),
                    ));
                }
            }
        }

        let created = self.repo.insert(record).await?;
        Ok(self.envelope(created))
    }

    pub async fn update(
        &self,
        id: &RecordId,
        partial: Value,
    ) -> Result<ApiResponse<Value>, AppError> {
        self.round_trip().await?;
        let merged = self.repo.merge(id, partial).await?;
        Ok(self.envelope(merged))
    }

    pub async fn delete(&self, id: &RecordId) -> Result<ApiResponse<RecordId>, AppError> {
        self.round_trip().await?;
        self.repo.remove(id).await?;
        Ok(self.envelope(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::KvStore;

    fn api(policy: IdPolicy) -> ResourceApi {
        let repo = BucketRepository::new(KvStore::in_memory(), "users");
        ResourceApi::new(repo, policy, Duration::ZERO)
    }

    fn generated_api() -> ResourceApi {
        api(IdPolicy::Generated(IdSource::new()))
    }

    #[tokio::test]
    async fn create_then_list_contains_the_record_plus_id() {
        let api = generated_api();
        let created = api.create(json!({"name": "Tester"})).await.unwrap().data;

        let id = created.get("id").and_then(Value::as_u64).unwrap();
        assert_eq!(created.get("name"), Some(&json!("Tester")));

        let listed = api.list().await.unwrap();
        assert_eq!(listed.status, ResponseStatus::Success);
        assert!(listed.data.iter().any(|r| r.get("id") == Some(&json!(id))));
    }

    #[tokio::test]
    async fn generated_ids_are_unique_under_rapid_creation() {
        let api = generated_api();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..100 {
            let created = api.create(json!({})).await.unwrap().data;
            assert!(ids.insert(created.get("id").and_then(Value::as_u64).unwrap()));
        }
    }

    #[tokio::test]
    async fn caller_supplied_id_is_overwritten_when_generated() {
        let api = generated_api();
        let created = api.create(json!({"id": 7, "name": "x"})).await.unwrap().data;
        assert_ne!(created.get("id"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn update_overlays_and_returns_the_merged_record() {
        let api = generated_api();
        let created = api
            .create(json!({"name": "Tester", "email": "t@t.dev"}))
            .await
            .unwrap()
            .data;
        let id = RecordId::Num(created.get("id").and_then(Value::as_u64).unwrap());

        let merged = api.update(&id, json!({"name": "Tester2"})).await.unwrap().data;
        assert_eq!(merged.get("name"), Some(&json!("Tester2")));
        assert_eq!(merged.get("email"), Some(&json!("t@t.dev")));
    }

    #[tokio::test]
    async fn update_on_missing_id_fails_with_not_found() {
        let api = generated_api();
        let err = api
            .update(&RecordId::Num(999), json!({"name": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_then_list_excludes_the_id_even_if_absent() {
        let api = generated_api();
        let created = api.create(json!({"name": "a"})).await.unwrap().data;
        let id = RecordId::Num(created.get("id").and_then(Value::as_u64).unwrap());

        let deleted = api.delete(&id).await.unwrap();
        assert_eq!(deleted.data, id);
        assert!(api.list().await.unwrap().data.is_empty());

        // Id inexistente: no-op, sem erro.
        api.delete(&RecordId::Num(12345)).await.unwrap();
    }

    #[tokio::test]
    async fn slug_policy_requires_a_string_id() {
        let api = api(IdPolicy::SlugField);

        let err = api.create(json!({"label": "sem slug"})).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord(_)));

        let created = api
            .create(json!({"id": "create_user", "label": "Create User"}))
            .await
            .unwrap()
            .data;
        assert_eq!(created.get("id"), Some(&json!("create_user")));
    }

    #[tokio::test]
    async fn failing_handle_rejects_every_operation() {
        let api = generated_api();
        api.create(json!({"name": "a"})).await.unwrap();

        let failing = api.failing();
        assert!(matches!(
            failing.list().await.unwrap_err(),
            AppError::SimulatedFailure
        ));
        assert!(matches!(
            failing.create(json!({})).await.unwrap_err(),
            AppError::SimulatedFailure
        ));
        assert!(matches!(
            failing.delete(&RecordId::Num(1)).await.unwrap_err(),
            AppError::SimulatedFailure
        ));

        // O handle sem falha continua saudável.
        assert_eq!(api.list().await.unwrap().data.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn every_operation_waits_the_configured_delay() {
        let repo = BucketRepository::new(KvStore::in_memory(), "users");
        let api = ResourceApi::new(
            repo,
            IdPolicy::Generated(IdSource::new()),
            Duration::from_millis(500),
        );

        let before = tokio::time::Instant::now();
        api.list().await.unwrap();
        assert!(before.elapsed() >= Duration::from_millis(500));

        let before = tokio::time::Instant::now();
        api.failing().list().await.unwrap_err();
        assert!(before.elapsed() >= Duration::from_millis(500));
    }
}
