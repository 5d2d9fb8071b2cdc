// src/db/bucket_repo.rs

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::common::error::AppError;
use crate::db::kv_store::KvStore;

// Identificador de um registro: numérico (users, roles) ou slug (permissions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(u64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{n}"),
            RecordId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Num(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

// Extrai o campo `id` de um registro armazenado.
fn record_id(record: &Value) -> Option<RecordId> {
    match record.get("id")? {
        Value::Number(n) => n.as_u64().map(RecordId::Num),
        Value::String(s) => Some(RecordId::Str(s.clone())),
        _ => None,
    }
}

fn as_object(record: Value) -> Result<Map<String, Value>, AppError> {
    match record {
        Value::Object(map) => Ok(map),
        other => Err(AppError::InvalidRecord(format!(
            "esperado um objeto JSON, recebido {other}"
        ))),
    }
}

// Um bucket nomeado: um array JSON de objetos, cada um com campo `id`.
// Toda escrita é um read-modify-write do array inteiro; o mutex do bucket
// serializa escritores concorrentes, então nenhuma atualização se perde.
// Não há transação entre buckets diferentes.
#[derive(Clone)]
pub struct BucketRepository {
    store: KvStore,
    bucket: &'static str,
    write_guard: Arc<Mutex<()>>,
}

impl BucketRepository {
    pub fn new(store: KvStore, bucket: &'static str) -> Self {
        Self {
            store,
            bucket,
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn bucket(&self) -> &'static str {
        self.bucket
    }

    // Bucket ausente equivale a uma sequência vazia.
    fn read_records(&self) -> Result<Vec<Value>, AppError> {
        match self.store.get_item(self.bucket) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_records(&self, records: &[Value]) -> Result<(), AppError> {
        self.store
            .set_item(self.bucket, serde_json::to_string(records)?)
    }

    pub async fn list_all(&self) -> Result<Vec<Value>, AppError> {
        self.read_records()
    }

    // Insere um registro que já carrega seu `id` (a camada de API decide a
    // política de emissão). Ids duplicados são rejeitados.
    pub async fn insert(&self, record: Value) -> Result<Value, AppError> {
        let record = Value::Object(as_object(record)?);
        let id = record_id(&record).ok_or_else(|| {
            AppError::InvalidRecord("registro sem campo `id`".to_owned())
        })?;

        let _guard = self.write_guard.lock().await;
        let mut records = self.read_records()?;
        if records.iter().any(|r| record_id(r).as_ref() == Some(&id)) {
            return Err(AppError::DuplicateId {
                bucket: self.bucket.to_owned(),
                id,
            });
        }
        records.push(record.clone());
        self.write_records(&records)?;

        Ok(record)
    }

    // Merge raso: os campos do parcial sobrescrevem os existentes, campos
    // não mencionados permanecem. Id ausente é o único erro de domínio.
    pub async fn merge(&self, id: &RecordId, partial: Value) -> Result<Value, AppError> {
        let partial = as_object(partial)?;

        let _guard = self.write_guard.lock().await;
        let mut records = self.read_records()?;
        let pos = records
            .iter()
            .position(|r| record_id(r).as_ref() == Some(id))
            .ok_or_else(|| AppError::not_found(self.bucket, id.clone()))?;

        match &mut records[pos] {
            Value::Object(map) => {
                for (key, value) in partial {
                    map.insert(key, value);
                }
            }
            _ => {
                return Err(AppError::InvalidRecord(
                    "registro armazenado não é um objeto JSON".to_owned(),
                ));
            }
        }

        let merged = records[pos].clone();
        self.write_records(&records)?;

        Ok(merged)
    }

    // Remoção por filtragem: id ausente é um no-op, não um erro.
    pub async fn remove(&self, id: &RecordId) -> Result<(), AppError> {
        let _guard = self.write_guard.lock().await;
        let mut records = self.read_records()?;
        records.retain(|r| record_id(r).as_ref() != Some(id));
        self.write_records(&records)
    }
}
