// src/common/error.rs

use thiserror::Error;

use crate::db::bucket_repo::RecordId;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // O único erro de domínio da API simulada: update contra um id ausente.
    #[error("Registro '{id}' não encontrado no bucket '{bucket}'")]
    RecordNotFound { bucket: String, id: RecordId },

    // Falha genérica opt-in, simulando uma operação remota que rejeita.
    #[error("Erro de API: a operação falhou")]
    SimulatedFailure,

    #[error("Já existe um registro com o id '{id}' no bucket '{bucket}'")]
    DuplicateId { bucket: String, id: RecordId },

    #[error("Registro inválido: {0}")]
    InvalidRecord(String),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Erro de serialização do bucket")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro de armazenamento")]
    StorageError(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    // Helper para o erro de domínio mais comum.
    pub fn not_found(bucket: &str, id: impl Into<RecordId>) -> Self {
        AppError::RecordNotFound {
            bucket: bucket.to_owned(),
            id: id.into(),
        }
    }
}
