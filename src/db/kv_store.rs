// src/db/kv_store.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::common::error::AppError;

// O substrato de armazenamento: um análogo do localStorage do navegador.
// Cada chave guarda uma string (aqui, sempre um array JSON serializado) e
// `set_item` substitui o valor inteiro — não existe atualização parcial.
#[derive(Clone)]
pub struct KvStore {
    inner: Arc<Mutex<BTreeMap<String, String>>>,
    // Quando presente, o mapa inteiro é reescrito neste arquivo a cada escrita.
    path: Option<PathBuf>,
}

impl KvStore {
    // Armazenamento puramente em memória (testes e demonstração).
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BTreeMap::new())),
            path: None,
        }
    }

    // Abre um armazenamento com write-through para `path`.
    // Arquivo ausente ou ilegível começa vazio, como o localStorage faz.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_owned();
        let initial = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Arquivo de armazenamento {:?} ilegível ({}), começando vazio.",
                        path,
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(initial)),
            path: Some(path),
        }
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .expect("lock do armazenamento envenenado")
            .get(key)
            .cloned()
    }

    pub fn set_item(&self, key: &str, value: String) -> Result<(), AppError> {
        let mut map = self
            .inner
            .lock()
            .expect("lock do armazenamento envenenado");
        map.insert(key.to_owned(), value);

        if let Some(path) = &self.path {
            let raw = serde_json::to_string_pretty(&*map)?;
            std::fs::write(path, raw)?;
        }

        Ok(())
    }
}
