// src/db/id_source.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

// Emissor central de identificadores numéricos, compartilhado por todos os
// buckets. Ids tirados só do relógio colidem sob criação rápida; aqui cada
// emissão é o máximo entre o relógio e o último id emitido mais um, então
// o contador nunca repete.
#[derive(Clone)]
pub struct IdSource {
    last: Arc<AtomicU64>,
}

impl IdSource {
    pub fn new() -> Self {
        Self {
            last: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn next(&self) -> u64 {
        let now = Utc::now().timestamp_millis() as u64;
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => prev = observed,
            }
        }
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}
