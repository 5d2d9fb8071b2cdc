// src/lib.rs

// Declaração dos nossos módulos; o binário e os testes de integração
// consomem tudo daqui.
pub mod common;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod views;

pub use common::error::AppError;
pub use config::{AppState, Config};
