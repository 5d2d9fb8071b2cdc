// src/models/user.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Um usuário persistido no bucket "users": id numérico emitido na criação
// mais campos de perfil livres — o cadastro não fixa um esquema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,

    #[serde(flatten)]
    pub profile: Map<String, Value>,
}
