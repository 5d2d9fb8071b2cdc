// src/main.rs

use std::sync::Arc;

use serde_json::{Map, json};

use painel_admin::config::AppState;
use painel_admin::views::RoleManagementView;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    tracing::info!("🚀 Painel administrativo pronto (buckets: users, roles, permissions).");

    walkthrough(&app_state)
        .await
        .expect("Falha na sessão de demonstração.");
}

// Uma sessão roteirizada da tela de cargos, com a API simulada (e sua
// latência) no caminho de cada passo.
async fn walkthrough(app_state: &AppState) -> anyhow::Result<()> {
    let mut view = RoleManagementView::new(Arc::new(app_state.rbac_service.clone())).await?;

    // Cria um cargo pelo modal.
    view.open_create();
    view.form.name = "Admin".to_owned();
    view.form.description = "Full system access".to_owned();
    for slug in ["create_user", "edit_user", "delete_user", "manage_roles"] {
        view.toggle_permission(slug);
    }
    view.submit().await?;

    let admin_id = view
        .roles
        .last()
        .map(|r| r.id)
        .ok_or_else(|| anyhow::anyhow!("O cargo criado não apareceu na listagem."))?;
    tracing::info!("✅ Cargo criado com id {admin_id}.");

    for role in &view.roles {
        tracing::info!(
            "📋 {} — {} — [{}]",
            role.name,
            role.description,
            view.permission_labels(role).join(", ")
        );
    }

    // Edita: troca a descrição e desmarca uma permissão.
    view.open_edit(admin_id);
    view.form.description = "Acesso total ao sistema".to_owned();
    view.toggle_permission("delete_user");
    view.submit().await?;
    tracing::info!("✅ Cargo {admin_id} editado.");

    // O CRUD de usuários, direto pelo serviço tipado.
    let mut profile = Map::new();
    profile.insert("name".to_owned(), json!("Tester"));
    profile.insert("email".to_owned(), json!("tester@exemplo.dev"));
    let user = app_state.user_service.create_user(profile).await?;
    tracing::info!("✅ Usuário criado com id {}.", user.id);

    let mut partial = Map::new();
    partial.insert("name".to_owned(), json!("Tester2"));
    let user = app_state.user_service.update_user(user.id, partial).await?;
    tracing::info!(
        "✅ Usuário {} renomeado para {:?}.",
        user.id,
        user.profile.get("name")
    );

    app_state.user_service.delete_user(user.id).await?;
    tracing::info!("✅ Usuário {} removido.", user.id);

    // O caminho de falha simulada, opt-in por chamada.
    if let Err(e) = app_state.roles_api.failing().list().await {
        tracing::warn!("⚠️ Falha simulada, como pedida: {e}");
    }

    // Limpa o cargo da demonstração.
    view.delete_role(admin_id).await?;
    tracing::info!("✅ Sessão de demonstração concluída.");

    Ok(())
}
