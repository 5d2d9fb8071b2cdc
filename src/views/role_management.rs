// src/views/role_management.rs

use std::sync::Arc;

use crate::common::error::AppError;
use crate::models::rbac::{Permission, Role, RoleForm};
use crate::services::rbac_service::RoleDirectory;

// Estado do modal da tela de cargos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Create,
    Edit(u64),
}

// Um aviso exibível ao usuário. Falhas de validação e da API viram avisos
// em vez de sumirem em silêncio.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
}

// A tela de gerenciamento de cargos. O estado local é apenas cache de
// exibição: toda mutação passa pelo diretório e é seguida de um refresh.
pub struct RoleManagementView {
    directory: Arc<dyn RoleDirectory>,
    pub roles: Vec<Role>,
    pub catalog: Vec<Permission>,
    pub modal: ModalState,
    pub form: RoleForm,
    pub notices: Vec<Notice>,
}

impl RoleManagementView {
    pub async fn new(directory: Arc<dyn RoleDirectory>) -> Result<Self, AppError> {
        let mut view = Self {
            directory,
            roles: Vec::new(),
            catalog: Vec::new(),
            modal: ModalState::Closed,
            form: RoleForm::default(),
            notices: Vec::new(),
        };
        view.refresh().await?;
        Ok(view)
    }

    // Recarrega cargos e catálogo de permissões a partir do diretório.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.roles = self.directory.list_roles().await?;
        self.catalog = self.directory.list_permissions().await?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.form.clear();
        self.modal = ModalState::Create;
    }

    pub fn open_edit(&mut self, role_id: u64) {
        match self.roles.iter().find(|r| r.id == role_id) {
            Some(role) => {
                self.form = RoleForm::from_role(role);
                self.modal = ModalState::Edit(role_id);
            }
            None => self.notify(format!("Cargo {role_id} não está mais na lista.")),
        }
    }

    // Cancelar/fechar: descarta o formulário sem salvar.
    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
        self.form.clear();
    }

    // Marca/desmarca um checkbox de permissão. Alternar duas vezes devolve
    // o formulário ao conjunto original.
    pub fn toggle_permission(&mut self, permission_id: &str) {
        if let Some(pos) = self
            .form
            .permissions
            .iter()
            .position(|p| p == permission_id)
        {
            self.form.permissions.remove(pos);
        } else {
            self.form.permissions.push(permission_id.to_owned());
        }
    }

    // Submete o formulário: cria em modo Create, substitui os campos do
    // cargo em modo Edit. Qualquer falha vira um aviso e o modal permanece
    // aberto; só o refresh pós-sucesso propaga erro.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        let outcome = match self.modal {
            ModalState::Closed => return Ok(()),
            ModalState::Create => self
                .directory
                .create_role(self.form.clone())
                .await
                .map(|_| ()),
            ModalState::Edit(id) => self
                .directory
                .update_role(id, self.form.clone())
                .await
                .map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                self.close_modal();
                self.refresh().await
            }
            Err(e) => {
                self.notify(e.to_string());
                Ok(())
            }
        }
    }

    pub async fn delete_role(&mut self, role_id: u64) -> Result<(), AppError> {
        match self.directory.delete_role(role_id).await {
            Ok(_) => self.refresh().await,
            Err(e) => {
                self.notify(e.to_string());
                Ok(())
            }
        }
    }

    // Resolve o label de exibição contra o registro; slug desconhecido é
    // exibido cru.
    pub fn permission_label(&self, permission_id: &str) -> String {
        self.catalog
            .iter()
            .find(|p| p.id == permission_id)
            .map(|p| p.label.clone())
            .unwrap_or_else(|| permission_id.to_owned())
    }

    pub fn permission_labels(&self, role: &Role) -> Vec<String> {
        role.permissions
            .iter()
            .map(|p| self.permission_label(p))
            .collect()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("⚠️ {message}");
        self.notices.push(Notice { message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BucketRepository, IdSource, KvStore};
    use crate::services::api::{IdPolicy, ResourceApi};
    use crate::services::rbac_service::RbacService;
    use std::time::Duration;

    fn apis() -> (ResourceApi, ResourceApi) {
        let store = KvStore::in_memory();
        let roles = ResourceApi::new(
            BucketRepository::new(store.clone(), "roles"),
            IdPolicy::Generated(IdSource::new()),
            Duration::ZERO,
        );
        let permissions = ResourceApi::new(
            BucketRepository::new(store, "permissions"),
            IdPolicy::SlugField,
            Duration::ZERO,
        );
        (roles, permissions)
    }

    async fn view() -> RoleManagementView {
        let (roles, permissions) = apis();
        let service = RbacService::new(roles, permissions);
        service.seed_default_permissions().await.unwrap();
        RoleManagementView::new(Arc::new(service)).await.unwrap()
    }

    #[tokio::test]
    async fn open_create_starts_from_a_clean_form() {
        let mut view = view().await;
        view.open_create();
        view.toggle_permission("create_user");
        view.close_modal();

        view.open_create();
        assert_eq!(view.modal, ModalState::Create);
        assert_eq!(view.form, RoleForm::default());
    }

    #[tokio::test]
    async fn double_toggle_restores_the_permission_set() {
        let mut view = view().await;
        view.open_create();
        view.toggle_permission("edit_user");
        let before = view.form.permissions.clone();

        view.toggle_permission("manage_roles");
        view.toggle_permission("manage_roles");
        assert_eq!(view.form.permissions, before);
    }

    #[tokio::test]
    async fn submit_in_create_mode_appends_a_role() {
        let mut view = view().await;
        view.open_create();
        view.form.name = "Admin".to_owned();
        view.form.description = "Acesso total".to_owned();
        view.toggle_permission("create_user");

        view.submit().await.unwrap();

        assert_eq!(view.modal, ModalState::Closed);
        assert_eq!(view.form, RoleForm::default());
        assert_eq!(view.roles.len(), 1);
        assert_eq!(view.roles[0].name, "Admin");
        assert_eq!(view.roles[0].permissions, vec!["create_user".to_owned()]);
    }

    #[tokio::test]
    async fn submit_in_edit_mode_replaces_the_role_in_place() {
        let mut view = view().await;
        view.open_create();
        view.form.name = "Editor".to_owned();
        view.submit().await.unwrap();
        let id = view.roles[0].id;

        view.open_edit(id);
        assert_eq!(view.form.name, "Editor");
        view.form.name = "Revisor".to_owned();
        view.toggle_permission("edit_user");
        view.submit().await.unwrap();

        assert_eq!(view.roles.len(), 1);
        assert_eq!(view.roles[0].id, id);
        assert_eq!(view.roles[0].name, "Revisor");
        assert_eq!(view.roles[0].permissions, vec!["edit_user".to_owned()]);
    }

    #[tokio::test]
    async fn open_edit_on_a_missing_role_raises_a_notice() {
        let mut view = view().await;
        view.open_edit(404);
        assert_eq!(view.modal, ModalState::Closed);
        assert_eq!(view.take_notices().len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_keeps_the_modal_open_and_notifies() {
        let mut view = view().await;
        view.open_create();
        // Nome obrigatório ausente.
        view.submit().await.unwrap();

        assert_eq!(view.modal, ModalState::Create);
        assert_eq!(view.take_notices().len(), 1);
        assert!(view.roles.is_empty());
    }

    #[tokio::test]
    async fn delete_role_removes_it_from_the_list() {
        let mut view = view().await;
        view.open_create();
        view.form.name = "Temporário".to_owned();
        view.submit().await.unwrap();
        let id = view.roles[0].id;

        view.delete_role(id).await.unwrap();
        assert!(view.roles.is_empty());

        // Apagar de novo é um no-op sem aviso.
        view.delete_role(id).await.unwrap();
        assert!(view.take_notices().is_empty());
    }

    #[tokio::test]
    async fn unknown_slugs_fall_back_to_the_raw_identifier() {
        let mut view = view().await;
        view.open_create();
        view.form.name = "Legado".to_owned();
        view.form.permissions = vec!["acesso_antigo".to_owned(), "edit_user".to_owned()];
        view.submit().await.unwrap();

        let labels = view.permission_labels(&view.roles[0]);
        assert_eq!(
            labels,
            vec!["acesso_antigo".to_owned(), "Edit User".to_owned()]
        );
    }

    #[tokio::test]
    async fn simulated_api_failure_surfaces_as_a_notice() {
        let (roles, permissions) = apis();
        let healthy = RbacService::new(roles.clone(), permissions.clone());
        healthy.seed_default_permissions().await.unwrap();
        let mut view = RoleManagementView::new(Arc::new(healthy)).await.unwrap();

        // Troca o diretório por um com o caminho de falha simulada ligado.
        view.directory = Arc::new(RbacService::new(roles.failing(), permissions));

        view.open_create();
        view.form.name = "Nunca criado".to_owned();
        view.submit().await.unwrap();

        assert_eq!(view.modal, ModalState::Create);
        assert_eq!(view.take_notices().len(), 1);
    }
}
