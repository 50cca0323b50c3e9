// src/services/company_service.rs

use bcrypt::hash;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MemoryStore,
    models::{
        auth::{Role, User, UserStatus},
        company::{Company, CompanyWithAdmin, CreateCompanyPayload, UpdateCompanyPayload},
    },
    services::authz,
};

#[derive(Clone)]
pub struct CompanyService {
    store: MemoryStore,
}

impl CompanyService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, actor: &User) -> Vec<Company> {
        let data = self.store.read().await;
        authz::visible_companies(actor, &data.companies)
    }

    // --- CREATE (Superadmin) ---
    // A empresa nasce junto com o Admin dono: ou os dois entram na store,
    // ou nenhum.
    pub async fn create_company(
        &self,
        actor: &User,
        payload: CreateCompanyPayload,
    ) -> Result<CompanyWithAdmin, AppError> {
        if !authz::can_manage_companies(actor.role) {
            return Err(AppError::permission_denied("criar empresas"));
        }

        // 1. Hashing fora do lock (bcrypt é pesado)
        let password = payload.admin_password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Transação: valida e cria o par Company + Admin
        let mut data = self.store.write().await;

        if data.user_by_email(&payload.admin_email).is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let company_id = Uuid::new_v4();

        let admin = User {
            id: Uuid::new_v4(),
            name: payload.admin_name,
            email: payload.admin_email,
            role: Role::Admin,
            status: UserStatus::Invited,
            avatar: None,
            last_login: None,
            accessible_pool_ids: Vec::new(),
            company_id: Some(company_id),
            password_hash,
            force_password_change: true,
            created_at: now,
            updated_at: now,
        };

        let company = Company {
            id: company_id,
            name: payload.name,
            owner_admin_id: admin.id,
            logo: payload.logo,
            enable_record_notifications: payload.enable_record_notifications,
            created_at: now,
            updated_at: now,
        };

        data.companies.push(company.clone());
        data.users.push(admin.clone());

        tracing::info!("🏢 Empresa '{}' criada com admin '{}'", company.name, admin.email);

        Ok(CompanyWithAdmin { company, admin })
    }

    // --- UPDATE (Superadmin ou o Admin da própria empresa) ---
    pub async fn update_company(
        &self,
        actor: &User,
        company_id: Uuid,
        payload: UpdateCompanyPayload,
    ) -> Result<Company, AppError> {
        if !matches!(actor.role, Role::Superadmin | Role::Admin) {
            return Err(AppError::permission_denied("editar esta empresa"));
        }

        let mut data = self.store.write().await;

        // Valida antes de mutar
        if data.company(company_id).is_none() {
            return Err(AppError::not_found("Empresa"));
        }
        authz::require_same_company(actor, company_id, "editar esta empresa")?;

        let company = data
            .company_mut(company_id)
            .ok_or_else(|| AppError::not_found("Empresa"))?;

        if let Some(name) = payload.name {
            company.name = name;
        }
        if let Some(logo) = payload.logo {
            company.logo = Some(logo);
        }
        if let Some(flag) = payload.enable_record_notifications {
            company.enable_record_notifications = flag;
        }
        company.updated_at = Utc::now();

        Ok(company.clone())
    }

    // --- DELETE (Superadmin) ---
    // Remove a partição inteira do tenant, sem deixar referências órfãs.
    pub async fn delete_company(&self, actor: &User, company_id: Uuid) -> Result<(), AppError> {
        if !authz::can_manage_companies(actor.role) {
            return Err(AppError::permission_denied("remover empresas"));
        }

        let mut data = self.store.write().await;
        data.remove_company_cascade(company_id)
            .ok_or_else(|| AppError::not_found("Empresa"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::user;
    use crate::db::StoreData;

    fn payload() -> CreateCompanyPayload {
        CreateCompanyPayload {
            name: "AquaBlue Serviços".into(),
            logo: None,
            enable_record_notifications: true,
            admin_name: "Dono da AquaBlue".into(),
            admin_email: "dono@aquablue.com".into(),
            admin_password: "senha-inicial".into(),
        }
    }

    #[tokio::test]
    async fn superadmin_mints_company_with_owner_admin() {
        let superadmin = user(Role::Superadmin, None, vec![]);
        let store = MemoryStore::new(StoreData::default());
        let service = CompanyService::new(store.clone());

        let created = service
            .create_company(&superadmin, payload())
            .await
            .unwrap();

        // O par nasce consistente: admin aponta para a empresa nova e
        // a empresa aponta para o admin dono
        assert_eq!(created.admin.company_id, Some(created.company.id));
        assert_eq!(created.company.owner_admin_id, created.admin.id);
        assert_eq!(created.admin.role, Role::Admin);
        assert!(created.admin.force_password_change);

        let data = store.read().await;
        assert_eq!(data.companies.len(), 1);
        assert_eq!(data.users.len(), 1);
    }

    #[tokio::test]
    async fn admin_cannot_create_companies() {
        let admin = user(Role::Admin, Some(Uuid::new_v4()), vec![]);
        let service = CompanyService::new(MemoryStore::new(StoreData::default()));

        let result = service.create_company(&admin, payload()).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn admin_updates_only_own_company() {
        let mut data = StoreData::default();
        let own = crate::db::store::test_support::company();
        let other = crate::db::store::test_support::company();
        let admin = user(Role::Admin, Some(own.id), vec![]);
        let (own_id, other_id) = (own.id, other.id);
        data.companies.extend([own, other]);

        let service = CompanyService::new(MemoryStore::new(data));

        let update = UpdateCompanyPayload {
            name: Some("ProPools Renovada".into()),
            logo: None,
            enable_record_notifications: None,
        };
        let updated = service
            .update_company(&admin, own_id, update)
            .await
            .unwrap();
        assert_eq!(updated.name, "ProPools Renovada");

        let update = UpdateCompanyPayload {
            name: Some("Invasão".into()),
            logo: None,
            enable_record_notifications: None,
        };
        let result = service.update_company(&admin, other_id, update).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }
}
