// src/services/user_service.rs

use bcrypt::hash;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MemoryStore, StoreData},
    models::auth::{CreateUserPayload, Role, UpdateUserPayload, User, UserStatus},
    services::authz,
};

#[derive(Clone)]
pub struct UserService {
    store: MemoryStore,
}

// Toda allow-list gravada precisa apontar para piscinas existentes DA
// MESMA empresa do usuário. Validação compartilhada por create e update.
fn check_allow_list(
    data: &StoreData,
    company_id: Uuid,
    pool_ids: &[Uuid],
) -> Result<(), AppError> {
    for pool_id in pool_ids {
        let pool = data
            .pool(*pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        if pool.company_id != company_id {
            return Err(AppError::InvalidInput(
                "A lista de acesso referencia piscina de outra empresa.".to_string(),
            ));
        }
    }
    Ok(())
}

impl UserService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, actor: &User) -> Vec<User> {
        let data = self.store.read().await;
        authz::visible_users(actor, &data.users)
    }

    // --- CREATE (convite) ---
    // Admin convida para a própria empresa; Superadmin aponta a empresa
    // alvo. Ninguém cria Superadmin pela API.
    pub async fn create_user(
        &self,
        actor: &User,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        if !authz::can_manage_users(actor.role) {
            return Err(AppError::permission_denied("criar usuários"));
        }
        if payload.role == Role::Superadmin {
            return Err(AppError::InvalidInput(
                "Não é possível criar usuários Superadmin.".to_string(),
            ));
        }

        let company_id =
            authz::resolve_target_company(actor, payload.company_id, "criar usuários aqui")?;

        // 1. Hashing fora do lock
        let password = payload.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Transação: todas as checagens antes de qualquer push
        let mut data = self.store.write().await;

        if data.company(company_id).is_none() {
            return Err(AppError::not_found("Empresa"));
        }
        if data.user_by_email(&payload.email).is_some() {
            return Err(AppError::EmailAlreadyExists);
        }
        check_allow_list(&data, company_id, &payload.accessible_pool_ids)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: payload.name,
            email: payload.email,
            role: payload.role,
            status: UserStatus::Invited,
            avatar: None,
            last_login: None,
            accessible_pool_ids: payload.accessible_pool_ids,
            company_id: Some(company_id),
            password_hash,
            force_password_change: true,
            created_at: now,
            updated_at: now,
        };

        data.users.push(user.clone());
        Ok(user)
    }

    // --- UPDATE ---
    pub async fn update_user(
        &self,
        actor: &User,
        user_id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        if !authz::can_manage_users(actor.role) {
            return Err(AppError::permission_denied("editar usuários"));
        }
        if payload.role == Some(Role::Superadmin) {
            return Err(AppError::InvalidInput(
                "Não é possível promover usuários a Superadmin.".to_string(),
            ));
        }

        let mut data = self.store.write().await;

        let target = data.user(user_id).ok_or(AppError::UserNotFound)?;
        if target.role == Role::Superadmin {
            return Err(AppError::permission_denied("editar este usuário"));
        }
        let target_company = target
            .company_id
            .ok_or_else(|| AppError::not_found("Empresa"))?;
        authz::require_same_company(actor, target_company, "editar este usuário")?;

        if let Some(email) = &payload.email {
            // E-mail novo não pode colidir com o de outro usuário
            if let Some(existing) = data.user_by_email(email) {
                if existing.id != user_id {
                    return Err(AppError::EmailAlreadyExists);
                }
            }
        }
        if let Some(pool_ids) = &payload.accessible_pool_ids {
            check_allow_list(&data, target_company, pool_ids)?;
        }

        let user = data.user_mut(user_id).ok_or(AppError::UserNotFound)?;

        if let Some(name) = payload.name {
            user.name = name;
        }
        if let Some(email) = payload.email {
            user.email = email;
        }
        if let Some(role) = payload.role {
            user.role = role;
        }
        if let Some(status) = payload.status {
            user.status = status;
        }
        if let Some(avatar) = payload.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(pool_ids) = payload.accessible_pool_ids {
            user.accessible_pool_ids = pool_ids;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    // --- DELETE ---
    pub async fn delete_user(&self, actor: &User, user_id: Uuid) -> Result<(), AppError> {
        if !authz::can_delete_users(actor.role) {
            return Err(AppError::permission_denied("remover usuários"));
        }

        let mut data = self.store.write().await;

        let target = data.user(user_id).ok_or(AppError::UserNotFound)?;
        if target.role == Role::Superadmin {
            return Err(AppError::permission_denied("remover este usuário"));
        }
        let target_company = target
            .company_id
            .ok_or_else(|| AppError::not_found("Empresa"))?;
        authz::require_same_company(actor, target_company, "remover este usuário")?;

        data.remove_user(user_id);
        // Tarefas do técnico removido saem junto (sem referências penduradas;
        // o histórico de consumo fica, os nomes lá são desnormalizados)
        data.tasks.retain(|t| t.technician_id != user_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::{company, pool, task, user};

    fn payload(role: Role) -> CreateUserPayload {
        CreateUserPayload {
            name: "Novo Usuário".into(),
            email: "novo@propools.com".into(),
            role,
            company_id: None,
            accessible_pool_ids: Vec::new(),
            password: "senha-segura".into(),
        }
    }

    #[tokio::test]
    async fn invited_user_is_created_with_hashed_password() {
        let mut data = StoreData::default();
        let c = company();
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let company_id = c.id;
        data.companies.push(c);
        data.users.push(admin.clone());

        let service = UserService::new(MemoryStore::new(data));
        let created = service
            .create_user(&admin, payload(Role::Technician))
            .await
            .unwrap();

        assert_eq!(created.company_id, Some(company_id));
        assert_eq!(created.status, UserStatus::Invited);
        assert!(created.force_password_change);
        // Nunca guardamos a senha em claro
        assert_ne!(created.password_hash, "senha-segura");
        assert!(bcrypt::verify("senha-segura", &created.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let mut data = StoreData::default();
        let c = company();
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let mut existing = user(Role::Client, Some(c.id), vec![]);
        existing.email = "novo@propools.com".into();

        data.companies.push(c);
        data.users.extend([admin.clone(), existing]);

        let service = UserService::new(MemoryStore::new(data));
        let result = service.create_user(&admin, payload(Role::Client)).await;
        assert!(matches!(result, Err(AppError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn nobody_creates_superadmins() {
        let mut data = StoreData::default();
        let c = company();
        let admin = user(Role::Admin, Some(c.id), vec![]);
        data.companies.push(c);

        let service = UserService::new(MemoryStore::new(data));
        let result = service.create_user(&admin, payload(Role::Superadmin)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn allow_list_cannot_reference_foreign_pools() {
        let mut data = StoreData::default();
        let c1 = company();
        let c2 = company();
        let foreign_pool = pool(c2.id);
        let admin = user(Role::Admin, Some(c1.id), vec![]);
        let foreign_pool_id = foreign_pool.id;

        data.companies.extend([c1, c2]);
        data.pools.push(foreign_pool);
        data.users.push(admin.clone());

        let service = UserService::new(MemoryStore::new(data));
        let mut p = payload(Role::Technician);
        p.accessible_pool_ids = vec![foreign_pool_id];

        let result = service.create_user(&admin, p).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn deleting_a_technician_removes_their_tasks() {
        let mut data = StoreData::default();
        let c = company();
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let tech = user(Role::Technician, Some(c.id), vec![]);
        let tech_id = tech.id;
        data.tasks.push(task(c.id, &tech));
        data.companies.push(c);
        data.users.extend([admin.clone(), tech]);

        let store = MemoryStore::new(data);
        let service = UserService::new(store.clone());

        service.delete_user(&admin, tech_id).await.unwrap();

        let data = store.read().await;
        assert!(data.user(tech_id).is_none());
        assert!(data.tasks.is_empty());
    }

    #[tokio::test]
    async fn admin_cannot_touch_users_of_another_company() {
        let mut data = StoreData::default();
        let c1 = company();
        let c2 = company();
        let admin_c1 = user(Role::Admin, Some(c1.id), vec![]);
        let outsider = user(Role::Client, Some(c2.id), vec![]);
        let outsider_id = outsider.id;

        data.companies.extend([c1, c2]);
        data.users.extend([admin_c1.clone(), outsider]);

        let service = UserService::new(MemoryStore::new(data));
        let result = service.delete_user(&admin_c1, outsider_id).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }
}
