// src/services/pool_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MemoryStore,
    models::{
        auth::{Role, User},
        pool::{Pool, PoolPayload},
    },
    services::authz,
};

#[derive(Clone)]
pub struct PoolService {
    store: MemoryStore,
}

impl PoolService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, actor: &User) -> Vec<Pool> {
        let data = self.store.read().await;
        authz::visible_pools(actor, &data.pools)
    }

    pub async fn get(&self, actor: &User, pool_id: Uuid) -> Result<Pool, AppError> {
        let data = self.store.read().await;
        let pool = data.pool(pool_id).ok_or_else(|| AppError::not_found("Piscina"))?;
        if !authz::can_access_pool(actor, pool) {
            return Err(AppError::permission_denied("ver esta piscina"));
        }
        Ok(pool.clone())
    }

    // --- CREATE ---
    pub async fn create_pool(&self, actor: &User, payload: PoolPayload) -> Result<Pool, AppError> {
        if !authz::can_manage_pools(actor.role) {
            return Err(AppError::permission_denied("criar piscinas"));
        }

        let company_id =
            authz::resolve_target_company(actor, payload.company_id, "criar piscinas aqui")?;

        let mut data = self.store.write().await;

        if data.company(company_id).is_none() {
            return Err(AppError::not_found("Empresa"));
        }

        let now = Utc::now();
        let pool = Pool {
            id: Uuid::new_v4(),
            company_id,
            status: payload.status,
            pool_name: payload.pool_name,
            pool_location: payload.pool_location,
            pool_picture: payload.pool_picture,
            owner_email: payload.owner_email,
            extra_info: payload.extra_info,
            pump: payload.pump,
            has_heatpump: payload.has_heatpump,
            heatpump: payload.heatpump,
            has_ph_controller: payload.has_ph_controller,
            salt_system_model: payload.salt_system_model,
            salt_system_image: payload.salt_system_image,
            sand_filter_model: payload.sand_filter_model,
            sand_filter_sand_amount: payload.sand_filter_sand_amount,
            pool_cover: payload.pool_cover,
            grouting_type: payload.grouting_type,
            tile_image: payload.tile_image,
            loses_water: payload.loses_water,
            water_loss_reason: payload.water_loss_reason,
            water_filling_on: payload.water_filling_on,
            send_record_notification_on_creation: payload.send_record_notification_on_creation,
            created_at: now,
            updated_at: now,
        };

        data.pools.push(pool.clone());

        // Técnico que cadastra a piscina já sai com acesso a ela (senão
        // criaria algo que não consegue ver). Mesmo lock, mesma transação.
        if actor.role == Role::Technician {
            if let Some(creator) = data.user_mut(actor.id) {
                if !creator.accessible_pool_ids.contains(&pool.id) {
                    creator.accessible_pool_ids.push(pool.id);
                }
            }
        }

        Ok(pool)
    }

    // --- UPDATE ---
    pub async fn update_pool(
        &self,
        actor: &User,
        pool_id: Uuid,
        payload: PoolPayload,
    ) -> Result<Pool, AppError> {
        if !authz::can_manage_pools(actor.role) {
            return Err(AppError::permission_denied("editar piscinas"));
        }

        let mut data = self.store.write().await;

        let current = data
            .pool(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        authz::require_same_company(actor, current.company_id, "editar esta piscina")?;
        if !authz::can_access_pool(actor, current) {
            return Err(AppError::permission_denied("editar esta piscina"));
        }

        let pool = data
            .pool_mut(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;

        // A empresa da piscina não muda em update; o restante vem do form
        pool.status = payload.status;
        pool.pool_name = payload.pool_name;
        pool.pool_location = payload.pool_location;
        pool.pool_picture = payload.pool_picture;
        pool.owner_email = payload.owner_email;
        pool.extra_info = payload.extra_info;
        pool.pump = payload.pump;
        pool.has_heatpump = payload.has_heatpump;
        pool.heatpump = payload.heatpump;
        pool.has_ph_controller = payload.has_ph_controller;
        pool.salt_system_model = payload.salt_system_model;
        pool.salt_system_image = payload.salt_system_image;
        pool.sand_filter_model = payload.sand_filter_model;
        pool.sand_filter_sand_amount = payload.sand_filter_sand_amount;
        pool.pool_cover = payload.pool_cover;
        pool.grouting_type = payload.grouting_type;
        pool.tile_image = payload.tile_image;
        pool.loses_water = payload.loses_water;
        pool.water_loss_reason = payload.water_loss_reason;
        pool.water_filling_on = payload.water_filling_on;
        pool.send_record_notification_on_creation = payload.send_record_notification_on_creation;
        pool.updated_at = Utc::now();

        Ok(pool.clone())
    }

    // --- DELETE ---
    pub async fn delete_pool(&self, actor: &User, pool_id: Uuid) -> Result<(), AppError> {
        if !authz::can_delete_pools(actor.role) {
            return Err(AppError::permission_denied("remover piscinas"));
        }

        let mut data = self.store.write().await;

        let pool = data
            .pool(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        authz::require_same_company(actor, pool.company_id, "remover esta piscina")?;

        // O cascade limpa registros e TODAS as allow-lists de uma vez
        data.remove_pool_cascade(pool_id);
        Ok(())
    }

    // --- ACESSO (a referência cruzada piscina <-> usuário) ---
    // Concede acesso a um Technician/Client. Tudo é validado antes de
    // qualquer mutação: ou os dois lados ficam consistentes, ou nada muda.
    pub async fn grant_access(
        &self,
        actor: &User,
        pool_id: Uuid,
        user_id: Uuid,
    ) -> Result<User, AppError> {
        if !authz::can_manage_users(actor.role) {
            return Err(AppError::permission_denied("gerenciar acesso às piscinas"));
        }

        let mut data = self.store.write().await;

        let pool = data
            .pool(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        authz::require_same_company(actor, pool.company_id, "gerenciar esta piscina")?;

        let pool_company = pool.company_id;
        let target = data.user(user_id).ok_or(AppError::UserNotFound)?;

        if target.company_id != Some(pool_company) {
            return Err(AppError::InvalidInput(
                "O usuário não pertence à empresa desta piscina.".to_string(),
            ));
        }
        if !matches!(target.role, Role::Technician | Role::Client) {
            return Err(AppError::InvalidInput(
                "Apenas técnicos e clientes usam lista de acesso.".to_string(),
            ));
        }

        let user = data.user_mut(user_id).ok_or(AppError::UserNotFound)?;
        // Idempotente: conceder duas vezes não duplica
        if !user.accessible_pool_ids.contains(&pool_id) {
            user.accessible_pool_ids.push(pool_id);
            user.updated_at = Utc::now();
        }

        Ok(user.clone())
    }

    // Revogação: o inverso exato do grant (grant + revoke devolve a
    // allow-list ao estado original).
    pub async fn revoke_access(
        &self,
        actor: &User,
        pool_id: Uuid,
        user_id: Uuid,
    ) -> Result<User, AppError> {
        if !authz::can_manage_users(actor.role) {
            return Err(AppError::permission_denied("gerenciar acesso às piscinas"));
        }

        let mut data = self.store.write().await;

        let pool = data
            .pool(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        authz::require_same_company(actor, pool.company_id, "gerenciar esta piscina")?;

        let user = data.user_mut(user_id).ok_or(AppError::UserNotFound)?;
        if user.accessible_pool_ids.contains(&pool_id) {
            user.accessible_pool_ids.retain(|pid| *pid != pool_id);
            user.updated_at = Utc::now();
        }

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::{company, pool, user};
    use crate::db::StoreData;
    use crate::models::pool::{PoolPayload, PoolStatus, Pump};

    fn payload() -> PoolPayload {
        PoolPayload {
            company_id: None,
            status: PoolStatus::Active,
            pool_name: "Nova Piscina".into(),
            pool_location: "Rua X, 100".into(),
            pool_picture: None,
            owner_email: None,
            extra_info: None,
            pump: Pump::default(),
            has_heatpump: false,
            heatpump: None,
            has_ph_controller: false,
            salt_system_model: None,
            salt_system_image: None,
            sand_filter_model: None,
            sand_filter_sand_amount: None,
            pool_cover: None,
            grouting_type: None,
            tile_image: None,
            loses_water: false,
            water_loss_reason: None,
            water_filling_on: false,
            send_record_notification_on_creation: false,
        }
    }

    #[tokio::test]
    async fn grant_then_revoke_restores_allow_list() {
        let mut data = StoreData::default();
        let c = company();
        let p = pool(c.id);
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let tech = user(Role::Technician, Some(c.id), vec![]);
        let (pool_id, tech_id) = (p.id, tech.id);

        data.companies.push(c);
        data.pools.push(p);
        data.users.extend([admin.clone(), tech]);

        let service = PoolService::new(MemoryStore::new(data));

        let granted = service.grant_access(&admin, pool_id, tech_id).await.unwrap();
        assert_eq!(granted.accessible_pool_ids, vec![pool_id]);

        // Conceder de novo é idempotente
        let granted = service.grant_access(&admin, pool_id, tech_id).await.unwrap();
        assert_eq!(granted.accessible_pool_ids, vec![pool_id]);

        let revoked = service.revoke_access(&admin, pool_id, tech_id).await.unwrap();
        assert!(revoked.accessible_pool_ids.is_empty());
    }

    #[tokio::test]
    async fn cross_company_delete_is_denied_without_mutation() {
        let mut data = StoreData::default();
        let c1 = company();
        let c2 = company();
        let foreign_pool = pool(c2.id);
        let admin_c1 = user(Role::Admin, Some(c1.id), vec![]);
        let pool_id = foreign_pool.id;

        data.companies.extend([c1, c2]);
        data.pools.push(foreign_pool);

        let store = MemoryStore::new(data);
        let service = PoolService::new(store.clone());

        let result = service.delete_pool(&admin_c1, pool_id).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));

        // Nada mudou na store
        assert!(store.read().await.pool(pool_id).is_some());
    }

    #[tokio::test]
    async fn client_cannot_create_pool() {
        let mut data = StoreData::default();
        let c = company();
        let client = user(Role::Client, Some(c.id), vec![]);
        data.companies.push(c);

        let service = PoolService::new(MemoryStore::new(data));
        let result = service.create_pool(&client, payload()).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn technician_creator_gets_access_to_the_new_pool() {
        let mut data = StoreData::default();
        let c = company();
        let tech = user(Role::Technician, Some(c.id), vec![]);
        let tech_id = tech.id;
        data.companies.push(c);
        data.users.push(tech.clone());

        let store = MemoryStore::new(data);
        let service = PoolService::new(store.clone());

        let created = service.create_pool(&tech, payload()).await.unwrap();

        let data = store.read().await;
        assert!(data
            .user(tech_id)
            .unwrap()
            .accessible_pool_ids
            .contains(&created.id));
    }

    #[tokio::test]
    async fn grant_rejects_user_from_another_company() {
        let mut data = StoreData::default();
        let c1 = company();
        let c2 = company();
        let p = pool(c1.id);
        let admin = user(Role::Admin, Some(c1.id), vec![]);
        let outsider = user(Role::Technician, Some(c2.id), vec![]);
        let (pool_id, outsider_id) = (p.id, outsider.id);

        data.companies.extend([c1, c2]);
        data.pools.push(p);
        data.users.extend([admin.clone(), outsider]);

        let service = PoolService::new(MemoryStore::new(data));
        let result = service.grant_access(&admin, pool_id, outsider_id).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
