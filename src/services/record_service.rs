// src/services/record_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MemoryStore,
    models::{
        auth::{Role, User},
        record::{CreateRecordPayload, PoolRecord},
    },
    services::authz,
};

#[derive(Clone)]
pub struct RecordService {
    store: MemoryStore,
}

impl RecordService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    // Todos os registros ao alcance do usuário (a página "Records" do app)
    pub async fn list_all(&self, actor: &User) -> Vec<PoolRecord> {
        let data = self.store.read().await;
        let mut records = authz::visible_records(actor, &data.pools, &data.records);
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    // Histórico de uma piscina específica (mais recente primeiro)
    pub async fn list_for_pool(
        &self,
        actor: &User,
        pool_id: Uuid,
    ) -> Result<Vec<PoolRecord>, AppError> {
        let data = self.store.read().await;

        let pool = data
            .pool(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        if !authz::can_access_pool(actor, pool) {
            return Err(AppError::permission_denied("ver esta piscina"));
        }

        let mut records: Vec<PoolRecord> = data
            .records
            .iter()
            .filter(|r| r.pool_id == pool_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    // --- CREATE (a visita do técnico) ---
    // Cliente é somente-leitura; Admin/Technician registram, e só em
    // piscinas ao seu alcance.
    pub async fn create_record(
        &self,
        actor: &User,
        pool_id: Uuid,
        payload: CreateRecordPayload,
    ) -> Result<PoolRecord, AppError> {
        if !matches!(
            actor.role,
            Role::Superadmin | Role::Admin | Role::Technician
        ) {
            return Err(AppError::permission_denied("registrar manutenções"));
        }

        let mut data = self.store.write().await;

        let pool = data
            .pool(pool_id)
            .ok_or_else(|| AppError::not_found("Piscina"))?;
        authz::require_same_company(actor, pool.company_id, "registrar nesta piscina")?;
        if !authz::can_access_pool(actor, pool) {
            return Err(AppError::permission_denied("registrar nesta piscina"));
        }

        if pool.send_record_notification_on_creation {
            // TODO: disparar o e-mail de notificação quando o serviço de
            // notificações entrar (o flag já vem do cadastro da piscina)
            tracing::info!(pool = %pool.pool_name, "Registro com notificação habilitada");
        }

        let record = PoolRecord {
            id: Uuid::new_v4(),
            pool_id,
            created_at: Utc::now(),
            ph: payload.ph,
            cl: payload.cl,
            chlorine_type: payload.chlorine_type,
            chlorine_quantity: payload.chlorine_quantity,
            flocculant_type: payload.flocculant_type,
            flocculant_quantity: payload.flocculant_quantity,
            salt_quantity: payload.salt_quantity,
            acid_quantity: payload.acid_quantity,
            ph_plus_quantity: payload.ph_plus_quantity,
            ph_minus_quantity: payload.ph_minus_quantity,
            algaecide_quantity: payload.algaecide_quantity,
            chlorine_tablets_quantity: payload.chlorine_tablets_quantity,
            vacuumed: payload.vacuumed,
            brushed: payload.brushed,
            leaves_cleaned: payload.leaves_cleaned,
            overall_state: payload.overall_state,
            weather_status: payload.weather_status,
        };

        data.records.push(record.clone());
        Ok(record)
    }
}
