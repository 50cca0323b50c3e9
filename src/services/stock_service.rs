// src/services/stock_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MemoryStore,
    models::{
        auth::User,
        stock::{RecordUsagePayload, StockItem, StockItemPayload, StockUsageRecord},
    },
    services::authz,
};

#[derive(Clone)]
pub struct StockService {
    store: MemoryStore,
}

impl StockService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn list_items(&self, actor: &User) -> Vec<StockItem> {
        let data = self.store.read().await;
        authz::visible_stock_items(actor, &data.stock_items)
    }

    // Itens na linha de reposição (quantidade <= limiar)
    pub async fn list_low_stock(&self, actor: &User) -> Vec<StockItem> {
        let data = self.store.read().await;
        authz::visible_stock_items(actor, &data.stock_items)
            .into_iter()
            .filter(|i| i.is_low())
            .collect()
    }

    pub async fn list_usage(&self, actor: &User) -> Vec<StockUsageRecord> {
        let data = self.store.read().await;
        authz::visible_usage_records(actor, &data.usage_records)
    }

    // --- CREATE ITEM ---
    pub async fn create_item(
        &self,
        actor: &User,
        payload: StockItemPayload,
    ) -> Result<StockItem, AppError> {
        if !authz::can_manage_stock(actor.role) {
            return Err(AppError::permission_denied("gerenciar o estoque"));
        }

        let company_id =
            authz::resolve_target_company(actor, payload.company_id, "criar itens aqui")?;

        let mut data = self.store.write().await;

        if data.company(company_id).is_none() {
            return Err(AppError::not_found("Empresa"));
        }

        let now = Utc::now();
        let item = StockItem {
            id: Uuid::new_v4(),
            company_id,
            name: payload.name,
            category: payload.category,
            quantity: payload.quantity,
            unit: payload.unit,
            supplier: payload.supplier,
            low_stock_threshold: payload.low_stock_threshold,
            created_at: now,
            updated_at: now,
        };

        data.stock_items.push(item.clone());
        Ok(item)
    }

    // --- UPDATE ITEM ---
    pub async fn update_item(
        &self,
        actor: &User,
        item_id: Uuid,
        payload: StockItemPayload,
    ) -> Result<StockItem, AppError> {
        if !authz::can_manage_stock(actor.role) {
            return Err(AppError::permission_denied("gerenciar o estoque"));
        }

        let mut data = self.store.write().await;

        let current = data
            .stock_item(item_id)
            .ok_or_else(|| AppError::not_found("Item de estoque"))?;
        authz::require_same_company(actor, current.company_id, "editar este item")?;

        let item = data
            .stock_item_mut(item_id)
            .ok_or_else(|| AppError::not_found("Item de estoque"))?;

        item.name = payload.name;
        item.category = payload.category;
        item.quantity = payload.quantity;
        item.unit = payload.unit;
        item.supplier = payload.supplier;
        item.low_stock_threshold = payload.low_stock_threshold;
        item.updated_at = Utc::now();

        Ok(item.clone())
    }

    // --- DELETE ITEM ---
    pub async fn delete_item(&self, actor: &User, item_id: Uuid) -> Result<(), AppError> {
        if !authz::can_manage_stock(actor.role) {
            return Err(AppError::permission_denied("gerenciar o estoque"));
        }

        let mut data = self.store.write().await;

        let item = data
            .stock_item(item_id)
            .ok_or_else(|| AppError::not_found("Item de estoque"))?;
        authz::require_same_company(actor, item.company_id, "remover este item")?;

        // O histórico de consumo fica: os nomes lá são desnormalizados
        data.remove_stock_item(item_id);
        Ok(())
    }

    // --- REGISTRAR CONSUMO ---
    // Baixa no saldo + linha no histórico, no mesmo lock: ou os dois
    // acontecem, ou nenhum. Saldo insuficiente não muda nada.
    pub async fn record_usage(
        &self,
        actor: &User,
        payload: RecordUsagePayload,
    ) -> Result<StockUsageRecord, AppError> {
        if !authz::can_manage_stock(actor.role) {
            return Err(AppError::permission_denied("registrar consumo de estoque"));
        }
        if payload.quantity_used <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "A quantidade consumida deve ser maior que zero.".to_string(),
            ));
        }

        let mut data = self.store.write().await;

        let item = data
            .stock_item(payload.item_id)
            .ok_or_else(|| AppError::not_found("Item de estoque"))?;
        authz::require_same_company(actor, item.company_id, "usar este item")?;

        if item.quantity < payload.quantity_used {
            return Err(AppError::InvalidInput("Estoque insuficiente.".to_string()));
        }

        let item_company = item.company_id;
        let item_name = item.name.clone();
        let item_unit = item.unit;

        // A piscina (opcional) precisa existir, ser da mesma empresa e
        // estar ao alcance de quem registra
        let pool_name = match payload.pool_id {
            Some(pool_id) => {
                let pool = data
                    .pool(pool_id)
                    .ok_or_else(|| AppError::not_found("Piscina"))?;
                if pool.company_id != item_company {
                    return Err(AppError::InvalidInput(
                        "A piscina não pertence à empresa deste item.".to_string(),
                    ));
                }
                if !authz::can_access_pool(actor, pool) {
                    return Err(AppError::permission_denied("registrar nesta piscina"));
                }
                Some(pool.pool_name.clone())
            }
            None => None,
        };

        // Todas as checagens passaram; agora sim a mutação
        let item = data
            .stock_item_mut(payload.item_id)
            .ok_or_else(|| AppError::not_found("Item de estoque"))?;
        item.quantity -= payload.quantity_used;
        item.updated_at = Utc::now();

        let usage = StockUsageRecord {
            id: Uuid::new_v4(),
            company_id: item_company,
            item_id: payload.item_id,
            item_name,
            quantity_used: payload.quantity_used,
            unit: item_unit,
            user_id: actor.id,
            user_name: actor.name.clone(),
            pool_id: payload.pool_id,
            pool_name,
            date: Utc::now(),
        };

        data.usage_records.push(usage.clone());
        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::{company, pool, stock_item, user};
    use crate::db::StoreData;
    use crate::models::auth::Role;

    #[tokio::test]
    async fn usage_decrements_and_records_history_atomically() {
        let mut data = StoreData::default();
        let c = company();
        let item = stock_item(c.id, 10);
        let tech = user(Role::Technician, Some(c.id), vec![]);
        let item_id = item.id;

        data.companies.push(c);
        data.stock_items.push(item);

        let store = MemoryStore::new(data);
        let service = StockService::new(store.clone());

        let usage = service
            .record_usage(
                &tech,
                RecordUsagePayload {
                    item_id,
                    quantity_used: Decimal::from(4),
                    pool_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(usage.quantity_used, Decimal::from(4));
        assert_eq!(usage.user_id, tech.id);

        let data = store.read().await;
        assert_eq!(data.stock_item(item_id).unwrap().quantity, Decimal::from(6));
        assert_eq!(data.usage_records.len(), 1);
    }

    #[tokio::test]
    async fn insufficient_stock_commits_nothing() {
        let mut data = StoreData::default();
        let c = company();
        let item = stock_item(c.id, 3);
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let item_id = item.id;

        data.companies.push(c);
        data.stock_items.push(item);

        let store = MemoryStore::new(data);
        let service = StockService::new(store.clone());

        let result = service
            .record_usage(
                &admin,
                RecordUsagePayload {
                    item_id,
                    quantity_used: Decimal::from(5),
                    pool_id: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        // Saldo intacto, histórico vazio
        let data = store.read().await;
        assert_eq!(data.stock_item(item_id).unwrap().quantity, Decimal::from(3));
        assert!(data.usage_records.is_empty());
    }

    #[tokio::test]
    async fn usage_against_foreign_pool_is_rejected() {
        let mut data = StoreData::default();
        let c1 = company();
        let c2 = company();
        let item = stock_item(c1.id, 10);
        let foreign_pool = pool(c2.id);
        let admin = user(Role::Admin, Some(c1.id), vec![]);
        let (item_id, pool_id) = (item.id, foreign_pool.id);

        data.companies.extend([c1, c2]);
        data.stock_items.push(item);
        data.pools.push(foreign_pool);

        let service = StockService::new(MemoryStore::new(data));
        let result = service
            .record_usage(
                &admin,
                RecordUsagePayload {
                    item_id,
                    quantity_used: Decimal::from(1),
                    pool_id: Some(pool_id),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn low_stock_listing_uses_the_threshold() {
        let mut data = StoreData::default();
        let c = company();
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let healthy = stock_item(c.id, 50);
        let mut low = stock_item(c.id, 4);
        low.name = "Test Strips (100 pack)".into();
        let low_id = low.id;

        data.companies.push(c);
        data.stock_items.extend([healthy, low]);

        let service = StockService::new(MemoryStore::new(data));
        let listed = service.list_low_stock(&admin).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, low_id);
    }
}
