// src/db/store.rs

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::{
    auth::User,
    company::Company,
    pool::Pool,
    record::PoolRecord,
    stock::{StockItem, StockUsageRecord},
    task::Task,
};

// ---
// StoreData (As coleções do domínio)
// ---
// As "mock arrays" do app original, promovidas a uma camada de
// repositório: os services nunca tocam nas coleções de fora daqui.
// Trocar isso por um banco real muda este arquivo, não os call sites.
#[derive(Debug, Default)]
pub struct StoreData {
    pub companies: Vec<Company>,
    pub users: Vec<User>,
    pub pools: Vec<Pool>,
    pub records: Vec<PoolRecord>,
    pub stock_items: Vec<StockItem>,
    pub usage_records: Vec<StockUsageRecord>,
    pub tasks: Vec<Task>,
}

impl StoreData {
    // --- Companies ---

    pub fn company(&self, id: Uuid) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn company_mut(&mut self, id: Uuid) -> Option<&mut Company> {
        self.companies.iter_mut().find(|c| c.id == id)
    }

    // Remove a empresa E toda a partição do tenant (usuários, piscinas,
    // registros, estoque, consumo, tarefas). Nenhuma referência órfã sobra.
    pub fn remove_company_cascade(&mut self, id: Uuid) -> Option<Company> {
        let pos = self.companies.iter().position(|c| c.id == id)?;
        let company = self.companies.remove(pos);

        let pool_ids: Vec<Uuid> = self
            .pools
            .iter()
            .filter(|p| p.company_id == id)
            .map(|p| p.id)
            .collect();

        self.records.retain(|r| !pool_ids.contains(&r.pool_id));
        self.pools.retain(|p| p.company_id != id);
        self.users.retain(|u| u.company_id != Some(id));
        self.stock_items.retain(|i| i.company_id != id);
        self.usage_records.retain(|r| r.company_id != id);
        self.tasks.retain(|t| t.company_id != id);

        Some(company)
    }

    // --- Users ---

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn remove_user(&mut self, id: Uuid) -> Option<User> {
        let pos = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(pos))
    }

    // --- Pools ---

    pub fn pool(&self, id: Uuid) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id == id)
    }

    pub fn pool_mut(&mut self, id: Uuid) -> Option<&mut Pool> {
        self.pools.iter_mut().find(|p| p.id == id)
    }

    // Remove a piscina, seus registros, e limpa o id de TODAS as
    // allow-lists. É isso que mantém o invariante "sem órfãos" dos dois
    // lados da referência cruzada.
    pub fn remove_pool_cascade(&mut self, id: Uuid) -> Option<Pool> {
        let pos = self.pools.iter().position(|p| p.id == id)?;
        let pool = self.pools.remove(pos);

        self.records.retain(|r| r.pool_id != id);
        for user in &mut self.users {
            user.accessible_pool_ids.retain(|pid| *pid != id);
        }

        Some(pool)
    }

    // --- Stock ---

    pub fn stock_item(&self, id: Uuid) -> Option<&StockItem> {
        self.stock_items.iter().find(|i| i.id == id)
    }

    pub fn stock_item_mut(&mut self, id: Uuid) -> Option<&mut StockItem> {
        self.stock_items.iter_mut().find(|i| i.id == id)
    }

    pub fn remove_stock_item(&mut self, id: Uuid) -> Option<StockItem> {
        let pos = self.stock_items.iter().position(|i| i.id == id)?;
        Some(self.stock_items.remove(pos))
    }

    // --- Tasks ---

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn remove_task(&mut self, id: Uuid) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }
}

// ---
// MemoryStore (A Store compartilhada)
// ---
// Um único RwLock sobre todas as coleções: o guard de escrita é a nossa
// "transação serializável". Toda operação do gateway valida e muta
// segurando o mesmo guard, então nenhum efeito parcial fica visível.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreData>>,
}

impl MemoryStore {
    pub fn new(data: StoreData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoreData> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreData> {
        self.inner.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::auth::Role;

    // Remover uma piscina não pode deixar id pendurado em nenhuma
    // allow-list nem registro órfão.
    #[test]
    fn pool_cascade_leaves_no_orphans() {
        let mut data = StoreData::default();
        let c = company();
        let p1 = pool(c.id);
        let p2 = pool(c.id);
        let tech = user(Role::Technician, Some(c.id), vec![p1.id, p2.id]);
        let tech_id = tech.id;

        data.records.push(record(p1.id));
        data.records.push(record(p2.id));
        data.companies.push(c);
        data.users.push(tech);
        let p1_id = p1.id;
        data.pools.extend([p1, p2]);

        data.remove_pool_cascade(p1_id);

        assert_eq!(data.pools.len(), 1);
        assert_eq!(data.records.len(), 1);
        let tech = data.user(tech_id).unwrap();
        assert!(!tech.accessible_pool_ids.contains(&p1_id));
        assert_eq!(tech.accessible_pool_ids.len(), 1);
    }

    // Remover uma empresa leva a partição inteira junto.
    #[test]
    fn company_cascade_removes_whole_partition() {
        let mut data = StoreData::default();
        let doomed = company();
        let survivor = company();

        let p = pool(doomed.id);
        let tech = user(Role::Technician, Some(doomed.id), vec![p.id]);
        data.records.push(record(p.id));
        data.stock_items.push(stock_item(doomed.id, 10));
        data.tasks.push(task(doomed.id, &tech));

        let other_pool = pool(survivor.id);
        let other_user = user(Role::Admin, Some(survivor.id), vec![]);

        let doomed_id = doomed.id;
        data.companies.extend([doomed, survivor]);
        data.users.extend([tech, other_user]);
        data.pools.extend([p, other_pool]);

        data.remove_company_cascade(doomed_id);

        assert_eq!(data.companies.len(), 1);
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.pools.len(), 1);
        assert!(data.records.is_empty());
        assert!(data.stock_items.is_empty());
        assert!(data.tasks.is_empty());
    }
}

// Construtores mínimos compartilhados pelos testes de serviço.
#[cfg(test)]
pub mod test_support {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::{
        auth::{Role, User, UserStatus},
        company::Company,
        pool::{Pool, PoolStatus, Pump},
        record::{ChlorineType, OverallState, PoolRecord, WeatherStatus},
        stock::{StockItem, StockUnit},
        task::Task,
    };

    pub fn company() -> Company {
        let now = Utc::now();
        Company {
            id: Uuid::new_v4(),
            name: "ProPools Inc.".into(),
            owner_admin_id: Uuid::new_v4(),
            logo: None,
            enable_record_notifications: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user(role: Role, company_id: Option<Uuid>, pools: Vec<Uuid>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Test User".into(),
            email: format!("{}@test.com", Uuid::new_v4()),
            role,
            status: UserStatus::Active,
            avatar: None,
            last_login: None,
            accessible_pool_ids: pools,
            company_id,
            password_hash: "x".into(),
            force_password_change: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pool(company_id: Uuid) -> Pool {
        let now = Utc::now();
        Pool {
            id: Uuid::new_v4(),
            company_id,
            status: PoolStatus::Active,
            pool_name: "Test Pool".into(),
            pool_location: "Somewhere".into(),
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
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record(pool_id: Uuid) -> PoolRecord {
        PoolRecord {
            id: Uuid::new_v4(),
            pool_id,
            created_at: Utc::now(),
            ph: Decimal::new(74, 1),
            cl: Decimal::new(15, 1),
            chlorine_type: ChlorineType::Tablets,
            chlorine_quantity: None,
            flocculant_type: None,
            flocculant_quantity: None,
            salt_quantity: None,
            acid_quantity: None,
            ph_plus_quantity: None,
            ph_minus_quantity: None,
            algaecide_quantity: None,
            chlorine_tablets_quantity: None,
            vacuumed: true,
            brushed: false,
            leaves_cleaned: true,
            overall_state: OverallState::Good,
            weather_status: WeatherStatus::Sunny,
        }
    }

    pub fn stock_item(company_id: Uuid, quantity: i64) -> StockItem {
        let now = Utc::now();
        StockItem {
            id: Uuid::new_v4(),
            company_id,
            name: "Liquid Chlorine (20L)".into(),
            category: "Sanitizer".into(),
            quantity: Decimal::from(quantity),
            unit: StockUnit::Liters,
            supplier: None,
            low_stock_threshold: Decimal::from(5),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn task(company_id: Uuid, technician: &User) -> Task {
        Task {
            id: Uuid::new_v4(),
            company_id,
            technician_id: technician.id,
            technician_name: technician.name.clone(),
            description: "Backwash sand filter".into(),
            is_completed: false,
            created_at: Utc::now(),
            due_time: None,
            has_alert: false,
        }
    }
}
