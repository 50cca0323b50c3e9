// src/db/seed.rs

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::StoreData;
use crate::models::{
    auth::{Role, User, UserStatus},
    company::Company,
    pool::{HeatPump, Pool, PoolCover, PoolStatus, Pump},
    record::{ChlorineType, OverallState, PoolRecord, WeatherStatus},
    stock::{StockItem, StockUnit, StockUsageRecord},
    task::Task,
};

fn new_user(
    name: &str,
    email: &str,
    role: Role,
    status: UserStatus,
    company_id: Option<Uuid>,
    password_hash: &str,
) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        avatar: None,
        last_login: None,
        accessible_pool_ids: Vec::new(),
        company_id,
        password_hash: password_hash.to_string(),
        force_password_change: false,
        created_at: now,
        updated_at: now,
    }
}

// O Superadmin de bootstrap vem do ambiente: sem ele não há como criar a
// primeira empresa.
pub fn bootstrap_superadmin(data: &mut StoreData, email: &str, password_hash: &str) -> Uuid {
    let superadmin = new_user(
        "Super Admin",
        email,
        Role::Superadmin,
        UserStatus::Active,
        None,
        password_hash,
    );
    let id = superadmin.id;
    data.users.push(superadmin);
    id
}

// Carga de demonstração: o tenant "ProPools Inc." do protótipo original,
// com senhas devidamente hasheadas.
pub fn seed_demo(data: &mut StoreData, demo_password_hash: &str) {
    let now = Utc::now();

    // --- Usuários ---
    let mut admin = new_user(
        "Alex Johnson",
        "alex.j@propools.com",
        Role::Admin,
        UserStatus::Active,
        None,
        demo_password_hash,
    );
    admin.last_login = Some(now - Duration::hours(2));

    let company = Company {
        id: Uuid::new_v4(),
        name: "ProPools Inc.".to_string(),
        owner_admin_id: admin.id,
        logo: None,
        enable_record_notifications: true,
        created_at: now,
        updated_at: now,
    };
    admin.company_id = Some(company.id);

    let mut client = new_user(
        "Maria Garcia",
        "maria.g@client.com",
        Role::Client,
        UserStatus::Active,
        Some(company.id),
        demo_password_hash,
    );
    client.last_login = Some(now - Duration::days(1));
    client.force_password_change = true;

    let mut tech_david = new_user(
        "David Smith",
        "david.s@propools.com",
        Role::Technician,
        UserStatus::Active,
        Some(company.id),
        demo_password_hash,
    );
    tech_david.last_login = Some(now - Duration::minutes(30));

    let mut tech_chris = new_user(
        "Chris Lee",
        "chris.l@propools.com",
        Role::Technician,
        UserStatus::Active,
        Some(company.id),
        demo_password_hash,
    );
    tech_chris.last_login = Some(now - Duration::days(45));

    let invited = new_user(
        "pending.user@client.com",
        "pending.user@client.com",
        Role::Client,
        UserStatus::Invited,
        Some(company.id),
        demo_password_hash,
    );

    // --- Piscinas ---
    let pool_resort = Pool {
        id: Uuid::new_v4(),
        company_id: company.id,
        status: PoolStatus::Active,
        pool_name: "Sunset Resort Pool".to_string(),
        pool_location: "123 Ocean Drive, Miami, FL".to_string(),
        pool_picture: None,
        owner_email: Some("pool.owner@example.com".to_string()),
        extra_info: Some(
            "Pool gets a lot of sun in the afternoon. Check for algae growth near the steps."
                .to_string(),
        ),
        pump: Pump {
            pump_image: None,
            pump_power: Some("1.5 HP".to_string()),
            salt_water: true,
        },
        has_heatpump: true,
        heatpump: Some(HeatPump {
            heatpump_image: None,
            heatpump_on: true,
            heatpump_temperature: Some(Decimal::from(28)),
        }),
        has_ph_controller: true,
        salt_system_model: Some("AquaPure 9000".to_string()),
        salt_system_image: None,
        sand_filter_model: Some("SF-2000".to_string()),
        sand_filter_sand_amount: Some(Decimal::from(150)),
        pool_cover: Some(PoolCover::Automatic),
        grouting_type: Some("Epoxy".to_string()),
        tile_image: None,
        loses_water: false,
        water_loss_reason: None,
        water_filling_on: false,
        send_record_notification_on_creation: true,
        created_at: now,
        updated_at: now,
    };

    let pool_center = Pool {
        id: Uuid::new_v4(),
        company_id: company.id,
        status: PoolStatus::Maintenance,
        pool_name: "Downtown Community Center".to_string(),
        pool_location: "456 Central Ave, Miami, FL".to_string(),
        pool_picture: None,
        owner_email: None,
        extra_info: None,
        pump: Pump {
            pump_image: None,
            pump_power: Some("2.0 HP".to_string()),
            salt_water: false,
        },
        has_heatpump: false,
        heatpump: None,
        has_ph_controller: false,
        salt_system_model: None,
        salt_system_image: None,
        sand_filter_model: None,
        sand_filter_sand_amount: None,
        pool_cover: Some(PoolCover::Manual),
        grouting_type: None,
        tile_image: None,
        loses_water: true,
        water_loss_reason: Some("Suspected crack in the skimmer line.".to_string()),
        water_filling_on: true,
        send_record_notification_on_creation: false,
        created_at: now,
        updated_at: now,
    };

    client.accessible_pool_ids = vec![pool_resort.id];
    tech_david.accessible_pool_ids = vec![pool_resort.id, pool_center.id];

    // --- Registros de manutenção ---
    let base_record = |pool_id: Uuid, days_ago: i64| PoolRecord {
        id: Uuid::new_v4(),
        pool_id,
        created_at: now - Duration::days(days_ago),
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
        brushed: true,
        leaves_cleaned: true,
        overall_state: OverallState::Excellent,
        weather_status: WeatherStatus::Sunny,
    };

    let rec1 = base_record(pool_resort.id, 0);

    let mut rec2 = base_record(pool_resort.id, 1);
    rec2.ph = Decimal::new(72, 1);
    rec2.cl = Decimal::new(12, 1);
    rec2.chlorine_type = ChlorineType::Liquid;
    rec2.chlorine_quantity = Some(Decimal::from(2));
    rec2.brushed = false;
    rec2.overall_state = OverallState::Good;

    let mut rec3 = base_record(pool_center.id, 0);
    rec3.ph = Decimal::from(7);
    rec3.cl = Decimal::from(2);
    rec3.chlorine_type = ChlorineType::Liquid;
    rec3.chlorine_quantity = Some(Decimal::from(3));
    rec3.overall_state = OverallState::Good;

    let mut rec4 = base_record(pool_resort.id, 10);
    rec4.ph = Decimal::new(78, 1);
    rec4.cl = Decimal::from(1);
    rec4.vacuumed = false;
    rec4.brushed = false;
    rec4.leaves_cleaned = false;
    rec4.overall_state = OverallState::Fair;

    // --- Estoque ---
    let item = |name: &str, category: &str, qty: i64, unit: StockUnit, low: i64| StockItem {
        id: Uuid::new_v4(),
        company_id: company.id,
        name: name.to_string(),
        category: category.to_string(),
        quantity: Decimal::from(qty),
        unit,
        supplier: None,
        low_stock_threshold: Decimal::from(low),
        created_at: now,
        updated_at: now,
    };

    let tablets = item("Chlorine Tablets (25kg)", "Sanitizer", 85, StockUnit::Units, 20);
    let mut liquid = item("Liquid Chlorine (20L)", "Sanitizer", 60, StockUnit::Liters, 30);
    liquid.supplier = Some("ChemCo".to_string());
    let ph_minus = item("pH Minus (10kg)", "Balancer", 45, StockUnit::Kg, 15);
    let mut algaecide = item("Algaecide (5L)", "Specialty", 25, StockUnit::Liters, 10);
    algaecide.supplier = Some("PoolGuard".to_string());
    let strips = item("Test Strips (100 pack)", "Testing", 8, StockUnit::Units, 5);

    let usage = StockUsageRecord {
        id: Uuid::new_v4(),
        company_id: company.id,
        item_id: liquid.id,
        item_name: liquid.name.clone(),
        quantity_used: Decimal::from(5),
        unit: StockUnit::Liters,
        user_id: tech_david.id,
        user_name: tech_david.name.clone(),
        pool_id: Some(pool_center.id),
        pool_name: Some(pool_center.pool_name.clone()),
        date: now - Duration::hours(3),
    };

    // --- Tarefas ---
    let task = |technician: &User, description: &str, completed: bool| Task {
        id: Uuid::new_v4(),
        company_id: company.id,
        technician_id: technician.id,
        technician_name: technician.name.clone(),
        description: description.to_string(),
        is_completed: completed,
        created_at: now,
        due_time: None,
        has_alert: false,
    };

    let task1 = task(
        &tech_david,
        "Check pH and Chlorine levels for Sunset Resort Pool",
        true,
    );
    let mut task2 = task(&tech_david, "Vacuum pool floor at Sunset Resort", false);
    task2.due_time = chrono::NaiveTime::from_hms_opt(14, 0, 0);
    task2.has_alert = true;
    let task3 = task(
        &tech_chris,
        "Clean skimmer baskets for all assigned pools",
        true,
    );

    data.companies.push(company);
    data.users
        .extend([admin, client, tech_david, tech_chris, invited]);
    data.pools.extend([pool_resort, pool_center]);
    data.records.extend([rec1, rec2, rec3, rec4]);
    data.stock_items
        .extend([tablets, liquid, ph_minus, algaecide, strips]);
    data.usage_records.push(usage);
    data.tasks.extend([task1, task2, task3]);
}
