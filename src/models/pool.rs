// src/models/pool.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PoolStatus {
    Active,
    Maintenance,
    Closed,
}

// Tipo de capa da piscina
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PoolCover {
    None,
    Manual,
    Automatic,
}

// ---
// Equipamentos (structs aninhadas, como no cadastro original)
// ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pump {
    pub pump_image: Option<String>,

    #[schema(example = "1.5 HP")]
    pub pump_power: Option<String>,

    pub salt_water: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatPump {
    pub heatpump_image: Option<String>,
    pub heatpump_on: bool,

    #[schema(example = 28.0)]
    pub heatpump_temperature: Option<Decimal>,
}

// ---
// Pool (A "Piscina")
// ---
// A entidade central do domínio. Sempre pertence a uma Company.
// Quem pode vê-la é derivado de `User.accessible_pool_ids` (a piscina
// não guarda a lista de usuários do outro lado).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: Uuid,
    pub company_id: Uuid,

    pub status: PoolStatus,

    // Dados Gerais
    #[schema(example = "Sunset Resort Pool")]
    pub pool_name: String,
    #[schema(example = "123 Ocean Drive, Miami, FL")]
    pub pool_location: String,
    pub pool_picture: Option<String>,
    pub owner_email: Option<String>,
    pub extra_info: Option<String>,

    // Equipamentos
    pub pump: Pump,
    pub has_heatpump: bool,
    pub heatpump: Option<HeatPump>,
    pub has_ph_controller: bool,
    pub salt_system_model: Option<String>,
    pub salt_system_image: Option<String>,
    pub sand_filter_model: Option<String>,
    pub sand_filter_sand_amount: Option<Decimal>,
    pub pool_cover: Option<PoolCover>,

    // Construção
    pub grouting_type: Option<String>,
    pub tile_image: Option<String>,

    // Manutenção & Notificações
    pub loses_water: bool,
    pub water_loss_reason: Option<String>,
    pub water_filling_on: bool,
    pub send_record_notification_on_creation: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O Payload do cadastro de piscina (create e update usam o mesmo
// formulário, como no app original).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolPayload {
    // Superadmin informa a empresa alvo; os demais usam a própria
    pub company_id: Option<Uuid>,

    pub status: PoolStatus,

    #[validate(length(min = 1, message = "O nome da piscina é obrigatório."))]
    pub pool_name: String,

    #[validate(length(min = 1, message = "A localização é obrigatória."))]
    pub pool_location: String,

    pub pool_picture: Option<String>,

    #[validate(email(message = "O e-mail do proprietário é inválido."))]
    pub owner_email: Option<String>,

    pub extra_info: Option<String>,

    #[serde(default)]
    pub pump: Pump,

    #[serde(default)]
    pub has_heatpump: bool,
    pub heatpump: Option<HeatPump>,

    #[serde(default)]
    pub has_ph_controller: bool,
    pub salt_system_model: Option<String>,
    pub salt_system_image: Option<String>,
    pub sand_filter_model: Option<String>,
    pub sand_filter_sand_amount: Option<Decimal>,
    pub pool_cover: Option<PoolCover>,

    pub grouting_type: Option<String>,
    pub tile_image: Option<String>,

    #[serde(default)]
    pub loses_water: bool,
    pub water_loss_reason: Option<String>,

    #[serde(default)]
    pub water_filling_on: bool,

    #[serde(default)]
    pub send_record_notification_on_creation: bool,
}

// Payload para conceder acesso a uma piscina (o outro lado, a revogação,
// vai por path params).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessPayload {
    pub user_id: Uuid,
}
