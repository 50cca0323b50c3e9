// src/models/record.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Como o cloro foi aplicado nessa visita
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChlorineType {
    Liquid,
    Tablets,
    Granular,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OverallState {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WeatherStatus {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
}

// ---
// PoolRecord (O "Registro de Manutenção")
// ---
// Uma visita do técnico: leituras químicas, produtos aplicados e o que
// foi feito de limpeza. O tenant é derivado da piscina referenciada.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub created_at: DateTime<Utc>,

    // Química da Água
    #[schema(example = 7.4)]
    pub ph: Decimal,
    #[schema(example = 1.5)]
    pub cl: Decimal,
    pub chlorine_type: ChlorineType,
    pub chlorine_quantity: Option<Decimal>,
    pub flocculant_type: Option<String>,
    pub flocculant_quantity: Option<Decimal>,
    pub salt_quantity: Option<Decimal>,
    pub acid_quantity: Option<Decimal>,
    pub ph_plus_quantity: Option<Decimal>,
    pub ph_minus_quantity: Option<Decimal>,
    pub algaecide_quantity: Option<Decimal>,
    pub chlorine_tablets_quantity: Option<Decimal>,

    // Ações de Manutenção
    pub vacuumed: bool,
    pub brushed: bool,
    pub leaves_cleaned: bool,

    // Estado Geral
    pub overall_state: OverallState,
    pub weather_status: WeatherStatus,
}

// O Payload da visita (a piscina vem do path da rota)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordPayload {
    pub ph: Decimal,
    pub cl: Decimal,
    pub chlorine_type: ChlorineType,
    pub chlorine_quantity: Option<Decimal>,
    pub flocculant_type: Option<String>,
    pub flocculant_quantity: Option<Decimal>,
    pub salt_quantity: Option<Decimal>,
    pub acid_quantity: Option<Decimal>,
    pub ph_plus_quantity: Option<Decimal>,
    pub ph_minus_quantity: Option<Decimal>,
    pub algaecide_quantity: Option<Decimal>,
    pub chlorine_tablets_quantity: Option<Decimal>,

    #[serde(default)]
    pub vacuumed: bool,
    #[serde(default)]
    pub brushed: bool,
    #[serde(default)]
    pub leaves_cleaned: bool,

    pub overall_state: OverallState,
    pub weather_status: WeatherStatus,
}
