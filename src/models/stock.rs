// src/models/stock.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Quantidades de estoque nunca são negativas
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Unidade de medida do item (fixas, como no cadastro original)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockUnit {
    Kg,
    Liters,
    Units,
}

// ---
// StockItem (O "Item de Estoque")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: Uuid,
    pub company_id: Uuid,

    #[schema(example = "Chlorine Tablets (25kg)")]
    pub name: String,

    #[schema(example = "Sanitizer")]
    pub category: String,

    pub quantity: Decimal,
    pub unit: StockUnit,
    pub supplier: Option<String>,

    // Abaixo (ou igual a) este valor o item entra na lista de reposição
    pub low_stock_threshold: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    pub fn is_low(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

// ---
// StockUsageRecord (O "Histórico de Consumo")
// ---
// Cada baixa de estoque gera uma linha aqui, junto com quem usou e
// (opcionalmente) em qual piscina. Nomes são desnormalizados para o
// histórico sobreviver à remoção do item/usuário, como no original.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUsageRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity_used: Decimal,
    pub unit: StockUnit,
    pub user_id: Uuid,
    pub user_name: String,
    pub pool_id: Option<Uuid>,
    pub pool_name: Option<String>,
    pub date: DateTime<Utc>,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockItemPayload {
    pub company_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,

    #[validate(custom(function = validate_not_negative))]
    pub quantity: Decimal,

    pub unit: StockUnit,
    pub supplier: Option<String>,

    #[validate(custom(function = validate_not_negative))]
    #[serde(default)]
    pub low_stock_threshold: Decimal,
}

// Registrar consumo: dá baixa no item e grava o histórico em um passo só.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsagePayload {
    pub item_id: Uuid,

    #[validate(custom(function = validate_not_negative))]
    pub quantity_used: Decimal,

    // Em qual piscina o produto foi aplicado (opcional)
    pub pool_id: Option<Uuid>,
}
