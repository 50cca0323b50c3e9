// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Company (A "Empresa" / O Tenant)
// ---
// A conta principal: a empresa de manutenção de piscinas.
// Tudo que não é Superadmin pertence a exatamente uma Company.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "ProPools Inc.")]
    pub name: String,

    // O Admin "dono" da empresa (criado junto com ela pelo Superadmin)
    pub owner_admin_id: Uuid,

    pub logo: Option<String>,

    // Liga/desliga o envio de notificações de registros de manutenção
    pub enable_record_notifications: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O Payload para criar uma empresa. Só o Superadmin usa isso; a empresa
// nasce junto com o seu Admin "dono" (operação atômica).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub name: String,

    pub logo: Option<String>,

    #[serde(default)]
    pub enable_record_notifications: bool,

    #[validate(length(min = 1, message = "O nome do administrador é obrigatório."))]
    pub admin_name: String,

    #[validate(email(message = "O e-mail do administrador é inválido."))]
    pub admin_email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub name: Option<String>,
    pub logo: Option<String>,
    pub enable_record_notifications: Option<bool>,
}

// A resposta do create: a empresa e o Admin recém-criado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyWithAdmin {
    pub company: Company,
    pub admin: crate::models::auth::User,
}
