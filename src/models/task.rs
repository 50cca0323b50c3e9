// src/models/task.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Task (A "Tarefa" do Técnico)
// ---
// Máquina de estados mínima: Aberta <-> Concluída (`is_completed`).
// A única transição é o toggle; a tarefa vive em qualquer um dos dois
// estados até ser removida.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub company_id: Uuid,

    // O técnico responsável (precisa ser Technician da mesma empresa)
    pub technician_id: Uuid,
    pub technician_name: String,

    #[schema(example = "Check pH and Chlorine levels for Sunset Resort Pool")]
    pub description: String,

    pub is_completed: bool,
    pub created_at: DateTime<Utc>,

    // Horário-limite do dia (ex.: 14:00) e alerta associado
    pub due_time: Option<NaiveTime>,
    pub has_alert: bool,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub company_id: Option<Uuid>,

    // Precisa ser um Technician da empresa alvo
    pub technician_id: Uuid,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub due_time: Option<NaiveTime>,

    #[serde(default)]
    pub has_alert: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub technician_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: Option<String>,

    pub due_time: Option<NaiveTime>,
    pub has_alert: Option<bool>,
}
