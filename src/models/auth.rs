// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Role (O Papel do Usuário)
// ---
// Define o que o usuário pode ver e fazer:
// - Superadmin: enxerga tudo, globalmente (não pertence a empresa nenhuma)
// - Admin: enxerga tudo DA SUA empresa
// - Technician/Client: enxergam apenas as piscinas da lista de acesso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Superadmin,
    Admin,
    Technician,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserStatus {
    Active,
    Invited,
    Inactive,
}

// ---
// 2. User
// ---
// Representa um usuário do sistema (vindo da store em memória)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "Alex Johnson")]
    pub name: String,

    #[schema(example = "alex.j@propools.com")]
    pub email: String,

    pub role: Role,
    pub status: UserStatus,

    pub avatar: Option<String>,

    // None = nunca fez login
    pub last_login: Option<DateTime<Utc>>,

    // A "allow-list": as piscinas que um Technician/Client pode acessar.
    // Para Admin/Superadmin fica vazia (o papel já dá a visibilidade).
    pub accessible_pool_ids: Vec<Uuid>,

    // None apenas para Superadmin
    pub company_id: Option<Uuid>,

    // IMPORTANTE para segurança: nunca sai na API
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    // Obriga o usuário a trocar a senha no próximo login
    pub force_password_change: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Payloads de Autenticação
// ---

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para troca de senha
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    // Quando `forcePasswordChange` está ativo, a senha antiga
    // não é exigida (fluxo de primeiro acesso).
    pub current_password: Option<String>,

    #[validate(length(min = 6, message = "A nova senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    pub force_password_change: bool,
}

// ---
// 4. Payloads de Gestão de Usuários
// ---

// Admin convida Technician/Client para a própria empresa; Superadmin
// pode criar Admins apontando a empresa alvo.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub role: Role,

    pub company_id: Option<Uuid>,

    #[serde(default)]
    pub accessible_pool_ids: Vec<Uuid>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub avatar: Option<String>,
    pub accessible_pool_ids: Option<Vec<Uuid>>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
