// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,

        // --- Pools ---
        handlers::pools::list_pools,
        handlers::pools::get_pool,
        handlers::pools::create_pool,
        handlers::pools::update_pool,
        handlers::pools::delete_pool,
        handlers::pools::grant_access,
        handlers::pools::revoke_access,

        // --- Records ---
        handlers::records::list_all_records,
        handlers::records::list_records,
        handlers::records::create_record,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Stock ---
        handlers::stock::list_items,
        handlers::stock::list_low_stock,
        handlers::stock::create_item,
        handlers::stock::update_item,
        handlers::stock::delete_item,
        handlers::stock::list_usage,
        handlers::stock::record_usage,

        // --- Tasks ---
        handlers::tasks::list_tasks,
        handlers::tasks::create_task,
        handlers::tasks::update_task,
        handlers::tasks::toggle_task,
        handlers::tasks::delete_task,

        // --- Analysis ---
        handlers::analysis::analyze_test_strip,
        handlers::analysis::analyze_pool_picture,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserStatus,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,

            // --- Companies ---
            models::company::Company,
            models::company::CreateCompanyPayload,
            models::company::UpdateCompanyPayload,
            models::company::CompanyWithAdmin,

            // --- Pools ---
            models::pool::PoolStatus,
            models::pool::PoolCover,
            models::pool::Pump,
            models::pool::HeatPump,
            models::pool::Pool,
            models::pool::PoolPayload,
            models::pool::GrantAccessPayload,

            // --- Records ---
            models::record::ChlorineType,
            models::record::OverallState,
            models::record::WeatherStatus,
            models::record::PoolRecord,
            models::record::CreateRecordPayload,

            // --- Stock ---
            models::stock::StockUnit,
            models::stock::StockItem,
            models::stock::StockUsageRecord,
            models::stock::StockItemPayload,
            models::stock::RecordUsagePayload,

            // --- Tasks ---
            models::task::Task,
            models::task::CreateTaskPayload,
            models::task::UpdateTaskPayload,

            // --- Analysis ---
            models::analysis::ChemicalLevels,
            models::analysis::TestStripAnalysis,
            models::analysis::PoolPictureAnalysis,
            handlers::analysis::AnalyzeTestStripPayload,
            handlers::analysis::AnalyzePoolPicturePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Perfil"),
        (name = "Companies", description = "Gestão de Empresas (Tenants)"),
        (name = "Pools", description = "Cadastro de Piscinas e Acesso"),
        (name = "Records", description = "Registros de Manutenção"),
        (name = "Users", description = "Gestão de Usuários"),
        (name = "Stock", description = "Estoque e Consumo"),
        (name = "Tasks", description = "Tarefas dos Técnicos"),
        (name = "Analysis", description = "Análises de Imagem (IA)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
