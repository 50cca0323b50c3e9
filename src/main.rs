//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas de perfil (protegidas pelo middleware)
    let profile_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/change-password", post(handlers::auth::change_password))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route(
            "/",
            post(handlers::companies::create_company).get(handlers::companies::list_companies),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let pool_routes = Router::new()
        .route(
            "/",
            post(handlers::pools::create_pool).get(handlers::pools::list_pools),
        )
        .route(
            "/{id}",
            get(handlers::pools::get_pool)
                .put(handlers::pools::update_pool)
                .delete(handlers::pools::delete_pool),
        )
        // A referência cruzada piscina <-> usuário (allow-list)
        .route("/{id}/access", post(handlers::pools::grant_access))
        .route(
            "/{id}/access/{user_id}",
            axum::routing::delete(handlers::pools::revoke_access),
        )
        // Registros de manutenção da piscina
        .route(
            "/{id}/records",
            get(handlers::records::list_records).post(handlers::records::create_record),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let record_routes = Router::new()
        .route("/", get(handlers::records::list_all_records))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let stock_routes = Router::new()
        .route(
            "/items",
            post(handlers::stock::create_item).get(handlers::stock::list_items),
        )
        .route("/items/low", get(handlers::stock::list_low_stock))
        .route(
            "/items/{id}",
            axum::routing::put(handlers::stock::update_item)
                .delete(handlers::stock::delete_item),
        )
        .route(
            "/usage",
            post(handlers::stock::record_usage).get(handlers::stock::list_usage),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            post(handlers::tasks::create_task).get(handlers::tasks::list_tasks),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/{id}/toggle", post(handlers::tasks::toggle_task))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let analysis_routes = Router::new()
        .route(
            "/test-strip",
            post(handlers::analysis::analyze_test_strip),
        )
        .route(
            "/pool-picture",
            post(handlers::analysis::analyze_pool_picture),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/auth", profile_routes)
        .nest("/api/companies", company_routes)
        .nest("/api/pools", pool_routes)
        .nest("/api/records", record_routes)
        .nest("/api/users", user_routes)
        .nest("/api/stock", stock_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/analysis", analysis_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
