// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{seed, MemoryStore, StoreData},
    services::{
        analysis::{AnalysisService, GeminiClient},
        auth::AuthService,
        company_service::CompanyService,
        pool_service::PoolService,
        record_service::RecordService,
        stock_service::StockService,
        task_service::TaskService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub pool_service: PoolService,
    pub user_service: UserService,
    pub stock_service: StockService,
    pub task_service: TaskService,
    pub record_service: RecordService,
    pub analysis_service: AnalysisService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let superadmin_email =
            env::var("SUPERADMIN_EMAIL").unwrap_or_else(|_| "admin@aquagest.local".to_string());
        let superadmin_password =
            env::var("SUPERADMIN_PASSWORD").expect("SUPERADMIN_PASSWORD deve ser definida");

        // --- Monta a store em memória ---
        let mut data = StoreData::default();

        let superadmin_hash = hash_blocking(superadmin_password).await?;
        seed::bootstrap_superadmin(&mut data, &superadmin_email, &superadmin_hash);
        tracing::info!("👤 Superadmin de bootstrap: {}", superadmin_email);

        // Carga de demonstração (o tenant ProPools do protótipo)
        if env::var("SEED_DEMO_DATA").is_ok_and(|v| v == "true") {
            let demo_hash = hash_blocking("password123".to_string()).await?;
            seed::seed_demo(&mut data, &demo_hash);
            tracing::info!("🌊 Dados de demonstração carregados (senha: password123)");
        }

        let store = MemoryStore::new(data);

        // --- Cliente de inferência (Gemini) ---
        let gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        if gemini_api_key.is_empty() {
            tracing::warn!("⚠️ GEMINI_API_KEY ausente: as análises de imagem vão falhar");
        }
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let analysis_timeout = env::var("ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30u64);

        let gemini_client = GeminiClient::new(
            gemini_api_key,
            gemini_model,
            Duration::from_secs(analysis_timeout),
        )?;

        // --- Monta o gráfico de dependências ---
        Ok(Self {
            auth_service: AuthService::new(store.clone(), jwt_secret),
            company_service: CompanyService::new(store.clone()),
            pool_service: PoolService::new(store.clone()),
            user_service: UserService::new(store.clone()),
            stock_service: StockService::new(store.clone()),
            task_service: TaskService::new(store.clone()),
            record_service: RecordService::new(store.clone()),
            analysis_service: AnalysisService::new(Arc::new(gemini_client)),
        })
    }
}

// bcrypt é pesado; mesmo no boot, roda fora do executor
async fn hash_blocking(password: String) -> anyhow::Result<String> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hash)
}
