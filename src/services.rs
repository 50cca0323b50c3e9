pub mod analysis;
pub mod auth;
pub mod authz;
pub mod company_service;
pub mod pool_service;
pub mod record_service;
pub mod stock_service;
pub mod task_service;
pub mod user_service;
