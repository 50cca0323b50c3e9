pub mod analysis;
pub mod auth;
pub mod companies;
pub mod pools;
pub mod records;
pub mod stock;
pub mod tasks;
pub mod users;
