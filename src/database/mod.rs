pub mod models;
pub mod pool;
pub mod query;
