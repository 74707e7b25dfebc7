mod database;

pub use database::build_pool;
