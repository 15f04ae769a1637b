mod pg_pool;
mod pg_result_store;

pub use pg_pool::create_pool;
pub use pg_result_store::PgResultStore;
