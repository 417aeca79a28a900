mod commands;
mod handle;
mod queries;
mod schema;

pub use handle::CacheHandle;
