pub mod cache;
pub mod context;
pub mod schema_gen;
pub mod upsert;

pub use cache::CommodityCache;
pub use context::IngestContext;
pub use upsert::upsert;
