mod model;
mod repository;

pub use model::CachedRateRecordDB;
pub use repository::RateCacheRepository;
