//! Cache
//!
//! Este módulo contiene el cliente Redis y el cache de recomendaciones.

pub mod cache_config;
pub mod recommendation_cache;
pub mod redis_client;

pub use cache_config::{CacheConfig, CacheOperations};
pub use recommendation_cache::RecommendationCache;
pub use redis_client::RedisClient;
