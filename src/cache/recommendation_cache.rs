//! Cache de recomendaciones
//!
//! Las respuestas se guardan bajo el md5 del perfil y la consulta, prefijado
//! con la versión actual del inventario. Cualquier escritura en el inventario
//! incrementa la versión y deja obsoletas todas las entradas anteriores.

use serde::Serialize;
use tracing::{debug, warn};

use super::{CacheOperations, RedisClient};
use crate::dto::recommendation_dto::RecommendationResponse;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct RecommendationCache {
    redis: Option<RedisClient>,
    ttl: u64,
}

impl RecommendationCache {
    pub fn new(redis: RedisClient) -> Self {
        let ttl = redis.config().default_ttl;
        Self {
            redis: Some(redis),
            ttl,
        }
    }

    /// Cache sin Redis: todas las operaciones son no-op
    pub fn disabled() -> Self {
        Self {
            redis: None,
            ttl: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some()
    }

    /// Estado real de Redis para el health check
    pub async fn is_connected(&self) -> bool {
        match self.redis.as_ref() {
            Some(redis) => redis.ping().await,
            None => false,
        }
    }

    /// md5 del JSON de la clave
    pub fn digest<K: Serialize>(key: &K) -> AppResult<String> {
        let json = serde_json::to_string(key)
            .map_err(|e| AppError::Cache(format!("Error serializando clave: {}", e)))?;
        Ok(format!("{:x}", md5::compute(json.as_bytes())))
    }

    async fn versioned_key(redis: &RedisClient, digest: &str) -> anyhow::Result<String> {
        let version = redis.counter(&redis.inventory_version_key()).await?;
        Ok(redis.recommendation_key(version, digest))
    }

    pub async fn get(&self, digest: &str) -> Option<RecommendationResponse> {
        let redis = self.redis.as_ref()?;

        let result = async {
            let key = Self::versioned_key(redis, digest).await?;
            let cached: Option<RecommendationResponse> = redis.get(&key).await?;
            Ok::<_, anyhow::Error>(cached)
        }
        .await;

        match result {
            Ok(cached) => cached,
            Err(e) => {
                warn!("⚠️ Cache de recomendaciones no disponible: {}", e);
                None
            }
        }
    }

    pub async fn set(&self, digest: &str, response: &RecommendationResponse) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };

        let result = async {
            let key = Self::versioned_key(redis, digest).await?;
            redis.set(&key, response, self.ttl).await?;
            Ok::<_, anyhow::Error>(())
        }
        .await;

        if let Err(e) = result {
            warn!("⚠️ No se pudo guardar la recomendación en cache: {}", e);
        }
    }

    /// Invalidar todas las recomendaciones guardadas
    pub async fn invalidate(&self) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };

        match redis.incr(&redis.inventory_version_key()).await {
            Ok(version) => debug!("🔄 Inventario en versión {}", version),
            Err(e) => warn!("⚠️ No se pudo invalidar el cache de recomendaciones: {}", e),
        }
    }
}
