use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use car_matcher::cache::{CacheConfig, RecommendationCache, RedisClient};
use car_matcher::config::{DatabaseConfig, EnvironmentConfig};
use car_matcher::database::DatabaseConnection;
use car_matcher::repositories::{CarRepository, InMemoryCarRepository, PgCarRepository};
use car_matcher::routes::create_app_router;
use car_matcher::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Car Matcher - API de recomendación de carros");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se aceptan todos los orígenes");
    }

    let repository = create_repository(&config).await?;
    let cache = create_cache(&config).await;

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app_router(AppState::new(repository, config, cache));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🎯 Recomendaciones:");
    info!("   POST /api/recommendations - Ranking del inventario para un perfil");
    info!("🚙 Inventario:");
    info!("   GET  /api/cars - Listar carros");
    info!("   POST /api/cars - Crear carro");
    info!("   GET  /api/cars/:id - Obtener carro");
    info!("   PUT  /api/cars/:id - Actualizar carro");
    info!("   DELETE /api/cars/:id - Eliminar carro");
    info!("   POST /api/cars/:id/tco - Recalcular costo total de propiedad");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// PostgreSQL si hay DATABASE_URL, si no el seed JSON de INVENTORY_FILE
async fn create_repository(config: &EnvironmentConfig) -> Result<Arc<dyn CarRepository>> {
    if let Some(url) = &config.database_url {
        let connection = match DatabaseConnection::new(&DatabaseConfig::new(url.as_str())).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("❌ Error conectando a la base de datos: {}", e);
                return Err(anyhow::anyhow!("Error de base de datos: {}", e));
            }
        };
        return Ok(Arc::new(PgCarRepository::new(connection.pool().clone())));
    }

    if let Some(path) = &config.inventory_file {
        let repository = InMemoryCarRepository::from_json_file(path).await?;
        return Ok(Arc::new(repository));
    }

    Err(anyhow::anyhow!(
        "Configure DATABASE_URL o INVENTORY_FILE para cargar el inventario"
    ))
}

/// Redis es opcional: sin él las recomendaciones no se cachean
async fn create_cache(config: &EnvironmentConfig) -> RecommendationCache {
    let Some(redis_url) = &config.redis_url else {
        info!("ℹ️ REDIS_URL no configurado, cache de recomendaciones deshabilitado");
        return RecommendationCache::disabled();
    };

    let cache_config = CacheConfig {
        redis_url: redis_url.clone(),
        default_ttl: config.recommendation_cache_ttl,
        ..Default::default()
    };

    match RedisClient::new(cache_config).await {
        Ok(client) => RecommendationCache::new(client),
        Err(e) => {
            warn!("⚠️ Redis no disponible, continuando sin cache: {}", e);
            RecommendationCache::disabled()
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
