//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::cache::RecommendationCache;
use crate::config::environment::EnvironmentConfig;
use crate::middleware::RateLimitState;
use crate::repositories::CarRepository;
use crate::services::tco_service::{TcoCalculator, TcoRates};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn CarRepository>,
    pub config: EnvironmentConfig,
    pub cache: RecommendationCache,
    pub tco_calculator: TcoCalculator,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn CarRepository>,
        config: EnvironmentConfig,
        cache: RecommendationCache,
    ) -> Self {
        let tco_calculator =
            TcoCalculator::new(TcoRates::default(), config.fallback_fuel_efficiency);
        let rate_limit = RateLimitState::new(config.rate_limit_requests, config.rate_limit_window);

        Self {
            repository,
            config,
            cache,
            tco_calculator,
            rate_limit,
        }
    }
}
