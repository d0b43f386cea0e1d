use std::sync::Arc;

use validator::Validate;

use crate::cache::RecommendationCache;
use crate::dto::car_dto::CarFilters;
use crate::dto::recommendation_dto::{
    RecommendationQuery, RecommendationResponse, MAX_RECOMMENDATION_LIMIT,
};
use crate::models::UserProfile;
use crate::repositories::CarRepository;
use crate::services::ranking_service::{build_response, rank_inventory, RankingOptions};
use crate::services::tco_service::TcoCalculator;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

pub struct RecommendationController {
    repository: Arc<dyn CarRepository>,
    cache: RecommendationCache,
    calculator: TcoCalculator,
    options: RankingOptions,
}

impl RecommendationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            cache: state.cache.clone(),
            calculator: state.tco_calculator.clone(),
            options: RankingOptions {
                limit: state.config.recommendation_limit,
                only_profile_state: false,
                assumptions: state.config.tco_defaults.clone(),
            },
        }
    }

    /// Resolver las opciones de la consulta sobre las de configuración
    fn resolve_options(&self, query: &RecommendationQuery) -> Result<RankingOptions, AppError> {
        let limit = query.limit.unwrap_or(self.options.limit);
        if limit == 0 {
            return Err(validation_error("limit", "limit deve ser maior que zero"));
        }

        Ok(RankingOptions {
            limit: limit.min(MAX_RECOMMENDATION_LIMIT),
            only_profile_state: query.apenas_regiao,
            assumptions: self.options.assumptions.clone(),
        })
    }

    pub async fn recommend(
        &self,
        mut profile: UserProfile,
        query: RecommendationQuery,
    ) -> Result<RecommendationResponse, AppError> {
        profile.validate()?;
        profile.state = profile.state.trim().to_uppercase();

        let options = self.resolve_options(&query)?;

        let digest = RecommendationCache::digest(&(&profile, &query))?;
        if let Some(cached) = self.cache.get(&digest).await {
            log::debug!("📥 Recomendaciones servidas desde cache");
            return Ok(cached);
        }

        // Orçamento y región se filtran en el ranking para contar los descartes
        let inventory = self.repository.list(&CarFilters::default()).await?;

        let outcome = rank_inventory(&profile, &inventory, &options, &self.calculator);

        log::info!(
            "🎯 {} recomendaciones para perfil {} ({} evaluados, {} fuera del orçamento, {} fuera de la región, {} sin notas)",
            outcome.recommendations.len(),
            profile.location(),
            outcome.evaluated,
            outcome.out_of_budget,
            outcome.outside_region,
            outcome.skipped
        );

        let response = build_response(&profile, outcome, &options);
        self.cache.set(&digest, &response).await;

        Ok(response)
    }
}
