use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::cache::RecommendationCache;
use crate::dto::car_dto::{CarFilters, CreateCarRequest, UpdateCarRequest};
use crate::dto::recommendation_dto::TcoRequest;
use crate::dto::ApiResponse;
use crate::models::{Car, TcoAssumptions, TcoBreakdown};
use crate::repositories::CarRepository;
use crate::services::tco_service::{monthly_budget_cap, TcoCalculator, TcoInput};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, validation_error, AppError};

/// Límite de página cuando la consulta no lo indica
pub const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

pub struct CarController {
    repository: Arc<dyn CarRepository>,
    cache: RecommendationCache,
    calculator: TcoCalculator,
    tco_defaults: TcoAssumptions,
}

impl CarController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            cache: state.cache.clone(),
            calculator: state.tco_calculator.clone(),
            tco_defaults: state.config.tco_defaults.clone(),
        }
    }

    pub async fn create(&self, request: CreateCarRequest) -> Result<ApiResponse<Car>, AppError> {
        request.validate()?;

        let car = self.repository.create(request.into_car()).await?;
        self.cache.invalidate().await;

        log::info!("🚗 Carro creado: {} ({})", car.display_name(), car.id);

        Ok(ApiResponse::success_with_message(
            car,
            "Carro adicionado ao estoque".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Car, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    pub async fn list(&self, mut filters: CarFilters) -> Result<Vec<Car>, AppError> {
        if filters.limit.is_some_and(|limit| limit < 0) || filters.offset.is_some_and(|o| o < 0) {
            return Err(bad_request_error("limit e offset devem ser positivos"));
        }
        if let (Some(min), Some(max)) = (filters.preco_min, filters.preco_max) {
            if min > max {
                return Err(validation_error("preco_min", "preco_min maior que preco_max"));
            }
        }

        filters.limit = Some(filters.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE));

        self.repository.list(&filters).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCarRequest,
    ) -> Result<ApiResponse<Car>, AppError> {
        request.validate()?;

        let car = self.repository.update(id, &request).await?;
        self.cache.invalidate().await;

        log::info!("✏️ Carro actualizado: {}", car.id);

        Ok(ApiResponse::success_with_message(
            car,
            "Carro atualizado".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        self.cache.invalidate().await;

        log::info!("🗑️ Carro eliminado: {}", id);
        Ok(())
    }

    /// Recalcular el TCO de un carro con premisas editadas por el usuario
    pub async fn tco(&self, id: Uuid, request: TcoRequest) -> Result<TcoBreakdown, AppError> {
        let assumptions = request.assumptions.resolve(&self.tco_defaults);
        assumptions.validate()?;

        if request.orcamento_max.is_some_and(|max| max <= 0.0) {
            return Err(validation_error("orcamento_max", "orcamento_max deve ser positivo"));
        }

        let car = self.get_by_id(id).await?;
        let cap = monthly_budget_cap(
            request.renda_mensal,
            request.orcamento_max.unwrap_or(car.preco),
        );

        Ok(self.calculator.calculate(
            &TcoInput {
                price: car.preco,
                fuel_efficiency_km_l: car.consumo_km_l,
                state: &car.concessionaria.estado,
                monthly_budget_cap: cap,
            },
            &assumptions,
        ))
    }
}
