use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{CarFilters, CreateCarRequest, UpdateCarRequest};
use crate::dto::recommendation_dto::TcoRequest;
use crate::dto::ApiResponse;
use crate::models::{Car, TcoBreakdown};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/:id", get(get_car).put(update_car).delete(delete_car))
        .route("/:id/tco", post(car_tco))
}

async fn create_car(
    State(state): State<AppState>,
    request: Result<Json<CreateCarRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Car>>), AppError> {
    let Json(request) = request?;
    let controller = CarController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_cars(
    State(state): State<AppState>,
    filters: Result<Query<CarFilters>, QueryRejection>,
) -> Result<Json<Vec<Car>>, AppError> {
    let Query(filters) = filters?;
    let controller = CarController::new(&state);
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Car>, AppError> {
    let Path(id) = id?;
    let controller = CarController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_car(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    request: Result<Json<UpdateCarRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let Path(id) = id?;
    let Json(request) = request?;
    let controller = CarController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Path(id) = id?;
    let controller = CarController::new(&state);
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Carro removido do estoque".to_string())))
}

async fn car_tco(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    request: Result<Json<TcoRequest>, JsonRejection>,
) -> Result<Json<TcoBreakdown>, AppError> {
    let Path(id) = id?;
    let Json(request) = request?;
    let controller = CarController::new(&state);
    let response = controller.tco(id, request).await?;
    Ok(Json(response))
}
