use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::post,
    Json, Router,
};

use crate::controllers::recommendation_controller::RecommendationController;
use crate::dto::recommendation_dto::{RecommendationQuery, RecommendationResponse};
use crate::models::UserProfile;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_recommendation_router() -> Router<AppState> {
    Router::new().route("/", post(recommend))
}

async fn recommend(
    State(state): State<AppState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
    profile: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Query(query) = query?;
    let Json(profile) = profile?;

    let controller = RecommendationController::new(&state);
    let response = controller.recommend(profile, query).await?;
    Ok(Json(response))
}
