use serde::{Deserialize, Serialize};

use crate::models::{IncomeBracket, Recommendation, TcoAssumptionsInput};

/// Límite superior de recomendaciones por consulta
pub const MAX_RECOMMENDATION_LIMIT: usize = 50;

// Opciones de consulta (query string) de POST /api/recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub apenas_regiao: bool,
}

// Resumen del perfil devuelto junto a las recomendaciones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSummary {
    pub budget_range: String,
    pub location: String,
    pub usage: String,
    pub family_size: u8,
    pub main_priorities: Vec<String>,
    pub monthly_budget_cap: f64,
    pub cars_evaluated: usize,
    pub cars_out_of_budget: usize,
    pub cars_outside_region: usize,
    pub cars_skipped: usize,
}

// Response de POST /api/recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    pub total_recommendations: usize,
    pub profile_summary: ProfileSummary,
    pub suggestions: Vec<String>,
}

// Request de POST /api/cars/:id/tco
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TcoRequest {
    #[serde(default)]
    pub assumptions: TcoAssumptionsInput,
    pub renda_mensal: Option<IncomeBracket>,
    pub orcamento_max: Option<f64>,
}
