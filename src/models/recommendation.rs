//! Modelo de Recommendation
//!
//! Un Car unido a su puntaje de match, la justificación y el TCO.
//! Se recrea en cada consulta; no existe tabla para esto.

use serde::{Deserialize, Serialize};

use super::car::{Car, CarAttribute};
use super::tco::TcoBreakdown;

/// Ajuste aplicado sobre el promedio ponderado, en puntos porcentuales
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreAdjustment {
    pub reason: String,
    pub points: f64,
}

/// Aporte de un atributo al promedio ponderado
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeContribution {
    pub attribute: CarAttribute,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub ranking: usize,
    pub car: Car,
    /// 0.0 - 1.0
    pub match_score: f64,
    /// 0 - 100, una casa decimal
    pub match_percentage: f64,
    pub justification: String,
    pub contributions: Vec<AttributeContribution>,
    pub adjustments: Vec<ScoreAdjustment>,
    pub tco: TcoBreakdown,
}
