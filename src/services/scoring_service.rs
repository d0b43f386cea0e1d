//! Servicio de matching perfil x carro
//!
//! Promedio ponderado de las cinco notas del carro con los niveles de
//! prioridad del perfil como pesos, más ajustes por composición familiar,
//! adecuación de la categoría al uso y preferencias de marca/modelo/câmbio.
//! Todo es determinístico y sin estado.

use crate::models::{
    AttributeContribution, Car, CarAttribute, CarCategory, ScoreAdjustment, UsageCategory,
    UserProfile,
};

/// Ajuste por capacidad insuficiente para la familia
const SEATS_SHORTAGE_PENALTY: f64 = -20.0;
const FAMILY_SEATS_BONUS: f64 = 5.0;
const PREFERRED_BRAND_BONUS: f64 = 5.0;
const PREFERRED_MODEL_BONUS: f64 = 5.0;
const TRANSMISSION_MATCH_BONUS: f64 = 3.0;
const TRANSMISSION_MISMATCH_PENALTY: f64 = -5.0;

/// Familias desde este tamaño necesitan 5 lugares o más
const LARGE_FAMILY_SIZE: u8 = 4;

/// Nota mínima para citar un segundo atributo en la justificación
const SECOND_HIGHLIGHT_MIN_SCORE: f64 = 70.0;

/// Resultado de evaluar un carro contra el perfil
#[derive(Debug, Clone, PartialEq)]
pub enum CarEvaluation {
    Scored(MatchScore),
    OutOfBudget,
    MissingScores(Vec<CarAttribute>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    /// Promedio ponderado 0-100, sin ajustes
    pub weighted_average: f64,
    /// Puntaje final 0-100 después de ajustes
    pub score: f64,
    pub contributions: Vec<AttributeContribution>,
    pub adjustments: Vec<ScoreAdjustment>,
    pub category_fit: f64,
}

/// Evaluar un carro. El filtro de orçamento se aplica antes de puntuar.
pub fn evaluate_car(profile: &UserProfile, car: &Car) -> CarEvaluation {
    if !profile.within_budget(car.preco) {
        return CarEvaluation::OutOfBudget;
    }

    let missing = car.scores.missing();
    if !missing.is_empty() {
        return CarEvaluation::MissingScores(missing);
    }

    let contributions: Vec<AttributeContribution> = profile
        .prioridades
        .normalized_weights()
        .into_iter()
        .map(|(attribute, weight)| {
            let score = car.scores.get(attribute).unwrap_or_default().clamp(0.0, 100.0);
            AttributeContribution {
                attribute,
                score,
                weight,
                contribution: score * weight,
            }
        })
        .collect();

    let weighted_average: f64 = contributions.iter().map(|c| c.contribution).sum();
    let category_fit = category_fit(profile.uso_principal, car.categoria);
    let adjustments = score_adjustments(profile, car, category_fit);
    let total_adjustment: f64 = adjustments.iter().map(|a| a.points).sum();

    CarEvaluation::Scored(MatchScore {
        weighted_average,
        score: (weighted_average + total_adjustment).clamp(0.0, 100.0),
        contributions,
        adjustments,
        category_fit,
    })
}

/// Puntos por adecuación de la categoría al uso principal
pub fn category_fit(usage: UsageCategory, category: CarCategory) -> f64 {
    use CarCategory::*;
    use UsageCategory::*;

    match (usage, category) {
        (Familia, Suv | Minivan) => 5.0,
        (Familia, Sedan | Perua) => 3.0,
        (Familia, Coupe | Conversivel | Utilitario) => -10.0,

        (Trabalho, Sedan | Hatch) => 3.0,
        (Trabalho, Conversivel) => -5.0,

        (Lazer, Suv | Pickup) => 5.0,
        (Lazer, Conversivel | Coupe) => 3.0,
        (Lazer, Utilitario) => -5.0,

        (Comercial, Pickup | Utilitario) => 8.0,
        (Comercial, Minivan | Perua) => 3.0,
        (Comercial, Coupe | Conversivel) => -10.0,

        (TransporteApp, Sedan) => 5.0,
        (TransporteApp, Hatch | Minivan) => 2.0,
        (TransporteApp, Pickup) => -5.0,
        (TransporteApp, Coupe | Conversivel | Utilitario) => -10.0,

        (PrimeiroCarro, Hatch) => 5.0,
        (PrimeiroCarro, Sedan) => 2.0,
        (PrimeiroCarro, Pickup | Coupe | Conversivel) => -5.0,

        _ => 0.0,
    }
}

fn score_adjustments(profile: &UserProfile, car: &Car, category_fit: f64) -> Vec<ScoreAdjustment> {
    let mut adjustments = Vec::new();
    let seats = car.seats();

    if seats < profile.tamanho_familia {
        adjustments.push(ScoreAdjustment {
            reason: format!(
                "{} lugares para uma família de {} pessoas",
                seats, profile.tamanho_familia
            ),
            points: SEATS_SHORTAGE_PENALTY,
        });
    } else if profile.tamanho_familia >= LARGE_FAMILY_SIZE && seats >= 5 {
        adjustments.push(ScoreAdjustment {
            reason: format!("Acomoda a família com {} lugares", seats),
            points: FAMILY_SEATS_BONUS,
        });
    }

    if profile.tem_criancas {
        let points = match car.categoria {
            CarCategory::Suv | CarCategory::Minivan | CarCategory::Sedan | CarCategory::Perua => {
                3.0
            }
            CarCategory::Coupe | CarCategory::Conversivel => -10.0,
            _ => 0.0,
        };
        if points != 0.0 {
            adjustments.push(ScoreAdjustment {
                reason: if points > 0.0 {
                    "Espaço para cadeirinhas infantis".to_string()
                } else {
                    "Pouco prático para crianças".to_string()
                },
                points,
            });
        }
    }

    if profile.tem_idosos {
        let points = match car.categoria {
            CarCategory::Suv | CarCategory::Minivan | CarCategory::Sedan => 3.0,
            CarCategory::Coupe | CarCategory::Conversivel | CarCategory::Pickup => -5.0,
            _ => 0.0,
        };
        if points != 0.0 {
            adjustments.push(ScoreAdjustment {
                reason: if points > 0.0 {
                    "Acesso facilitado para idosos".to_string()
                } else {
                    "Acesso difícil para idosos".to_string()
                },
                points,
            });
        }
    }

    if category_fit != 0.0 {
        adjustments.push(ScoreAdjustment {
            reason: format!(
                "{} para {}",
                car.categoria.label(),
                profile.uso_principal.label()
            ),
            points: category_fit,
        });
    }

    if profile.prefers_brand(&car.marca) {
        adjustments.push(ScoreAdjustment {
            reason: format!("Marca preferida: {}", car.marca),
            points: PREFERRED_BRAND_BONUS,
        });
    }

    if profile.prefers_model(&car.modelo) {
        adjustments.push(ScoreAdjustment {
            reason: format!("Modelo preferido: {}", car.modelo),
            points: PREFERRED_MODEL_BONUS,
        });
    }

    if let Some(preferred) = profile.cambio_preferido {
        if preferred.is_automatic() == car.cambio.is_automatic() {
            adjustments.push(ScoreAdjustment {
                reason: "Câmbio conforme a preferência".to_string(),
                points: TRANSMISSION_MATCH_BONUS,
            });
        } else {
            adjustments.push(ScoreAdjustment {
                reason: "Câmbio diferente do preferido".to_string(),
                points: TRANSMISSION_MISMATCH_PENALTY,
            });
        }
    }

    adjustments
}

/// Atributos que más aportaron, en orden. Empates siguen el orden fijo de atributos.
pub fn top_contributions(score: &MatchScore, count: usize) -> Vec<&AttributeContribution> {
    let mut ordered: Vec<&AttributeContribution> = score.contributions.iter().collect();
    ordered.sort_by(|a, b| {
        b.contribution
            .total_cmp(&a.contribution)
            .then_with(|| a.attribute.cmp(&b.attribute))
    });
    ordered.truncate(count);
    ordered
}

/// Texto de justificación: 1-2 atributos destacados y la adecuación de la categoría
pub fn build_justification(profile: &UserProfile, car: &Car, score: &MatchScore) -> String {
    let top = top_contributions(score, 2);

    let highlights = match top.as_slice() {
        [first, second] if second.score >= SECOND_HIGHLIGHT_MIN_SCORE => format!(
            "Destaque em {} ({:.0}/100) e {} ({:.0}/100)",
            first.attribute.label(),
            first.score,
            second.attribute.label(),
            second.score
        ),
        [first, ..] => format!(
            "Destaque em {} ({:.0}/100)",
            first.attribute.label(),
            first.score
        ),
        [] => "Sem atributos avaliados".to_string(),
    };

    let category = if score.category_fit > 0.0 {
        format!(
            "{} combina com {}",
            car.categoria.label(),
            profile.uso_principal.label()
        )
    } else if score.category_fit < 0.0 {
        format!(
            "{} é pouco indicado para {}",
            car.categoria.label(),
            profile.uso_principal.label()
        )
    } else {
        format!(
            "{} atende a {}",
            car.categoria.label(),
            profile.uso_principal.label()
        )
    };

    format!("{}. {}.", highlights, category)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::profile::tests::family_profile;
    use crate::models::{CarScores, Dealership, FuelType, Transmission};
    use chrono::Utc;
    use uuid::Uuid;

    pub(crate) fn car(
        id: u128,
        categoria: CarCategory,
        preco: f64,
        lugares: u8,
        scores: [f64; 5],
    ) -> Car {
        Car {
            id: Uuid::from_u128(id),
            marca: "Marca".to_string(),
            modelo: format!("Modelo {}", id),
            versao: None,
            ano: 2023,
            preco,
            categoria,
            combustivel: FuelType::Flex,
            cambio: Transmission::Automatico,
            quilometragem: 10_000,
            cor: None,
            lugares: Some(lugares),
            consumo_km_l: Some(12.0),
            imagens: vec![],
            concessionaria: Dealership {
                id: Uuid::from_u128(999),
                nome: "Concessionária Centro".to_string(),
                cidade: "São Paulo".to_string(),
                estado: "SP".to_string(),
                telefone: None,
                email: None,
            },
            scores: CarScores {
                economia: Some(scores[0]),
                espaco: Some(scores[1]),
                performance: Some(scores[2]),
                conforto: Some(scores[3]),
                seguranca: Some(scores[4]),
            },
            created_at: Utc::now(),
        }
    }

    fn scored(evaluation: CarEvaluation) -> MatchScore {
        match evaluation {
            CarEvaluation::Scored(score) => score,
            other => panic!("expected scored car, got {:?}", other),
        }
    }

    #[test]
    fn test_family_sedan_beats_coupe() {
        let profile = family_profile();
        let sedan = car(1, CarCategory::Sedan, 60_000.0, 5, [85.0, 90.0, 70.0, 75.0, 88.0]);
        let coupe = car(2, CarCategory::Coupe, 70_000.0, 2, [60.0, 40.0, 95.0, 80.0, 60.0]);

        let sedan_score = scored(evaluate_car(&profile, &sedan));
        let coupe_score = scored(evaluate_car(&profile, &coupe));

        assert!(sedan_score.score > coupe_score.score);
        assert!((sedan_score.weighted_average - 1750.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_budget_is_not_scored() {
        let profile = family_profile();
        let expensive = car(1, CarCategory::Suv, 80_000.01, 5, [80.0; 5]);
        let cheap = car(2, CarCategory::Suv, 49_999.0, 5, [80.0; 5]);
        assert_eq!(evaluate_car(&profile, &expensive), CarEvaluation::OutOfBudget);
        assert_eq!(evaluate_car(&profile, &cheap), CarEvaluation::OutOfBudget);

        let at_limit = car(3, CarCategory::Suv, 80_000.0, 5, [80.0; 5]);
        assert!(matches!(evaluate_car(&profile, &at_limit), CarEvaluation::Scored(_)));
    }

    #[test]
    fn test_missing_scores_are_reported() {
        let profile = family_profile();
        let mut incomplete = car(1, CarCategory::Sedan, 60_000.0, 5, [80.0; 5]);
        incomplete.scores.seguranca = None;
        assert_eq!(
            evaluate_car(&profile, &incomplete),
            CarEvaluation::MissingScores(vec![CarAttribute::Seguranca])
        );
    }

    #[test]
    fn test_score_is_clamped() {
        let mut profile = family_profile();
        profile.marcas_preferidas = vec!["Marca".to_string()];
        profile.modelos_preferidos = vec!["Modelo 1".to_string()];
        profile.cambio_preferido = Some(Transmission::Automatico);
        let perfect = car(1, CarCategory::Suv, 60_000.0, 7, [100.0; 5]);
        assert_eq!(scored(evaluate_car(&profile, &perfect)).score, 100.0);

        let mut lonely = family_profile();
        lonely.tamanho_familia = 6;
        let awful = car(2, CarCategory::Conversivel, 60_000.0, 2, [5.0; 5]);
        assert_eq!(scored(evaluate_car(&lonely, &awful)).score, 0.0);
    }

    #[test]
    fn test_seat_shortage_penalty() {
        let mut profile = family_profile();
        profile.tamanho_familia = 6;
        profile.tem_criancas = false;
        let hatch = car(1, CarCategory::Hatch, 60_000.0, 5, [80.0; 5]);
        let score = scored(evaluate_car(&profile, &hatch));
        assert!(score
            .adjustments
            .iter()
            .any(|a| a.points == SEATS_SHORTAGE_PENALTY));
    }

    #[test]
    fn test_transmission_preference() {
        let mut profile = family_profile();
        profile.cambio_preferido = Some(Transmission::Manual);
        let automatic = car(1, CarCategory::Sedan, 60_000.0, 5, [80.0; 5]);
        let mut manual = automatic.clone();
        manual.cambio = Transmission::Manual;

        let automatic_score = scored(evaluate_car(&profile, &automatic)).score;
        let manual_score = scored(evaluate_car(&profile, &manual)).score;
        assert!((manual_score - automatic_score - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_justification_cites_top_attributes() {
        let profile = family_profile();
        let sedan = car(1, CarCategory::Sedan, 60_000.0, 5, [85.0, 90.0, 70.0, 75.0, 88.0]);
        let score = scored(evaluate_car(&profile, &sedan));
        let text = build_justification(&profile, &sedan, &score);
        assert_eq!(
            text,
            "Destaque em espaço (90/100) e segurança (88/100). Sedã combina com uso familiar."
        );
    }

    #[test]
    fn test_justification_single_highlight() {
        let mut profile = family_profile();
        profile.uso_principal = UsageCategory::Trabalho;
        let pickup = car(1, CarCategory::Pickup, 60_000.0, 5, [95.0, 40.0, 30.0, 20.0, 50.0]);
        let score = scored(evaluate_car(&profile, &pickup));
        let text = build_justification(&profile, &pickup, &score);
        assert_eq!(text, "Destaque em economia (95/100). Picape atende a uso no trabalho.");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let profile = family_profile();
        let suv = car(1, CarCategory::Suv, 75_000.0, 5, [70.0, 85.0, 65.0, 80.0, 90.0]);
        assert_eq!(evaluate_car(&profile, &suv), evaluate_car(&profile, &suv));
    }
}
