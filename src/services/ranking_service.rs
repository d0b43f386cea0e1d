//! Ranking del inventario para un perfil
//!
//! Evalúa cada carro de forma independiente, descarta los que quedan fuera
//! del orçamento o sin notas completas, y ordena por puntaje descendente con
//! desempate por id ascendente.

use crate::dto::recommendation_dto::{ProfileSummary, RecommendationResponse};
use crate::models::{Car, Recommendation, TcoAssumptions, UserProfile};
use crate::services::scoring_service::{
    build_justification, evaluate_car, CarEvaluation, MatchScore,
};
use crate::services::tco_service::{monthly_budget_cap, TcoCalculator, TcoInput};
use crate::utils::currency::{format_brl, round1, round2};

/// Opciones ya resueltas para un ranking
#[derive(Debug, Clone)]
pub struct RankingOptions {
    pub limit: usize,
    pub only_profile_state: bool,
    pub assumptions: TcoAssumptions,
}

/// Resultado del ranking con los contadores de descarte
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub recommendations: Vec<Recommendation>,
    pub evaluated: usize,
    pub out_of_budget: usize,
    pub outside_region: usize,
    pub skipped: usize,
}

/// Ordenar el inventario contra el perfil. El perfil debe venir validado.
pub fn rank_inventory(
    profile: &UserProfile,
    cars: &[Car],
    options: &RankingOptions,
    calculator: &TcoCalculator,
) -> RankingOutcome {
    let mut scored: Vec<(&Car, MatchScore)> = Vec::with_capacity(cars.len());
    let mut out_of_budget = 0;
    let mut outside_region = 0;
    let mut skipped = 0;

    for car in cars {
        if options.only_profile_state
            && !car
                .concessionaria
                .estado
                .trim()
                .eq_ignore_ascii_case(profile.state.trim())
        {
            outside_region += 1;
            continue;
        }

        match evaluate_car(profile, car) {
            CarEvaluation::Scored(score) => scored.push((car, score)),
            CarEvaluation::OutOfBudget => out_of_budget += 1,
            CarEvaluation::MissingScores(missing) => {
                log::warn!(
                    "⚠️ Carro {} ignorado: notas ausentes {:?}",
                    car.id,
                    missing
                );
                skipped += 1;
            }
        }
    }

    let evaluated = scored.len();

    scored.sort_by(|(car_a, a), (car_b, b)| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| car_a.id.cmp(&car_b.id))
    });
    scored.truncate(options.limit);

    let budget_cap = monthly_budget_cap(profile.renda_mensal, profile.orcamento_max);

    let recommendations = scored
        .into_iter()
        .enumerate()
        .map(|(index, (car, score))| {
            let tco = calculator.calculate(
                &TcoInput {
                    price: car.preco,
                    fuel_efficiency_km_l: car.consumo_km_l,
                    state: &profile.state,
                    monthly_budget_cap: budget_cap,
                },
                &options.assumptions,
            );
            Recommendation {
                ranking: index + 1,
                justification: build_justification(profile, car, &score),
                match_score: (score.score / 100.0 * 10_000.0).round() / 10_000.0,
                match_percentage: round1(score.score),
                contributions: score.contributions,
                adjustments: score.adjustments,
                car: car.clone(),
                tco,
            }
        })
        .collect();

    RankingOutcome {
        recommendations,
        evaluated,
        out_of_budget,
        outside_region,
        skipped,
    }
}

/// Resumen del perfil para la respuesta
pub fn build_profile_summary(profile: &UserProfile, outcome: &RankingOutcome) -> ProfileSummary {
    ProfileSummary {
        budget_range: format!(
            "{} - {}",
            format_brl(profile.orcamento_min),
            format_brl(profile.orcamento_max)
        ),
        location: profile.location(),
        usage: profile.uso_principal.label().to_string(),
        family_size: profile.tamanho_familia,
        main_priorities: profile
            .prioridades
            .selected()
            .iter()
            .map(|attribute| attribute.label().to_string())
            .collect(),
        monthly_budget_cap: round2(monthly_budget_cap(
            profile.renda_mensal,
            profile.orcamento_max,
        )),
        cars_evaluated: outcome.evaluated,
        cars_out_of_budget: outcome.out_of_budget,
        cars_outside_region: outcome.outside_region,
        cars_skipped: outcome.skipped,
    }
}

/// Sugerencias accionables cuando el resultado es vacío o nada cabe en el presupuesto mensual
pub fn build_suggestions(
    profile: &UserProfile,
    outcome: &RankingOutcome,
    options: &RankingOptions,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if outcome.recommendations.is_empty() {
        if outcome.out_of_budget > 0 {
            suggestions.push(format!(
                "Amplie a faixa de orçamento: {} carro(s) estão fora de {} - {}",
                outcome.out_of_budget,
                format_brl(profile.orcamento_min),
                format_brl(profile.orcamento_max)
            ));
        }
        if options.only_profile_state && outcome.outside_region > 0 {
            suggestions.push(format!(
                "Inclua concessionárias fora de {}: {} carro(s) disponíveis em outros estados",
                profile.state.to_uppercase(),
                outcome.outside_region
            ));
        }
        suggestions.push(
            "Revise as prioridades ou as preferências de marca, modelo e câmbio".to_string(),
        );
    } else if outcome.recommendations.iter().all(|r| !r.tco.fits_budget) {
        suggestions.push(
            "Nenhuma opção cabe no orçamento mensal: aumente a entrada ou o prazo do financiamento"
                .to_string(),
        );
    }

    suggestions
}

/// Armar la respuesta completa a partir de un ranking
pub fn build_response(
    profile: &UserProfile,
    outcome: RankingOutcome,
    options: &RankingOptions,
) -> RecommendationResponse {
    let profile_summary = build_profile_summary(profile, &outcome);
    let suggestions = build_suggestions(profile, &outcome, options);

    RecommendationResponse {
        total_recommendations: outcome.recommendations.len(),
        recommendations: outcome.recommendations,
        profile_summary,
        suggestions,
    }
}
