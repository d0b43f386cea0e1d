//! Servicio de costo total de propiedad (TCO)
//!
//! Cálculo puro: financiamiento por amortización estándar (tabla Price),
//! combustible por km rodado, y mantenimiento/seguro/IPVA como porcentajes
//! anuales del precio.

use crate::models::{IncomeBracket, TcoAssumptions, TcoBreakdown};
use crate::utils::currency::round2;

/// Parcela máxima como fracción de la renta declarada
pub const INCOME_COMMITMENT_RATIO: f64 = 0.30;

/// Sin renta declarada, el límite mensual es esta fracción del orçamento máximo
pub const BUDGET_MONTHLY_RATIO: f64 = 0.03;

/// Porcentajes anuales sobre el precio del carro
#[derive(Debug, Clone, PartialEq)]
pub struct TcoRates {
    /// Mantenimiento anual para 1000 km/mes; escala linealmente con el uso
    pub maintenance_annual_pct: f64,
    pub insurance_annual_pct: f64,
    /// IPVA para estados fuera de la tabla
    pub default_tax_annual_pct: f64,
    pub reference_monthly_km: f64,
}

impl Default for TcoRates {
    fn default() -> Self {
        Self {
            maintenance_annual_pct: 1.5,
            insurance_annual_pct: 4.5,
            default_tax_annual_pct: 3.0,
            reference_monthly_km: 1000.0,
        }
    }
}

impl TcoRates {
    /// Alícuota de IPVA por UF (automóveles de passeio)
    pub fn tax_annual_pct(&self, state: &str) -> f64 {
        match state.trim().to_uppercase().as_str() {
            "SP" | "RJ" | "MG" => 4.0,
            "GO" => 3.75,
            "PR" | "DF" => 3.5,
            "RS" | "PE" | "CE" => 3.0,
            "BA" => 2.5,
            "SC" | "ES" => 2.0,
            _ => self.default_tax_annual_pct,
        }
    }
}

/// Datos de un carro necesarios para el TCO
#[derive(Debug, Clone)]
pub struct TcoInput<'a> {
    pub price: f64,
    pub fuel_efficiency_km_l: Option<f64>,
    pub state: &'a str,
    pub monthly_budget_cap: f64,
}

#[derive(Debug, Clone)]
pub struct TcoCalculator {
    rates: TcoRates,
    fallback_efficiency_km_l: f64,
}

impl TcoCalculator {
    pub fn new(rates: TcoRates, fallback_efficiency_km_l: f64) -> Self {
        Self {
            rates,
            fallback_efficiency_km_l,
        }
    }

    /// Calcular el desglose mensual. La eficiencia usada es, en orden: la
    /// de las premisas, la del carro y la de configuración.
    pub fn calculate(&self, input: &TcoInput<'_>, assumptions: &TcoAssumptions) -> TcoBreakdown {
        let efficiency = assumptions
            .fuel_efficiency_km_l
            .or(input.fuel_efficiency_km_l)
            .filter(|e| *e > 0.0)
            .unwrap_or(self.fallback_efficiency_km_l);

        let down_payment = round2(input.price * assumptions.down_payment_pct / 100.0);
        let financed_amount = round2(input.price - down_payment);

        let financing = round2(monthly_installment(
            financed_amount,
            assumptions.annual_interest_rate,
            assumptions.term_months,
        ));
        let fuel = round2(assumptions.monthly_km / efficiency * assumptions.fuel_price);
        let usage_factor = assumptions.monthly_km / self.rates.reference_monthly_km;
        let maintenance =
            round2(input.price * self.rates.maintenance_annual_pct / 100.0 / 12.0 * usage_factor);
        let insurance = round2(input.price * self.rates.insurance_annual_pct / 100.0 / 12.0);
        let tax = round2(input.price * self.rates.tax_annual_pct(input.state) / 100.0 / 12.0);

        let total_monthly = round2(financing + fuel + maintenance + insurance + tax);

        let mut resolved = assumptions.clone();
        resolved.fuel_efficiency_km_l = Some(efficiency);

        TcoBreakdown {
            assumptions: resolved,
            down_payment,
            financed_amount,
            financing,
            fuel,
            maintenance,
            insurance,
            tax,
            total_monthly,
            monthly_budget_cap: round2(input.monthly_budget_cap),
            fits_budget: total_monthly <= input.monthly_budget_cap,
        }
    }
}

/// Parcela de amortización estándar: P·i / (1 − (1 + i)^−n), i = tasa anual / 12
pub fn monthly_installment(principal: f64, annual_rate_pct: f64, term_months: u32) -> f64 {
    if principal <= 0.0 || term_months == 0 {
        return 0.0;
    }

    let n = f64::from(term_months);
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    if monthly_rate <= 0.0 {
        return principal / n;
    }

    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-n))
}

/// Límite mensual que el comprador puede asumir
pub fn monthly_budget_cap(income: Option<IncomeBracket>, orcamento_max: f64) -> f64 {
    match income {
        Some(bracket) => bracket.representative_income() * INCOME_COMMITMENT_RATIO,
        None => orcamento_max * BUDGET_MONTHLY_RATIO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assumptions() -> TcoAssumptions {
        TcoAssumptions {
            down_payment_pct: 20.0,
            term_months: 60,
            annual_interest_rate: 12.0,
            monthly_km: 1000.0,
            fuel_price: 5.20,
            fuel_efficiency_km_l: Some(12.0),
        }
    }

    fn calculator() -> TcoCalculator {
        TcoCalculator::new(TcoRates::default(), 11.0)
    }

    #[test]
    fn test_reference_financing() {
        let input = TcoInput {
            price: 84_990.0,
            fuel_efficiency_km_l: None,
            state: "SP",
            monthly_budget_cap: 3_000.0,
        };
        let tco = calculator().calculate(&input, &assumptions());

        assert_eq!(tco.down_payment, 16_998.0);
        assert_eq!(tco.financed_amount, 67_992.0);
        assert!((tco.financing - 1_512.44).abs() < 0.01, "financing = {}", tco.financing);
        assert!((tco.fuel - 433.33).abs() < 0.01, "fuel = {}", tco.fuel);
        assert_eq!(tco.assumptions.fuel_efficiency_km_l, Some(12.0));
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let calculator = calculator();
        for km in [500.0, 1234.0, 2500.0, 5000.0] {
            for fuel_price in [3.0, 5.79, 7.33, 10.0] {
                for price in [35_000.0, 84_990.0, 249_900.0] {
                    let mut premises = assumptions();
                    premises.monthly_km = km;
                    premises.fuel_price = fuel_price;
                    let input = TcoInput {
                        price,
                        fuel_efficiency_km_l: Some(9.7),
                        state: "MG",
                        monthly_budget_cap: 2_000.0,
                    };
                    let tco = calculator.calculate(&input, &premises);
                    assert!(
                        (tco.total_monthly - tco.components_sum()).abs() < 1e-6,
                        "total {} != sum {}",
                        tco.total_monthly,
                        tco.components_sum()
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_interest_is_linear() {
        assert!((monthly_installment(12_000.0, 0.0, 12) - 1_000.0).abs() < 1e-9);
        assert_eq!(monthly_installment(0.0, 12.0, 60), 0.0);
    }

    #[test]
    fn test_large_down_payment_shrinks_financing() {
        let mut premises = assumptions();
        premises.down_payment_pct = 90.0;
        let input = TcoInput {
            price: 50_000.0,
            fuel_efficiency_km_l: None,
            state: "SC",
            monthly_budget_cap: 1_500.0,
        };
        let tco = calculator().calculate(&input, &premises);
        assert_eq!(tco.financed_amount, 5_000.0);
        assert!(tco.financing < 120.0);
    }

    #[test]
    fn test_efficiency_fallbacks() {
        let mut premises = assumptions();
        premises.fuel_efficiency_km_l = None;
        let calculator = calculator();

        let from_car = calculator.calculate(
            &TcoInput {
                price: 60_000.0,
                fuel_efficiency_km_l: Some(15.0),
                state: "SP",
                monthly_budget_cap: 2_000.0,
            },
            &premises,
        );
        assert_eq!(from_car.assumptions.fuel_efficiency_km_l, Some(15.0));

        let from_config = calculator.calculate(
            &TcoInput {
                price: 60_000.0,
                fuel_efficiency_km_l: None,
                state: "SP",
                monthly_budget_cap: 2_000.0,
            },
            &premises,
        );
        assert_eq!(from_config.assumptions.fuel_efficiency_km_l, Some(11.0));
    }

    #[test]
    fn test_tax_by_state() {
        let rates = TcoRates::default();
        assert_eq!(rates.tax_annual_pct("sp"), 4.0);
        assert_eq!(rates.tax_annual_pct("SC"), 2.0);
        assert_eq!(rates.tax_annual_pct("AC"), 3.0);
    }

    #[test]
    fn test_budget_cap() {
        let cap = monthly_budget_cap(Some(IncomeBracket::De5000A8000), 80_000.0);
        assert!((cap - 1_950.0).abs() < 1e-6);
        assert!((monthly_budget_cap(None, 80_000.0) - 2_400.0).abs() < 1e-6);
    }

    #[test]
    fn test_fits_budget_flag() {
        let input = TcoInput {
            price: 84_990.0,
            fuel_efficiency_km_l: None,
            state: "SP",
            monthly_budget_cap: 1_000.0,
        };
        assert!(!calculator().calculate(&input, &assumptions()).fits_budget);

        let generous = TcoInput {
            monthly_budget_cap: 10_000.0,
            ..input
        };
        assert!(calculator().calculate(&generous, &assumptions()).fits_budget);
    }
}
