//! Modelos de costo total de propiedad (TCO)
//!
//! Las premisas son editables por el usuario; el desglose siempre se
//! recalcula a partir de ellas y nunca se persiste.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Premisas financieras resueltas, listas para el cálculo
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct TcoAssumptions {
    #[validate(range(min = 0.0, max = 90.0))]
    pub down_payment_pct: f64,

    #[validate(range(min = 1, max = 120))]
    pub term_months: u32,

    #[validate(range(min = 0.0, max = 60.0))]
    pub annual_interest_rate: f64,

    #[validate(range(min = 500.0, max = 5000.0))]
    pub monthly_km: f64,

    #[validate(range(min = 3.0, max = 10.0))]
    pub fuel_price: f64,

    /// None = usar el consumo informado por el carro
    #[validate(range(min = 1.0, max = 50.0))]
    pub fuel_efficiency_km_l: Option<f64>,
}

/// Premisas parciales enviadas por el usuario; lo que falte sale de la configuración
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TcoAssumptionsInput {
    pub down_payment_pct: Option<f64>,
    pub term_months: Option<u32>,
    pub annual_interest_rate: Option<f64>,
    pub monthly_km: Option<f64>,
    pub fuel_price: Option<f64>,
    pub fuel_efficiency_km_l: Option<f64>,
}

impl TcoAssumptionsInput {
    pub fn resolve(&self, defaults: &TcoAssumptions) -> TcoAssumptions {
        TcoAssumptions {
            down_payment_pct: self.down_payment_pct.unwrap_or(defaults.down_payment_pct),
            term_months: self.term_months.unwrap_or(defaults.term_months),
            annual_interest_rate: self
                .annual_interest_rate
                .unwrap_or(defaults.annual_interest_rate),
            monthly_km: self.monthly_km.unwrap_or(defaults.monthly_km),
            fuel_price: self.fuel_price.unwrap_or(defaults.fuel_price),
            fuel_efficiency_km_l: self.fuel_efficiency_km_l.or(defaults.fuel_efficiency_km_l),
        }
    }
}

/// Desglose mensual del TCO. total_monthly es la suma de las cinco partidas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TcoBreakdown {
    pub assumptions: TcoAssumptions,
    pub down_payment: f64,
    pub financed_amount: f64,
    pub financing: f64,
    pub fuel: f64,
    pub maintenance: f64,
    pub insurance: f64,
    pub tax: f64,
    pub total_monthly: f64,
    pub monthly_budget_cap: f64,
    pub fits_budget: bool,
}

impl TcoBreakdown {
    pub fn components_sum(&self) -> f64 {
        self.financing + self.fuel + self.maintenance + self.insurance + self.tax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> TcoAssumptions {
        TcoAssumptions {
            down_payment_pct: 20.0,
            term_months: 60,
            annual_interest_rate: 12.0,
            monthly_km: 1000.0,
            fuel_price: 5.20,
            fuel_efficiency_km_l: None,
        }
    }

    #[test]
    fn test_resolve_keeps_user_values() {
        let input = TcoAssumptionsInput {
            term_months: Some(48),
            fuel_price: Some(6.10),
            ..Default::default()
        };
        let resolved = input.resolve(&defaults());
        assert_eq!(resolved.term_months, 48);
        assert_eq!(resolved.fuel_price, 6.10);
        assert_eq!(resolved.down_payment_pct, 20.0);
        assert_eq!(resolved.fuel_efficiency_km_l, None);
    }

    #[test]
    fn test_assumption_ranges() {
        assert!(defaults().validate().is_ok());

        let mut too_far = defaults();
        too_far.monthly_km = 6000.0;
        assert!(too_far.validate().is_err());

        let mut cheap_fuel = defaults();
        cheap_fuel.fuel_price = 2.5;
        assert!(cheap_fuel.validate().is_err());
    }
}
