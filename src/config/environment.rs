//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto; un valor presente pero
//! mal formado es un error de configuración.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use validator::Validate;

use crate::models::TcoAssumptions;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub database_url: Option<String>,
    pub inventory_file: Option<String>,
    pub redis_url: Option<String>,
    pub recommendation_cache_ttl: u64,
    pub recommendation_limit: usize,
    pub fallback_fuel_efficiency: f64,
    pub tco_defaults: TcoAssumptions,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: tracing::Level::DEBUG,
            cors_origins: Vec::new(),
            rate_limit_requests: 120,
            rate_limit_window: 60,
            database_url: None,
            inventory_file: None,
            redis_url: None,
            recommendation_cache_ttl: 300,
            recommendation_limit: 10,
            fallback_fuel_efficiency: 11.0,
            tco_defaults: TcoAssumptions {
                down_payment_pct: 20.0,
                term_months: 60,
                annual_interest_rate: 12.0,
                monthly_km: 1000.0,
                fuel_price: 5.20,
                fuel_efficiency_km_l: None,
            },
        }
    }
}

/// Leer una variable opcional, ignorando valores vacíos
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Leer y parsear una variable, usando el valor por defecto si no existe
fn parsed_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match optional_var(key) {
        Some(value) => value
            .parse()
            .map_err(|_| anyhow!("{} must be a valid value, got '{}'", key, value)),
        None => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde el entorno sobre los valores por defecto
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let tco = &defaults.tco_defaults;

        let tco_defaults = TcoAssumptions {
            down_payment_pct: parsed_var("TCO_DOWN_PAYMENT_PCT", tco.down_payment_pct)?,
            term_months: parsed_var("TCO_TERM_MONTHS", tco.term_months)?,
            annual_interest_rate: parsed_var("TCO_INTEREST_RATE", tco.annual_interest_rate)?,
            monthly_km: parsed_var("TCO_MONTHLY_KM", tco.monthly_km)?,
            fuel_price: parsed_var("TCO_FUEL_PRICE", tco.fuel_price)?,
            fuel_efficiency_km_l: None,
        };

        let config = Self {
            environment: optional_var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parsed_var("PORT", defaults.port)?,
            host: optional_var("HOST").unwrap_or(defaults.host),
            log_level: parsed_var("LOG_LEVEL", defaults.log_level)?,
            cors_origins: optional_var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_requests: parsed_var("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            rate_limit_window: parsed_var("RATE_LIMIT_WINDOW", defaults.rate_limit_window)?,
            database_url: optional_var("DATABASE_URL"),
            inventory_file: optional_var("INVENTORY_FILE"),
            redis_url: optional_var("REDIS_URL"),
            recommendation_cache_ttl: parsed_var(
                "RECOMMENDATION_CACHE_TTL",
                defaults.recommendation_cache_ttl,
            )?,
            recommendation_limit: parsed_var(
                "RECOMMENDATION_LIMIT",
                defaults.recommendation_limit,
            )?,
            fallback_fuel_efficiency: parsed_var(
                "TCO_FUEL_EFFICIENCY",
                defaults.fallback_fuel_efficiency,
            )?,
            tco_defaults,
        };

        config.validate()?;
        Ok(config)
    }

    /// Las premisas por defecto deben cumplir los mismos rangos que las del usuario
    pub fn validate(&self) -> Result<()> {
        self.tco_defaults
            .validate()
            .map_err(|e| anyhow!("Invalid TCO defaults: {}", e))?;

        if self.fallback_fuel_efficiency.is_nan() || self.fallback_fuel_efficiency <= 0.0 {
            return Err(anyhow!(
                "TCO_FUEL_EFFICIENCY must be greater than zero, got {}",
                self.fallback_fuel_efficiency
            ));
        }

        Ok(())
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
