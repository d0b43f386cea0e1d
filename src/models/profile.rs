//! Modelo del perfil del comprador
//!
//! El perfil llega del cuestionario ya completo y no se modifica después
//! de enviado. Toda la validación ocurre aquí, antes de tocar el inventario.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::car::{CarAttribute, Transmission};

lazy_static! {
    /// Sigla de estado brasileño (UF)
    pub static ref UF_REGEX: Regex = Regex::new(r"^[A-Za-z]{2}$").unwrap();
}

/// Nivel que marca una prioridad como seleccionada en el cuestionario
pub const SELECTED_PRIORITY_LEVEL: u8 = 5;

/// Nivel por defecto de las prioridades no tocadas
pub const DEFAULT_PRIORITY_LEVEL: u8 = 3;

/// Máximo de prioridades seleccionadas
pub const MAX_SELECTED_PRIORITIES: usize = 3;

/// Uso principal del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UsageCategory {
    Familia,
    Trabalho,
    Lazer,
    Comercial,
    TransporteApp,
    PrimeiroCarro,
}

impl UsageCategory {
    pub fn label(&self) -> &'static str {
        match self {
            UsageCategory::Familia => "uso familiar",
            UsageCategory::Trabalho => "uso no trabalho",
            UsageCategory::Lazer => "lazer",
            UsageCategory::Comercial => "uso comercial",
            UsageCategory::TransporteApp => "transporte por aplicativo",
            UsageCategory::PrimeiroCarro => "primeiro carro",
        }
    }
}

/// Franja de renta mensual declarada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IncomeBracket {
    #[serde(rename = "ate_3000")]
    Ate3000,
    #[serde(rename = "3000_5000")]
    De3000A5000,
    #[serde(rename = "5000_8000")]
    De5000A8000,
    #[serde(rename = "8000_12000")]
    De8000A12000,
    #[serde(rename = "acima_12000")]
    Acima12000,
}

impl IncomeBracket {
    /// Renta representativa de la franja (R$/mes)
    pub fn representative_income(&self) -> f64 {
        match self {
            IncomeBracket::Ate3000 => 2_500.0,
            IncomeBracket::De3000A5000 => 4_000.0,
            IncomeBracket::De5000A8000 => 6_500.0,
            IncomeBracket::De8000A12000 => 10_000.0,
            IncomeBracket::Acima12000 => 15_000.0,
        }
    }
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY_LEVEL
}

/// Niveles de prioridad 1-5 de cada atributo
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Priorities {
    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5))]
    pub economia: u8,

    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5))]
    pub espaco: u8,

    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5))]
    pub performance: u8,

    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5))]
    pub conforto: u8,

    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5))]
    pub seguranca: u8,
}

impl Default for Priorities {
    fn default() -> Self {
        Self {
            economia: DEFAULT_PRIORITY_LEVEL,
            espaco: DEFAULT_PRIORITY_LEVEL,
            performance: DEFAULT_PRIORITY_LEVEL,
            conforto: DEFAULT_PRIORITY_LEVEL,
            seguranca: DEFAULT_PRIORITY_LEVEL,
        }
    }
}

impl Priorities {
    pub fn level(&self, attribute: CarAttribute) -> u8 {
        match attribute {
            CarAttribute::Economia => self.economia,
            CarAttribute::Espaco => self.espaco,
            CarAttribute::Performance => self.performance,
            CarAttribute::Conforto => self.conforto,
            CarAttribute::Seguranca => self.seguranca,
        }
    }

    /// Atributos marcados como prioridad principal
    pub fn selected(&self) -> Vec<CarAttribute> {
        CarAttribute::ALL
            .into_iter()
            .filter(|attribute| self.level(*attribute) >= SELECTED_PRIORITY_LEVEL)
            .collect()
    }

    /// Pesos normalizados (suman 1). El peso de cada atributo es su nivel:
    /// seleccionado vale 5, sin tocar vale 3 y los niveles 1, 2 y 4 conservan su propio valor.
    pub fn normalized_weights(&self) -> Vec<(CarAttribute, f64)> {
        let total: f64 = CarAttribute::ALL
            .iter()
            .map(|attribute| f64::from(self.level(*attribute)))
            .sum();

        CarAttribute::ALL
            .into_iter()
            .map(|attribute| (attribute, f64::from(self.level(attribute)) / total))
            .collect()
    }
}

/// Perfil completo del comprador
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[validate(schema(function = "validate_profile_consistency", skip_on_field_errors = false))]
pub struct UserProfile {
    #[validate(range(min = 0.0, max = 10_000_000.0))]
    pub orcamento_min: f64,

    #[validate(range(min = 1.0, max = 10_000_000.0))]
    pub orcamento_max: f64,

    #[validate(length(min = 2, max = 100))]
    pub city: String,

    #[validate(regex(path = "UF_REGEX", message = "Estado deve ser a sigla de 2 letras"))]
    pub state: String,

    pub uso_principal: UsageCategory,

    #[validate(range(min = 1, max = 15))]
    pub tamanho_familia: u8,

    #[serde(default)]
    pub tem_criancas: bool,

    #[serde(default)]
    pub tem_idosos: bool,

    #[serde(default)]
    #[validate]
    pub prioridades: Priorities,

    #[serde(default)]
    pub marcas_preferidas: Vec<String>,

    #[serde(default)]
    pub modelos_preferidos: Vec<String>,

    pub cambio_preferido: Option<Transmission>,

    pub renda_mensal: Option<IncomeBracket>,
}

/// Reglas que cruzan varios campos del perfil
fn validate_profile_consistency(profile: &UserProfile) -> Result<(), ValidationError> {
    if profile.orcamento_max <= profile.orcamento_min {
        let mut error = ValidationError::new("orcamento_range");
        error.message = Some("orcamento_max deve ser maior que orcamento_min".into());
        error.add_param("orcamento_min".into(), &profile.orcamento_min);
        error.add_param("orcamento_max".into(), &profile.orcamento_max);
        return Err(error);
    }

    let selected = profile.prioridades.selected().len();
    if selected > MAX_SELECTED_PRIORITIES {
        let mut error = ValidationError::new("too_many_priorities");
        error.message = Some("No máximo 3 prioridades podem ser selecionadas".into());
        error.add_param("selected".into(), &selected);
        error.add_param("max".into(), &MAX_SELECTED_PRIORITIES);
        return Err(error);
    }

    Ok(())
}

impl UserProfile {
    pub fn within_budget(&self, price: f64) -> bool {
        price >= self.orcamento_min && price <= self.orcamento_max
    }

    pub fn prefers_brand(&self, marca: &str) -> bool {
        self.marcas_preferidas
            .iter()
            .any(|preferred| preferred.trim().eq_ignore_ascii_case(marca.trim()))
    }

    pub fn prefers_model(&self, modelo: &str) -> bool {
        self.modelos_preferidos
            .iter()
            .any(|preferred| preferred.trim().eq_ignore_ascii_case(modelo.trim()))
    }

    pub fn location(&self) -> String {
        format!("{}/{}", self.city.trim(), self.state.trim().to_uppercase())
    }
}
