//! Modelo de Car
//!
//! Este módulo contiene el struct Car del inventario de concesionarias,
//! sus enums de catálogo y las notas por atributo usadas en el matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Categoría de carrocería - mapea a la columna cars.categoria
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CarCategory {
    Hatch,
    Sedan,
    Suv,
    Pickup,
    Minivan,
    Perua,
    Coupe,
    Conversivel,
    Utilitario,
}

impl CarCategory {
    pub const ALL: [CarCategory; 9] = [
        CarCategory::Hatch,
        CarCategory::Sedan,
        CarCategory::Suv,
        CarCategory::Pickup,
        CarCategory::Minivan,
        CarCategory::Perua,
        CarCategory::Coupe,
        CarCategory::Conversivel,
        CarCategory::Utilitario,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarCategory::Hatch => "hatch",
            CarCategory::Sedan => "sedan",
            CarCategory::Suv => "suv",
            CarCategory::Pickup => "pickup",
            CarCategory::Minivan => "minivan",
            CarCategory::Perua => "perua",
            CarCategory::Coupe => "coupe",
            CarCategory::Conversivel => "conversivel",
            CarCategory::Utilitario => "utilitario",
        }
    }

    /// Nombre para mostrar en las justificaciones
    pub fn label(&self) -> &'static str {
        match self {
            CarCategory::Hatch => "Hatch",
            CarCategory::Sedan => "Sedã",
            CarCategory::Suv => "SUV",
            CarCategory::Pickup => "Picape",
            CarCategory::Minivan => "Minivan",
            CarCategory::Perua => "Perua",
            CarCategory::Coupe => "Cupê",
            CarCategory::Conversivel => "Conversível",
            CarCategory::Utilitario => "Utilitário",
        }
    }

    /// Lugares típicos cuando el inventario no informa la capacidad
    pub fn default_seats(&self) -> u8 {
        match self {
            CarCategory::Coupe | CarCategory::Conversivel | CarCategory::Utilitario => 2,
            CarCategory::Minivan => 7,
            _ => 5,
        }
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarCategory::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Categoria desconhecida: {}", s))
    }
}

/// Tipo de combustible
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Flex,
    Gasolina,
    Etanol,
    Diesel,
    Hibrido,
    Eletrico,
}

impl FuelType {
    pub const ALL: [FuelType; 6] = [
        FuelType::Flex,
        FuelType::Gasolina,
        FuelType::Etanol,
        FuelType::Diesel,
        FuelType::Hibrido,
        FuelType::Eletrico,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Flex => "flex",
            FuelType::Gasolina => "gasolina",
            FuelType::Etanol => "etanol",
            FuelType::Diesel => "diesel",
            FuelType::Hibrido => "hibrido",
            FuelType::Eletrico => "eletrico",
        }
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL
            .iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Combustível desconhecido: {}", s))
    }
}

/// Tipo de cambio (transmisión)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    Automatico,
    Automatizado,
    Cvt,
}

impl Transmission {
    pub const ALL: [Transmission; 4] = [
        Transmission::Manual,
        Transmission::Automatico,
        Transmission::Automatizado,
        Transmission::Cvt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Manual => "manual",
            Transmission::Automatico => "automatico",
            Transmission::Automatizado => "automatizado",
            Transmission::Cvt => "cvt",
        }
    }

    /// CVT y automatizado cuentan como automático para las preferencias
    pub fn is_automatic(&self) -> bool {
        !matches!(self, Transmission::Manual)
    }
}

impl FromStr for Transmission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transmission::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Câmbio desconhecido: {}", s))
    }
}

/// Atributos evaluados en el matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CarAttribute {
    Economia,
    Espaco,
    Performance,
    Conforto,
    Seguranca,
}

impl CarAttribute {
    /// Orden fijo, también usado para desempatar contribuciones iguales
    pub const ALL: [CarAttribute; 5] = [
        CarAttribute::Economia,
        CarAttribute::Espaco,
        CarAttribute::Performance,
        CarAttribute::Conforto,
        CarAttribute::Seguranca,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarAttribute::Economia => "economia",
            CarAttribute::Espaco => "espaco",
            CarAttribute::Performance => "performance",
            CarAttribute::Conforto => "conforto",
            CarAttribute::Seguranca => "seguranca",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CarAttribute::Economia => "economia",
            CarAttribute::Espaco => "espaço",
            CarAttribute::Performance => "desempenho",
            CarAttribute::Conforto => "conforto",
            CarAttribute::Seguranca => "segurança",
        }
    }
}

/// Notas 0-100 por atributo. Un carro sin alguna nota no entra en el ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CarScores {
    pub economia: Option<f64>,
    pub espaco: Option<f64>,
    pub performance: Option<f64>,
    pub conforto: Option<f64>,
    pub seguranca: Option<f64>,
}

impl CarScores {
    pub fn get(&self, attribute: CarAttribute) -> Option<f64> {
        match attribute {
            CarAttribute::Economia => self.economia,
            CarAttribute::Espaco => self.espaco,
            CarAttribute::Performance => self.performance,
            CarAttribute::Conforto => self.conforto,
            CarAttribute::Seguranca => self.seguranca,
        }
    }

    pub fn missing(&self) -> Vec<CarAttribute> {
        CarAttribute::ALL
            .into_iter()
            .filter(|attribute| self.get(*attribute).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Referencia a la concesionaria que anuncia el carro
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dealership {
    pub id: Uuid,
    pub nome: String,
    pub cidade: String,
    pub estado: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
}

/// Car principal - mapea a la tabla cars unida con dealerships
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Car {
    pub id: Uuid,
    pub marca: String,
    pub modelo: String,
    pub versao: Option<String>,
    pub ano: i32,
    pub preco: f64,
    pub categoria: CarCategory,
    pub combustivel: FuelType,
    pub cambio: Transmission,
    pub quilometragem: i32,
    pub cor: Option<String>,
    pub lugares: Option<u8>,
    pub consumo_km_l: Option<f64>,
    #[serde(default)]
    pub imagens: Vec<String>,
    pub concessionaria: Dealership,
    #[serde(default)]
    pub scores: CarScores,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Car {
    /// Capacidad efectiva: la informada o la típica de la categoría
    pub fn seats(&self) -> u8 {
        self.lugares.unwrap_or_else(|| self.categoria.default_seats())
    }

    pub fn display_name(&self) -> String {
        match &self.versao {
            Some(versao) => format!("{} {} {} {}", self.marca, self.modelo, versao, self.ano),
            None => format!("{} {} {}", self.marca, self.modelo, self.ano),
        }
    }
}
