use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::profile::UF_REGEX;
use crate::models::{Car, CarCategory, CarScores, Dealership, FuelType, Transmission};
use crate::utils::validation::{validate_image_urls, validate_not_blank, validate_phone};

// Concesionaria enviada junto al carro; sin id se crea una nueva
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DealershipInput {
    pub id: Option<Uuid>,

    #[validate(length(min = 2, max = 120), custom = "validate_not_blank")]
    pub nome: String,

    #[validate(length(min = 2, max = 100))]
    pub cidade: String,

    #[validate(regex(path = "UF_REGEX"))]
    pub estado: String,

    #[validate(custom = "validate_phone")]
    pub telefone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

// Notas por atributo, todas opcionales
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CarScoresInput {
    #[validate(range(min = 0.0, max = 100.0))]
    pub economia: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub espaco: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub performance: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub conforto: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub seguranca: Option<f64>,
}

impl CarScoresInput {
    /// Aplicar sobre notas existentes; lo que no viene se conserva
    pub fn merge_into(&self, scores: &mut CarScores) {
        if self.economia.is_some() {
            scores.economia = self.economia;
        }
        if self.espaco.is_some() {
            scores.espaco = self.espaco;
        }
        if self.performance.is_some() {
            scores.performance = self.performance;
        }
        if self.conforto.is_some() {
            scores.conforto = self.conforto;
        }
        if self.seguranca.is_some() {
            scores.seguranca = self.seguranca;
        }
    }
}

// Request para agregar un carro al inventario
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 60), custom = "validate_not_blank")]
    pub marca: String,

    #[validate(length(min = 1, max = 80), custom = "validate_not_blank")]
    pub modelo: String,

    #[validate(length(max = 120))]
    pub versao: Option<String>,

    #[validate(range(min = 1950, max = 2030))]
    pub ano: i32,

    #[validate(range(min = 1000.0, max = 10_000_000.0))]
    pub preco: f64,

    pub categoria: CarCategory,
    pub combustivel: FuelType,
    pub cambio: Transmission,

    #[validate(range(min = 0, max = 2_000_000))]
    #[serde(default)]
    pub quilometragem: i32,

    pub cor: Option<String>,

    #[validate(range(min = 1, max = 15))]
    pub lugares: Option<u8>,

    #[validate(range(min = 1.0, max = 50.0))]
    pub consumo_km_l: Option<f64>,

    #[serde(default)]
    #[validate(custom = "validate_image_urls")]
    pub imagens: Vec<String>,

    #[validate]
    pub concessionaria: DealershipInput,

    #[serde(default)]
    #[validate]
    pub scores: CarScoresInput,
}

impl CreateCarRequest {
    pub fn into_car(self) -> Car {
        let mut scores = CarScores::default();
        self.scores.merge_into(&mut scores);

        Car {
            id: Uuid::new_v4(),
            marca: self.marca.trim().to_string(),
            modelo: self.modelo.trim().to_string(),
            versao: self.versao,
            ano: self.ano,
            preco: self.preco,
            categoria: self.categoria,
            combustivel: self.combustivel,
            cambio: self.cambio,
            quilometragem: self.quilometragem,
            cor: self.cor,
            lugares: self.lugares,
            consumo_km_l: self.consumo_km_l,
            imagens: self.imagens,
            concessionaria: Dealership {
                id: self.concessionaria.id.unwrap_or_else(Uuid::new_v4),
                nome: self.concessionaria.nome,
                cidade: self.concessionaria.cidade,
                estado: self.concessionaria.estado.to_uppercase(),
                telefone: self.concessionaria.telefone,
                email: self.concessionaria.email,
            },
            scores,
            created_at: Utc::now(),
        }
    }
}

// Request para actualizar un carro existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(max = 120))]
    pub versao: Option<String>,

    #[validate(range(min = 1000.0, max = 10_000_000.0))]
    pub preco: Option<f64>,

    #[validate(range(min = 0, max = 2_000_000))]
    pub quilometragem: Option<i32>,

    pub cor: Option<String>,

    #[validate(range(min = 1, max = 15))]
    pub lugares: Option<u8>,

    #[validate(range(min = 1.0, max = 50.0))]
    pub consumo_km_l: Option<f64>,

    #[validate(custom = "validate_image_urls")]
    pub imagens: Option<Vec<String>>,

    #[serde(default)]
    #[validate]
    pub scores: CarScoresInput,
}

impl UpdateCarRequest {
    /// Devolver el carro con los cambios aplicados
    pub fn apply(&self, current: &Car) -> Car {
        let mut car = current.clone();
        if let Some(versao) = &self.versao {
            car.versao = Some(versao.clone());
        }
        if let Some(preco) = self.preco {
            car.preco = preco;
        }
        if let Some(quilometragem) = self.quilometragem {
            car.quilometragem = quilometragem;
        }
        if let Some(cor) = &self.cor {
            car.cor = Some(cor.clone());
        }
        if self.lugares.is_some() {
            car.lugares = self.lugares;
        }
        if self.consumo_km_l.is_some() {
            car.consumo_km_l = self.consumo_km_l;
        }
        if let Some(imagens) = &self.imagens {
            car.imagens = imagens.clone();
        }
        self.scores.merge_into(&mut car.scores);
        car
    }
}

// Filtros para búsqueda de carros
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarFilters {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub categoria: Option<CarCategory>,
    pub ano_min: Option<i32>,
    pub ano_max: Option<i32>,
    pub preco_min: Option<f64>,
    pub preco_max: Option<f64>,
    pub estado: Option<String>,
    pub cidade: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CarFilters {
    /// Misma semántica que el WHERE del repositorio PostgreSQL
    pub fn matches(&self, car: &Car) -> bool {
        let text_eq = |filter: &Option<String>, value: &str| {
            filter
                .as_ref()
                .map_or(true, |f| f.trim().eq_ignore_ascii_case(value.trim()))
        };

        text_eq(&self.marca, &car.marca)
            && text_eq(&self.modelo, &car.modelo)
            && text_eq(&self.estado, &car.concessionaria.estado)
            && text_eq(&self.cidade, &car.concessionaria.cidade)
            && self.categoria.map_or(true, |c| c == car.categoria)
            && self.ano_min.map_or(true, |ano| car.ano >= ano)
            && self.ano_max.map_or(true, |ano| car.ano <= ano)
            && self.preco_min.map_or(true, |preco| car.preco >= preco)
            && self.preco_max.map_or(true, |preco| car.preco <= preco)
    }
}
