//! Services module
//!
//! Este módulo contiene la lógica de negocio: puntaje de cada carro contra
//! el perfil, costo total de propiedad y ranking del inventario.

pub mod ranking_service;
pub mod scoring_service;
pub mod tco_service;

pub use ranking_service::*;
pub use tco_service::{TcoCalculator, TcoRates};
