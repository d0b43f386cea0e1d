//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y formato de valores en reales.

pub mod currency;
pub mod errors;
pub mod validation;
