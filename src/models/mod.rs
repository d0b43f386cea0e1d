//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del inventario, del perfil
//! del comprador y de las recomendaciones derivadas.

pub mod car;
pub mod profile;
pub mod recommendation;
pub mod tco;

pub use car::*;
pub use profile::*;
pub use recommendation::*;
pub use tco::*;
