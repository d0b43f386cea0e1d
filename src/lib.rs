//! Car Matcher
//!
//! Recomendación de carros: un perfil de comprador se evalúa contra el
//! inventario de las concesionarias y se devuelve un ranking con porcentaje
//! de match, justificación y costo total de propiedad.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
