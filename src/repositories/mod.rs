//! Repositorios del inventario
//!
//! El inventario se lee a través del trait CarRepository: PostgreSQL en
//! producción, memoria para el seed JSON y los tests.

pub mod car_repository;
pub mod memory_car_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::car_dto::{CarFilters, UpdateCarRequest};
use crate::models::Car;
use crate::utils::errors::AppResult;

pub use car_repository::PgCarRepository;
pub use memory_car_repository::InMemoryCarRepository;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Nombre del backend, para health check y logs
    fn backend(&self) -> &'static str;

    async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>>;

    async fn create(&self, car: Car) -> AppResult<Car>;

    async fn update(&self, id: Uuid, update: &UpdateCarRequest) -> AppResult<Car>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}
