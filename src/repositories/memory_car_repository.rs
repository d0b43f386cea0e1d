use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CarRepository;
use crate::dto::car_dto::{CarFilters, UpdateCarRequest};
use crate::models::Car;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Inventario en memoria, ordenado por id
pub struct InMemoryCarRepository {
    cars: RwLock<BTreeMap<Uuid, Car>>,
}

impl InMemoryCarRepository {
    pub fn new(cars: Vec<Car>) -> Self {
        Self {
            cars: RwLock::new(cars.into_iter().map(|car| (car.id, car)).collect()),
        }
    }

    /// Cargar el inventario desde un archivo JSON (array de Car)
    pub async fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let cars: Vec<Car> = serde_json::from_str(&content)?;
        log::info!("📂 {} carros cargados desde {}", cars.len(), path.display());
        Ok(Self::new(cars))
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>> {
        let cars = self.cars.read().await;
        let offset = filters.offset.unwrap_or(0).max(0) as usize;
        let limit = filters.limit.map_or(usize::MAX, |l| l.max(0) as usize);

        Ok(cars
            .values()
            .filter(|car| filters.matches(car))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.cars.read().await.get(&id).cloned())
    }

    async fn create(&self, car: Car) -> AppResult<Car> {
        let mut cars = self.cars.write().await;
        if cars.contains_key(&car.id) {
            return Err(AppError::Conflict(format!("Car '{}' already exists", car.id)));
        }
        cars.insert(car.id, car.clone());
        Ok(car)
    }

    async fn update(&self, id: Uuid, update: &UpdateCarRequest) -> AppResult<Car> {
        let mut cars = self.cars.write().await;
        let current = cars
            .get(&id)
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;
        let updated = update.apply(current);
        cars.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.cars
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }
}
