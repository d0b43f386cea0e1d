use async_trait::async_trait;
use chrono::{DateTime, Utc};
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::CarRepository;
use crate::dto::car_dto::{CarFilters, UpdateCarRequest};
use crate::models::{Car, CarScores, Dealership};
use crate::utils::errors::{not_found_error, AppError, AppResult};

const SELECT_CARS: &str = r#"
    SELECT c.id, c.marca, c.modelo, c.versao, c.ano, c.preco, c.categoria, c.combustivel,
           c.cambio, c.quilometragem, c.cor, c.lugares, c.consumo_km_l, c.imagens,
           c.score_economia, c.score_espaco, c.score_performance, c.score_conforto,
           c.score_seguranca, c.created_at,
           d.id AS dealership_id, d.nome AS dealership_nome, d.cidade AS dealership_cidade,
           d.estado AS dealership_estado, d.telefone AS dealership_telefone,
           d.email AS dealership_email
    FROM cars c
    JOIN dealerships d ON d.id = c.dealership_id
"#;

// Fila de cars unida con su concesionaria
#[derive(Debug, sqlx::FromRow)]
struct CarRow {
    id: Uuid,
    marca: String,
    modelo: String,
    versao: Option<String>,
    ano: i32,
    preco: Decimal,
    categoria: String,
    combustivel: String,
    cambio: String,
    quilometragem: i32,
    cor: Option<String>,
    lugares: Option<i16>,
    consumo_km_l: Option<f64>,
    imagens: Vec<String>,
    score_economia: Option<f64>,
    score_espaco: Option<f64>,
    score_performance: Option<f64>,
    score_conforto: Option<f64>,
    score_seguranca: Option<f64>,
    created_at: DateTime<Utc>,
    dealership_id: Uuid,
    dealership_nome: String,
    dealership_cidade: String,
    dealership_estado: String,
    dealership_telefone: Option<String>,
    dealership_email: Option<String>,
}

impl TryFrom<CarRow> for Car {
    type Error = String;

    fn try_from(row: CarRow) -> Result<Self, Self::Error> {
        Ok(Car {
            id: row.id,
            marca: row.marca,
            modelo: row.modelo,
            versao: row.versao,
            ano: row.ano,
            preco: row
                .preco
                .to_f64()
                .ok_or_else(|| format!("Preço inválido: {}", row.preco))?,
            categoria: row.categoria.parse()?,
            combustivel: row.combustivel.parse()?,
            cambio: row.cambio.parse()?,
            quilometragem: row.quilometragem,
            cor: row.cor,
            lugares: row.lugares.and_then(|l| u8::try_from(l).ok()),
            consumo_km_l: row.consumo_km_l,
            imagens: row.imagens,
            concessionaria: Dealership {
                id: row.dealership_id,
                nome: row.dealership_nome,
                cidade: row.dealership_cidade,
                estado: row.dealership_estado.trim().to_string(),
                telefone: row.dealership_telefone,
                email: row.dealership_email,
            },
            scores: CarScores {
                economia: row.score_economia,
                espaco: row.score_espaco,
                performance: row.score_performance,
                conforto: row.score_conforto,
                seguranca: row.score_seguranca,
            },
            created_at: row.created_at,
        })
    }
}

fn to_decimal(value: f64) -> AppResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid price value: {}", value)))
}

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_car(row: CarRow) -> Option<Car> {
        let id = row.id;
        match Car::try_from(row) {
            Ok(car) => Some(car),
            Err(e) => {
                log::warn!("⚠️ Carro {} con datos inválidos ignorado: {}", id, e);
                None
            }
        }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_CARS);
        query.push(" WHERE 1 = 1");

        if let Some(marca) = &filters.marca {
            query
                .push(" AND LOWER(c.marca) = LOWER(")
                .push_bind(marca.trim().to_string())
                .push(")");
        }
        if let Some(modelo) = &filters.modelo {
            query
                .push(" AND LOWER(c.modelo) = LOWER(")
                .push_bind(modelo.trim().to_string())
                .push(")");
        }
        if let Some(categoria) = filters.categoria {
            query.push(" AND c.categoria = ").push_bind(categoria.as_str());
        }
        if let Some(ano_min) = filters.ano_min {
            query.push(" AND c.ano >= ").push_bind(ano_min);
        }
        if let Some(ano_max) = filters.ano_max {
            query.push(" AND c.ano <= ").push_bind(ano_max);
        }
        if let Some(preco_min) = filters.preco_min {
            query.push(" AND c.preco >= ").push_bind(to_decimal(preco_min)?);
        }
        if let Some(preco_max) = filters.preco_max {
            query.push(" AND c.preco <= ").push_bind(to_decimal(preco_max)?);
        }
        if let Some(estado) = &filters.estado {
            query
                .push(" AND d.estado = ")
                .push_bind(estado.trim().to_uppercase());
        }
        if let Some(cidade) = &filters.cidade {
            query
                .push(" AND LOWER(d.cidade) = LOWER(")
                .push_bind(cidade.trim().to_string())
                .push(")");
        }

        query.push(" ORDER BY c.id");
        if let Some(limit) = filters.limit {
            query.push(" LIMIT ").push_bind(limit.max(0));
        }
        if let Some(offset) = filters.offset {
            query.push(" OFFSET ").push_bind(offset.max(0));
        }

        let rows = query
            .build_query_as::<CarRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().filter_map(Self::row_to_car).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let row = sqlx::query_as::<_, CarRow>(&format!("{} WHERE c.id = $1", SELECT_CARS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(Self::row_to_car))
    }

    async fn create(&self, car: Car) -> AppResult<Car> {
        let preco = to_decimal(car.preco)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO dealerships (id, nome, cidade, estado, telefone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET nome = EXCLUDED.nome, cidade = EXCLUDED.cidade, estado = EXCLUDED.estado,
                telefone = EXCLUDED.telefone, email = EXCLUDED.email
            "#,
        )
        .bind(car.concessionaria.id)
        .bind(&car.concessionaria.nome)
        .bind(&car.concessionaria.cidade)
        .bind(&car.concessionaria.estado)
        .bind(&car.concessionaria.telefone)
        .bind(&car.concessionaria.email)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO cars (id, dealership_id, marca, modelo, versao, ano, preco, categoria,
                              combustivel, cambio, quilometragem, cor, lugares, consumo_km_l,
                              imagens, score_economia, score_espaco, score_performance,
                              score_conforto, score_seguranca, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(car.id)
        .bind(car.concessionaria.id)
        .bind(&car.marca)
        .bind(&car.modelo)
        .bind(&car.versao)
        .bind(car.ano)
        .bind(preco)
        .bind(car.categoria.as_str())
        .bind(car.combustivel.as_str())
        .bind(car.cambio.as_str())
        .bind(car.quilometragem)
        .bind(&car.cor)
        .bind(car.lugares.map(i16::from))
        .bind(car.consumo_km_l)
        .bind(&car.imagens)
        .bind(car.scores.economia)
        .bind(car.scores.espaco)
        .bind(car.scores.performance)
        .bind(car.scores.conforto)
        .bind(car.scores.seguranca)
        .bind(car.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        log::info!("🚗 Carro {} agregado al inventario", car.id);
        Ok(car)
    }

    async fn update(&self, id: Uuid, update: &UpdateCarRequest) -> AppResult<Car> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;
        let car = update.apply(&current);

        sqlx::query(
            r#"
            UPDATE cars
            SET versao = $2, preco = $3, quilometragem = $4, cor = $5, lugares = $6,
                consumo_km_l = $7, imagens = $8, score_economia = $9, score_espaco = $10,
                score_performance = $11, score_conforto = $12, score_seguranca = $13
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&car.versao)
        .bind(to_decimal(car.preco)?)
        .bind(car.quilometragem)
        .bind(&car.cor)
        .bind(car.lugares.map(i16::from))
        .bind(car.consumo_km_l)
        .bind(&car.imagens)
        .bind(car.scores.economia)
        .bind(car.scores.espaco)
        .bind(car.scores.performance)
        .bind(car.scores.conforto)
        .bind(car.scores.seguranca)
        .execute(&self.pool)
        .await?;

        Ok(car)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", &id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CarCategory, FuelType, Transmission};

    fn row() -> CarRow {
        CarRow {
            id: Uuid::from_u128(1),
            marca: "Honda".to_string(),
            modelo: "HR-V".to_string(),
            versao: Some("EXL".to_string()),
            ano: 2022,
            preco: Decimal::new(12_990_000, 2),
            categoria: "suv".to_string(),
            combustivel: "flex".to_string(),
            cambio: "cvt".to_string(),
            quilometragem: 30_000,
            cor: Some("Prata".to_string()),
            lugares: Some(5),
            consumo_km_l: Some(11.4),
            imagens: vec![],
            score_economia: Some(72.0),
            score_espaco: Some(80.0),
            score_performance: Some(68.0),
            score_conforto: Some(84.0),
            score_seguranca: None,
            created_at: Utc::now(),
            dealership_id: Uuid::from_u128(100),
            dealership_nome: "Honda Sul".to_string(),
            dealership_cidade: "Porto Alegre".to_string(),
            dealership_estado: "RS".to_string(),
            dealership_telefone: None,
            dealership_email: None,
        }
    }

    #[test]
    fn test_row_conversion() {
        let car = Car::try_from(row()).unwrap();
        assert_eq!(car.preco, 129_900.0);
        assert_eq!(car.categoria, CarCategory::Suv);
        assert_eq!(car.combustivel, FuelType::Flex);
        assert_eq!(car.cambio, Transmission::Cvt);
        assert_eq!(car.concessionaria.estado, "RS");
        assert!(!car.scores.is_complete());
    }

    #[test]
    fn test_row_with_unknown_category_is_dropped() {
        let mut bad = row();
        bad.categoria = "trator".to_string();
        assert!(PgCarRepository::row_to_car(bad).is_none());
    }

    #[test]
    fn test_to_decimal_rounds_cents() {
        assert_eq!(to_decimal(84_990.456).unwrap(), Decimal::new(8_499_046, 2));
    }
}
