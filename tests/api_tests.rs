use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use car_matcher::cache::RecommendationCache;
use car_matcher::config::EnvironmentConfig;
use car_matcher::repositories::InMemoryCarRepository;
use car_matcher::routes::create_app_router;
use car_matcher::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

const ONIX_ID: &str = "0b7c4a52-1d3e-4f60-9a10-000000000002";

struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestResponse {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn json(&self) -> &Value {
        &self.body
    }
}

impl TestApp {
    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.request("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request("POST", uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request("PUT", uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> TestResponse {
        self.request("DELETE", uri, None).await
    }
}

async fn create_test_app() -> TestApp {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/inventory.json");
    let repository = InMemoryCarRepository::from_json_file(path).await.unwrap();
    let state = AppState::new(
        Arc::new(repository),
        EnvironmentConfig::default(),
        RecommendationCache::disabled(),
    );
    TestApp {
        router: create_app_router(state),
    }
}

fn family_profile() -> Value {
    json!({
        "orcamento_min": 50000,
        "orcamento_max": 120000,
        "city": "São Paulo",
        "state": "SP",
        "uso_principal": "familia",
        "tamanho_familia": 4,
        "tem_criancas": true,
        "tem_idosos": false,
        "prioridades": { "economia": 5, "espaco": 5, "seguranca": 5 },
        "renda_mensal": "8000_12000"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["inventory_backend"], "memory");
    assert_eq!(body["cache_enabled"], false);
    assert_eq!(body["cache_connected"], false);
}

#[tokio::test]
async fn test_recommendations_are_ranked_within_budget() {
    let app = create_test_app().await;
    let response = app.post("/api/recommendations", family_profile()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json();

    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    assert_eq!(body["total_recommendations"], recommendations.len());

    let mut previous = f64::MAX;
    for (index, recommendation) in recommendations.iter().enumerate() {
        assert_eq!(recommendation["ranking"], index + 1);

        let price = recommendation["car"]["preco"].as_f64().unwrap();
        assert!((50_000.0..=120_000.0).contains(&price));

        let percentage = recommendation["match_percentage"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&percentage));
        assert!(percentage <= previous);
        previous = percentage;

        assert!(!recommendation["justification"].as_str().unwrap().is_empty());
        assert!(recommendation["tco"]["total_monthly"].as_f64().unwrap() > 0.0);
    }

    // Kicks no tiene todas las notas
    assert_eq!(body["profile_summary"]["cars_skipped"], 1);
    assert_eq!(body["profile_summary"]["location"], "São Paulo/SP");
}

#[tokio::test]
async fn test_recommendations_are_deterministic() {
    let app = create_test_app().await;
    let first = app.post("/api/recommendations", family_profile()).await;
    let second = app.post("/api/recommendations", family_profile()).await;

    assert_eq!(first.json()["recommendations"], second.json()["recommendations"]);
}

#[tokio::test]
async fn test_inverted_budget_is_rejected() {
    let app = create_test_app().await;
    let mut profile = family_profile();
    profile["orcamento_min"] = json!(100000);
    profile["orcamento_max"] = json!(50000);

    let response = app.post("/api/recommendations", profile).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_result_has_suggestions() {
    let app = create_test_app().await;
    let mut profile = family_profile();
    profile["orcamento_min"] = json!(20000);
    profile["orcamento_max"] = json!(30000);

    let response = app.post("/api/recommendations", profile).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json();
    assert_eq!(body["total_recommendations"], 0);
    assert_eq!(body["profile_summary"]["cars_out_of_budget"], 12);
    assert!(!body["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_region_filter() {
    let app = create_test_app().await;
    let mut profile = family_profile();
    profile["state"] = json!("pr");
    profile["city"] = json!("Curitiba");
    profile["orcamento_max"] = json!(200000);

    let response = app
        .post("/api/recommendations?apenas_regiao=true&limit=20", profile)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json();
    assert_eq!(body["total_recommendations"], 3);
    assert_eq!(body["profile_summary"]["cars_outside_region"], 9);
    for recommendation in body["recommendations"].as_array().unwrap() {
        assert_eq!(recommendation["car"]["concessionaria"]["estado"], "PR");
    }
}

#[tokio::test]
async fn test_recommendation_limit() {
    let app = create_test_app().await;
    let mut profile = family_profile();
    profile["orcamento_max"] = json!(200000);

    let response = app.post("/api/recommendations?limit=2", profile).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["total_recommendations"], 2);
}

#[tokio::test]
async fn test_car_crud() {
    let app = create_test_app().await;

    let created = app
        .post(
            "/api/cars",
            json!({
                "marca": "Peugeot",
                "modelo": "208",
                "versao": "Active 1.0",
                "ano": 2023,
                "preco": 74990,
                "categoria": "hatch",
                "combustivel": "flex",
                "cambio": "manual",
                "quilometragem": 12000,
                "lugares": 5,
                "consumo_km_l": 14.2,
                "concessionaria": {
                    "nome": "Leão Curitiba",
                    "cidade": "Curitiba",
                    "estado": "pr",
                    "telefone": "(41) 3030-4040"
                },
                "scores": { "economia": 88, "espaco": 60, "performance": 55, "conforto": 68, "seguranca": 78 }
            }),
        )
        .await;

    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(created.json()["success"], true);
    assert_eq!(created.json()["data"]["concessionaria"]["estado"], "PR");
    let id = created.json()["data"]["id"].as_str().unwrap().to_string();

    let fetched = app.get(&format!("/api/cars/{}", id)).await;
    assert_eq!(fetched.status_code(), StatusCode::OK);
    assert_eq!(fetched.json()["modelo"], "208");

    let updated = app
        .put(&format!("/api/cars/{}", id), json!({ "preco": 71990 }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    assert_eq!(updated.json()["data"]["preco"], 71990.0);
    assert_eq!(updated.json()["data"]["marca"], "Peugeot");

    let listed = app.get("/api/cars?marca=peugeot").await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    assert_eq!(listed.json().as_array().unwrap().len(), 1);

    let deleted = app.delete(&format!("/api/cars/{}", id)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let missing = app.get(&format!("/api/cars/{}", id)).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_car_is_rejected() {
    let app = create_test_app().await;
    let response = app
        .post(
            "/api/cars",
            json!({
                "marca": "Fiat",
                "modelo": "Argo",
                "ano": 2023,
                "preco": 79990,
                "categoria": "hatch",
                "combustivel": "flex",
                "cambio": "manual",
                "concessionaria": { "nome": "Fiat Centro", "cidade": "Recife", "estado": "Pernambuco" },
                "scores": { "economia": 150 }
            }),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters() {
    let app = create_test_app().await;

    let response = app.get("/api/cars?categoria=suv&estado=SP").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let cars = response.json().as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["modelo"], "Compass");

    let page = app.get("/api/cars?limit=5&offset=10").await;
    assert_eq!(page.json().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tco_endpoint() {
    let app = create_test_app().await;
    let response = app
        .post(
            &format!("/api/cars/{}/tco", ONIX_ID),
            json!({
                "assumptions": {
                    "down_payment_pct": 20,
                    "term_months": 60,
                    "annual_interest_rate": 12,
                    "monthly_km": 1000,
                    "fuel_price": 5.20,
                    "fuel_efficiency_km_l": 12
                },
                "renda_mensal": "5000_8000"
            }),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json();
    assert!((body["financing"].as_f64().unwrap() - 1512.44).abs() < 0.01);
    assert!((body["fuel"].as_f64().unwrap() - 433.33).abs() < 0.01);
    assert!((body["monthly_budget_cap"].as_f64().unwrap() - 1950.0).abs() < 0.01);

    let sum = ["financing", "fuel", "maintenance", "insurance", "tax"]
        .iter()
        .map(|key| body[*key].as_f64().unwrap())
        .sum::<f64>();
    assert!((body["total_monthly"].as_f64().unwrap() - sum).abs() < 0.011);
}

#[tokio::test]
async fn test_tco_rejects_out_of_range_assumptions() {
    let app = create_test_app().await;
    let response = app
        .post(
            &format!("/api/cars/{}/tco", ONIX_ID),
            json!({ "assumptions": { "monthly_km": 100 } }),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tco_unknown_car() {
    let app = create_test_app().await;
    let response = app
        .post(
            "/api/cars/00000000-0000-0000-0000-000000000000/tco",
            json!({}),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_priorities_get_json_error_body() {
    let app = create_test_app().await;

    for level in [json!(-1), json!(300), json!("alta")] {
        let mut profile = family_profile();
        profile["prioridades"]["economia"] = level;

        let response = app.post("/api/recommendations", profile).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["code"], "BAD_REQUEST");
        assert!(!response.json()["message"].as_str().unwrap().is_empty());
    }

    let mut profile = family_profile();
    profile["prioridades"]["economia"] = json!(6);
    let response = app.post("/api/recommendations", profile).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_query_and_path_get_json_error_body() {
    let app = create_test_app().await;

    let response = app
        .post("/api/recommendations?limit=muitos", family_profile())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "BAD_REQUEST");

    let response = app.get("/api/cars/nao-e-um-uuid").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_zero_limit_is_rejected() {
    let app = create_test_app().await;
    let response = app
        .post("/api/recommendations?limit=0", family_profile())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_large_limit_is_clamped() {
    let app = create_test_app().await;
    let mut profile = family_profile();
    profile["orcamento_min"] = json!(1000);
    profile["orcamento_max"] = json!(1000000);

    let clamped = app
        .post("/api/recommendations?limit=500", profile.clone())
        .await;
    let max = app.post("/api/recommendations?limit=50", profile).await;

    assert_eq!(clamped.status_code(), StatusCode::OK);
    assert_eq!(
        clamped.json()["total_recommendations"],
        max.json()["total_recommendations"]
    );
    // 12 carros, uno sin notas
    assert_eq!(clamped.json()["total_recommendations"], 11);
}

#[tokio::test]
async fn test_four_selected_priorities_are_rejected() {
    let app = create_test_app().await;
    let mut profile = family_profile();
    profile["prioridades"]["conforto"] = json!(5);

    let response = app.post("/api/recommendations", profile).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}
