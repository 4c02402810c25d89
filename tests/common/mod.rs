//! Общие помощники интеграционных тестов: in-memory SQLite и тестовый сервис actix.
#![allow(dead_code)]

use actix_web::{
    App, Error as ActixError,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test, web,
};
use birthday_notify::{
    api::{self, middleware::RequestId, users::UserResponse},
    app_state::AppState,
    config::{Config, DatabaseSettings, MIN_BCRYPT_COST},
    database::{self, schema},
};
use chrono::{Datelike, NaiveDate};
use serde_json::{Value, json};

pub const PASSWORD: &str = "correct-horse-battery";

pub async fn test_state() -> AppState {
    // Один коннект: у каждого соединения с :memory: своя база
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout_secs: None,
        acquire_timeout_secs: None,
        idle_timeout_secs: None,
        sql_log: None,
    };
    let db = database::connect_with_settings(&settings)
        .await
        .expect("in-memory sqlite");
    schema::sync(&db).await.expect("schema sync");

    let mut config = Config::with_secret("integration-test-secret-key");
    config.bcrypt_cost = Some(MIN_BCRYPT_COST);

    AppState { db, config }
}

pub async fn init_app(
    state: &AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError> {
    test::init_service(
        App::new()
            .wrap(RequestId)
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| api::configure(cfg, 64 * 1024)),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Дата рождения в 2000 году (високосный, любой месяц и день допустимы).
pub fn born_in_2000(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, month, day).expect("valid date")
}

pub fn birthday_today(config: &Config) -> NaiveDate {
    let today = config.today();
    born_in_2000(today.month(), today.day())
}

pub fn user_body(first_name: &str, email: &str, birthday: NaiveDate) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Tester",
        "email": email,
        "birthday": birthday.format("%Y-%m-%d").to_string(),
        "password": PASSWORD,
    })
}

pub async fn register<S>(app: &S, first_name: &str, email: &str, birthday: NaiveDate) -> UserResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>,
{
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(user_body(first_name, email, birthday))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "registration of {email} failed");
    test::read_body_json(resp).await
}

pub async fn login<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/token")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "login of {email} failed");
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("access_token in response")
        .to_string()
}

/// Регистрирует пользователя и сразу получает для него токен.
pub async fn register_and_login<S>(
    app: &S,
    first_name: &str,
    email: &str,
    birthday: NaiveDate,
) -> (UserResponse, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>,
{
    let user = register(app, first_name, email, birthday).await;
    let token = login(app, email, PASSWORD).await;
    (user, token)
}

pub async fn error_body(resp: ServiceResponse<BoxBody>) -> (String, String) {
    let body: Value = test::read_body_json(resp).await;
    (
        body["code"].as_str().unwrap_or_default().to_string(),
        body["message"].as_str().unwrap_or_default().to_string(),
    )
}
