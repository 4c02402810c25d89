pub mod auth;
pub mod context;
pub mod health;
pub mod middleware;
pub mod subscriptions;
pub mod users;
pub mod validation;

use actix_web::web;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{api::middleware::request_id, errors::AppError};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users::get_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::patch_user,
        // Subscriptions
        subscriptions::subscribe,
        subscriptions::unsubscribe,
        subscriptions::get_subscriptions,
        subscriptions::get_birthdays,
        // Auth
        auth::issue_token,
        // Health
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            users::UserRequest,
            users::UserPatchRequest,
            users::UserResponse,
            subscriptions::MessageResponse,
            auth::LoginRequest,
            auth::TokenResponse,
            health::HealthStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "User registration and profile management"),
        (name = "Subscriptions", description = "Birthday subscriptions"),
        (name = "Auth", description = "JWT issuing"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Регистрирует все маршруты `/api` и обработчики ошибок экстракторов.
pub fn configure(cfg: &mut web::ServiceConfig, max_body_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(max_body_bytes)
            .error_handler(|err, req| {
                log::debug!("request_id={} rejected JSON body: {}", request_id(req), err);
                AppError::InvalidInput(format!("invalid JSON body: {}", err)).into()
            }),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, req| {
        log::debug!("request_id={} rejected query: {}", request_id(req), err);
        AppError::InvalidInput(format!("invalid query parameters: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, req| {
        log::debug!("request_id={} rejected path: {}", request_id(req), err);
        AppError::InvalidInput("invalid user id".to_string()).into()
    }))
    .service(
        web::scope("/api")
            .configure(users::init_routes)
            .configure(subscriptions::init_routes)
            .configure(auth::init_routes)
            .configure(health::init_routes),
    );
}
