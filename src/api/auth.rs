use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::validation::normalize_email, app_state::AppState, errors::AppError, services::auth,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Время жизни токена в секундах
    pub expires_in: i64,
}

#[utoipa::path(
    post,
    path = "/api/auth/token",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Access token issued", body = TokenResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password")
    )
)]
#[post("/token")]
pub async fn issue_token(
    app_state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    let email = normalize_email(&email);
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "email and password are required".to_string(),
        ));
    }

    let issued = auth::login(&app_state.db, &app_state.config, &email, password).await?;
    Ok(HttpResponse::Created().json(TokenResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service(issue_token));
}
