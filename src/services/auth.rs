use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::AppError, services::users};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims выпускаемого access-токена.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// ID пользователя
    pub sub: i32,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Подписывает HS256 токен для пользователя, срок жизни берётся из конфигурации.
pub fn mint_access_token(
    user_id: i32,
    now: DateTime<Utc>,
    config: &Config,
) -> Result<IssuedToken, AppError> {
    let ttl = config.effective_jwt_ttl_secs();
    let iat = now.timestamp();
    let claims = Claims {
        sub: user_id,
        iat,
        exp: iat + ttl,
    };

    let token = encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_key.as_bytes()),
    )?;

    Ok(IssuedToken {
        token,
        expires_in: ttl,
    })
}

/// Проверяет подпись и срок действия токена.
pub fn verify_access_token(token: &str, config: &Config) -> Result<Claims, AppError> {
    let validation = Validation::new(ALGORITHM);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => "token expired",
            ErrorKind::InvalidSignature => "invalid token signature",
            _ => "invalid token",
        };
        log::debug!("JWT rejected: {}", e);
        AppError::Unauthorized(reason.to_string())
    })
}

/// bcrypt блокирует поток, поэтому хеширование уходит в blocking-пул.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            log::error!("Password hashing task failed: {}", e);
            AppError::Internal
        })?
        .map_err(AppError::from)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            log::error!("Password verification task failed: {}", e);
            AppError::Internal
        })?
        .map_err(AppError::from)
}

/// Проверяет email и пароль и выдаёт токен.
/// Неизвестный email и неверный пароль неотличимы для клиента.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    email: &str,
    password: String,
) -> Result<IssuedToken, AppError> {
    let invalid = || AppError::Unauthorized("invalid email or password".to_string());

    let user = users::find_by_email(db, email).await?.ok_or_else(|| {
        log::info!("Login attempt for unknown email");
        invalid()
    })?;

    if !verify_password(password, user.password_hash.clone()).await? {
        log::info!("Login attempt with wrong password for user {}", user.id);
        return Err(invalid());
    }

    log::info!("User {} logged in", user.id);
    mint_access_token(user.id, Utc::now(), config)
}
