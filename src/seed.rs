//! Учётная запись администратора из переменных окружения `ADMIN_USER_*`.

use std::env;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::{
    api::users::UserRequest,
    config::Config,
    errors::AppError,
    services::bootstrap::{self, SeedOutcome},
};

pub const ADMIN_USER_FIRST_NAME: &str = "ADMIN_USER_FIRST_NAME";
pub const ADMIN_USER_LAST_NAME: &str = "ADMIN_USER_LAST_NAME";
pub const ADMIN_USER_EMAIL: &str = "ADMIN_USER_EMAIL";
pub const ADMIN_USER_BIRTHDAY: &str = "ADMIN_USER_BIRTHDAY";
pub const ADMIN_USER_PASSWORD: &str = "ADMIN_USER_PASSWORD";

/// `None`, если `ADMIN_USER_EMAIL` не задан.
pub fn admin_request_from_env() -> Result<Option<UserRequest>, AppError> {
    let Ok(email) = env::var(ADMIN_USER_EMAIL) else {
        return Ok(None);
    };

    let var = |key: &str| env::var(key).unwrap_or_default();

    let raw_birthday = var(ADMIN_USER_BIRTHDAY);
    let birthday = if raw_birthday.trim().is_empty() {
        None
    } else {
        let parsed = NaiveDate::parse_from_str(raw_birthday.trim(), "%Y-%m-%d").map_err(|_| {
            AppError::InvalidInput(format!("{} must be in YYYY-MM-DD format", ADMIN_USER_BIRTHDAY))
        })?;
        Some(parsed)
    };

    Ok(Some(UserRequest {
        first_name: var(ADMIN_USER_FIRST_NAME),
        last_name: var(ADMIN_USER_LAST_NAME),
        email,
        birthday,
        password: var(ADMIN_USER_PASSWORD),
    }))
}

/// Проверяет данные так же, как регистрация, и создаёт администратора.
pub async fn seed_admin(
    db: &DatabaseConnection,
    config: &Config,
    request: UserRequest,
) -> Result<SeedOutcome, AppError> {
    let new_user = request.validate(config.today())?;
    bootstrap::ensure_user(db, config, new_user).await
}

pub async fn seed_admin_from_env(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<SeedOutcome, AppError> {
    match admin_request_from_env()? {
        Some(request) => seed_admin(db, config, request).await,
        None => {
            log::debug!("{} is not set, admin seeding skipped", ADMIN_USER_EMAIL);
            Ok(SeedOutcome::Skipped)
        }
    }
}
