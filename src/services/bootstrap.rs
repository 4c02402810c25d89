use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    database::models::user,
    errors::AppError,
    services::users::{self, NewUser},
};

#[derive(Debug)]
pub enum SeedOutcome {
    /// `ADMIN_USER_EMAIL` не задан
    Skipped,
    AlreadyExists(i32),
    Created(user::Model),
}

/// Создаёт пользователя, если пользователя с таким email ещё нет.
pub async fn ensure_user(
    db: &DatabaseConnection,
    config: &Config,
    new_user: NewUser,
) -> Result<SeedOutcome, AppError> {
    if let Some(existing) = users::find_by_email(db, &new_user.email).await? {
        log::info!("Admin user already exists with id {}", existing.id);
        return Ok(SeedOutcome::AlreadyExists(existing.id));
    }

    let created = users::create_user(db, config, new_user).await?;
    log::info!("Admin user created with id {}", created.id);
    Ok(SeedOutcome::Created(created))
}
