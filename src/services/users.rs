use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::{
    config::Config,
    database::models::{birth_parts, user},
    errors::AppError,
    services::{auth, pagination::Page},
};

/// Проверенные данные пользователя для создания или полной замены.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birthday: NaiveDate,
    pub password: String,
}

/// Проверенные изменения для частичного обновления. `None` значит "не трогать".
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
            && self.password.is_none()
    }
}

fn user_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("user with id {} not found", id))
}

fn email_taken() -> AppError {
    AppError::Conflict("user with this email already exists".to_string())
}

/// Нарушение уникальности email на уровне БД (гонка двух регистраций).
fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => email_taken(),
        _ => AppError::DbError(err),
    }
}

pub async fn list_users(db: &DatabaseConnection, page: Page) -> Result<Vec<user::Model>, AppError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;
    Ok(users)
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| user_not_found(id))
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, AppError> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(user)
}

/// Email свободен, либо принадлежит самому пользователю `owner_id`.
async fn ensure_email_available(
    db: &DatabaseConnection,
    email: &str,
    owner_id: Option<i32>,
) -> Result<(), AppError> {
    match find_by_email(db, email).await? {
        Some(existing) if Some(existing.id) != owner_id => Err(email_taken()),
        _ => Ok(()),
    }
}

pub async fn create_user(
    db: &DatabaseConnection,
    config: &Config,
    new_user: NewUser,
) -> Result<user::Model, AppError> {
    ensure_email_available(db, &new_user.email, None).await?;

    let password_hash = auth::hash_password(new_user.password, config.effective_bcrypt_cost()).await?;
    let (birth_month, birth_day) = birth_parts(new_user.birthday);
    let now = Utc::now();

    let model = user::ActiveModel {
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        email: Set(new_user.email),
        birthday: Set(new_user.birthday),
        birth_month: Set(birth_month),
        birth_day: Set(birth_day),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await.map_err(map_unique_violation)?;
    log::info!("Created user {}", created.id);
    Ok(created)
}

/// Полная замена профиля (PUT).
pub async fn update_user(
    db: &DatabaseConnection,
    config: &Config,
    id: i32,
    new_user: NewUser,
) -> Result<user::Model, AppError> {
    let existing = get_user(db, id).await?;
    ensure_email_available(db, &new_user.email, Some(id)).await?;

    let password_hash = auth::hash_password(new_user.password, config.effective_bcrypt_cost()).await?;
    let (birth_month, birth_day) = birth_parts(new_user.birthday);

    let mut active_model = existing.into_active_model();
    active_model.first_name = Set(new_user.first_name);
    active_model.last_name = Set(new_user.last_name);
    active_model.email = Set(new_user.email);
    active_model.birthday = Set(new_user.birthday);
    active_model.birth_month = Set(birth_month);
    active_model.birth_day = Set(birth_day);
    active_model.password_hash = Set(password_hash);
    active_model.updated_at = Set(Utc::now());

    let updated = active_model.update(db).await.map_err(map_unique_violation)?;
    log::info!("Updated user {}", id);
    Ok(updated)
}

/// Частичное обновление (PATCH): меняются только переданные поля.
pub async fn patch_user(
    db: &DatabaseConnection,
    config: &Config,
    id: i32,
    changes: UserChanges,
) -> Result<user::Model, AppError> {
    let existing = get_user(db, id).await?;
    if changes.is_empty() {
        return Ok(existing);
    }

    if let Some(email) = &changes.email {
        ensure_email_available(db, email, Some(id)).await?;
    }

    let mut active_model = existing.into_active_model();
    if let Some(first_name) = changes.first_name {
        active_model.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        active_model.last_name = Set(last_name);
    }
    if let Some(email) = changes.email {
        active_model.email = Set(email);
    }
    if let Some(birthday) = changes.birthday {
        let (birth_month, birth_day) = birth_parts(birthday);
        active_model.birthday = Set(birthday);
        active_model.birth_month = Set(birth_month);
        active_model.birth_day = Set(birth_day);
    }
    if let Some(password) = changes.password {
        let password_hash = auth::hash_password(password, config.effective_bcrypt_cost()).await?;
        active_model.password_hash = Set(password_hash);
    }
    active_model.updated_at = Set(Utc::now());

    let updated = active_model.update(db).await.map_err(map_unique_violation)?;
    log::info!("Patched user {}", id);
    Ok(updated)
}
