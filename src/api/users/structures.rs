use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::{
    api::validation::{Violations, normalize_email},
    database::models::user,
    errors::AppError,
    services::users::{NewUser, UserChanges},
};

/// Тело POST /users и PUT /users/{id}.
/// Поля необязательны на уровне serde, чтобы сообщить обо всех пропусках сразу.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "birthday_format::deserialize")]
    #[schema(value_type = Option<String>, format = Date, example = "1990-05-17")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub password: String,
}

impl UserRequest {
    pub fn validate(self, today: NaiveDate) -> Result<NewUser, AppError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = normalize_email(&self.email);

        let mut violations = Violations::default();
        if first_name.is_empty() {
            violations.push("firstName field is required");
        }
        if last_name.is_empty() {
            violations.push("lastName field is required");
        }
        if email.is_empty() {
            violations.push("email field is required");
        }
        if self.birthday.is_none() {
            violations.push("birthday field is required");
        }
        if self.password.is_empty() {
            violations.push("password field is required");
        }

        violations.check_name("firstName", &first_name);
        violations.check_name("lastName", &last_name);
        if !email.is_empty() {
            violations.check_email(&email);
        }
        if let Some(birthday) = self.birthday {
            violations.check_birthday(birthday, today);
        }
        if !self.password.is_empty() {
            violations.check_password(&self.password);
        }
        violations.into_result()?;

        Ok(NewUser {
            first_name,
            last_name,
            email,
            birthday: self.birthday.ok_or(AppError::Internal)?,
            password: self.password,
        })
    }
}

/// Тело PATCH /users/{id}: передаются только изменяемые поля.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPatchRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "birthday_format::deserialize")]
    #[schema(value_type = Option<String>, format = Date, example = "1990-05-17")]
    pub birthday: Option<NaiveDate>,
    pub password: Option<String>,
}

impl UserPatchRequest {
    pub fn validate(self, today: NaiveDate) -> Result<UserChanges, AppError> {
        let mut violations = Violations::default();

        let first_name = self.first_name.map(|v| v.trim().to_string());
        if let Some(value) = &first_name {
            if value.is_empty() {
                violations.push("firstName cannot be empty");
            }
            violations.check_name("firstName", value);
        }

        let last_name = self.last_name.map(|v| v.trim().to_string());
        if let Some(value) = &last_name {
            if value.is_empty() {
                violations.push("lastName cannot be empty");
            }
            violations.check_name("lastName", value);
        }

        let email = self.email.as_deref().map(normalize_email);
        if let Some(value) = &email {
            if value.is_empty() {
                violations.push("email cannot be empty");
            } else {
                violations.check_email(value);
            }
        }

        if let Some(birthday) = self.birthday {
            violations.check_birthday(birthday, today);
        }

        if let Some(password) = &self.password {
            if password.is_empty() {
                violations.push("password cannot be empty");
            } else {
                violations.check_password(password);
            }
        }

        violations.into_result()?;

        Ok(UserChanges {
            first_name,
            last_name,
            email,
            birthday: self.birthday,
            password: self.password,
        })
    }
}

/// Публичное представление пользователя, без хеша пароля.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub birthday: NaiveDate,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            birthday: model.birthday,
        }
    }
}

pub fn to_responses(models: Vec<user::Model>) -> Vec<UserResponse> {
    models.into_iter().map(UserResponse::from).collect()
}

/// Дата рождения принимается как `YYYY-MM-DD` или как RFC 3339 метка времени.
mod birthday_format {
    use chrono::{DateTime, NaiveDate};
    use serde::de::Error;

    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|_| D::Error::custom("birthday must be a date in YYYY-MM-DD format"))
    }
}
