//! Простые функции валидации для входных DTO.
//! Позволяет раннее отбрасывание некорректных данных.

use chrono::NaiveDate;
use regex::Regex;

use crate::errors::AppError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 8;
// bcrypt учитывает только первые 72 байта
pub const MAX_PASSWORD_BYTES: usize = 72;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").unwrap();
}

/// Email хранится без пробелов по краям и в нижнем регистре.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Накопитель ошибок: клиент получает все проблемы сразу, через запятую.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(self.0.join(", ")))
        }
    }

    pub fn check_name(&mut self, field: &str, value: &str) {
        if !ensure_max_len(value, MAX_NAME_LEN) {
            self.push(format!("{} must be at most {} characters long", field, MAX_NAME_LEN));
        }
    }

    pub fn check_email(&mut self, email: &str) {
        if !ensure_max_len(email, MAX_EMAIL_LEN) {
            self.push(format!("email must be at most {} characters long", MAX_EMAIL_LEN));
        } else if !validate_email(email) {
            self.push("invalid email format");
        }
    }

    pub fn check_birthday(&mut self, birthday: NaiveDate, today: NaiveDate) {
        if birthday > today {
            self.push("birthday cannot be in the future");
        }
    }

    pub fn check_password(&mut self, password: &str) {
        if password.chars().count() < MIN_PASSWORD_LEN {
            self.push(format!(
                "password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ));
        } else if password.len() > MAX_PASSWORD_BYTES {
            self.push(format!(
                "password must be at most {} bytes long",
                MAX_PASSWORD_BYTES
            ));
        }
    }
}
