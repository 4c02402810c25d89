use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;
const DEFAULT_JWT_TTL_SECS: i64 = 24 * 60 * 60;
const DEFAULT_BCRYPT_COST: u32 = 12;
// Границы стоимости, которые принимает bcrypt
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub timezone: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub jwt_secret_key: String,
    pub jwt_ttl_secs: Option<i64>,
    pub bcrypt_cost: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .add_source(config::Environment::default())
            .build()?;

        let mut config: Config = cfg.try_deserialize()?;

        // Временная зона по умолчанию
        if config.timezone.is_none() {
            config.timezone = Some("UTC".to_string());
        }

        config.validate()?;

        Ok(config)
    }

    /// Конфигурация со значениями по умолчанию и заданным секретом подписи JWT.
    pub fn with_secret(jwt_secret_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
            timezone: Some("UTC".to_string()),
            max_body_bytes: None,
            jwt_secret_key: jwt_secret_key.into(),
            jwt_ttl_secs: None,
            bcrypt_cost: None,
        }
    }

    /// Получает временную зону из конфигурации
    pub fn get_timezone(&self) -> Result<Tz, chrono_tz::ParseError> {
        let tz_str = self.timezone.as_deref().unwrap_or("UTC");
        tz_str.parse::<Tz>()
    }

    /// Текущая дата в настроенной временной зоне
    pub fn today(&self) -> NaiveDate {
        let tz = self.get_timezone().unwrap_or(chrono_tz::UTC);
        Utc::now().with_timezone(&tz).date_naive()
    }

    /// Валидирует конфигурацию на наличие потенциальных проблем безопасности
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(config::ConfigError::Message(
                    "workers must be greater than zero".to_string(),
                ));
            }
        }

        if let Some(tz_str) = &self.timezone {
            if tz_str.parse::<Tz>().is_err() {
                return Err(config::ConfigError::Message(format!(
                    "Invalid timezone: {}",
                    tz_str
                )));
            }
        }

        // Лимит тела JSON: 1KB..10MB
        if let Some(limit) = self.max_body_bytes {
            let min = 1024;
            let max = 10 * 1024 * 1024;
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        if self.jwt_secret_key.trim().len() < MIN_JWT_SECRET_LEN {
            return Err(config::ConfigError::Message(format!(
                "JWT_SECRET_KEY must be at least {} bytes long",
                MIN_JWT_SECRET_LEN
            )));
        }

        if let Some(ttl) = self.jwt_ttl_secs {
            if !(60..=30 * 24 * 60 * 60).contains(&ttl) {
                return Err(config::ConfigError::Message(
                    "jwt_ttl_secs must be between 60 seconds and 30 days".to_string(),
                ));
            }
        }

        if let Some(cost) = self.bcrypt_cost {
            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                return Err(config::ConfigError::Message(format!(
                    "bcrypt_cost must be between {} and {}",
                    MIN_BCRYPT_COST,
                    MAX_BCRYPT_COST
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn effective_jwt_ttl_secs(&self) -> i64 {
        self.jwt_ttl_secs.unwrap_or(DEFAULT_JWT_TTL_SECS)
    }

    pub fn effective_bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    /// Читает `DATABASE_URL`, а если он не задан, собирает URL PostgreSQL
    /// из `DB_HOST`, `DB_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        if let Ok(url) = env::var("DATABASE_URL") {
            return Ok(Self::default_from_url(url));
        }

        let require = |key: &str| {
            env::var(key).map_err(|_| {
                config::ConfigError::Message(format!(
                    "Neither DATABASE_URL nor {} is set",
                    key
                ))
            })
        };

        let host = require("DB_HOST")?;
        let user = require("POSTGRES_USER")?;
        let password = require("POSTGRES_PASSWORD")?;
        let db_name = require("POSTGRES_DB")?;
        let port: u16 = parse_env_var("DB_PORT").unwrap_or(5432);

        let url = compose_postgres_url(&host, port, &user, &password, &db_name)?;
        Ok(Self::default_from_url(url))
    }

    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }

    /// URL без пароля, пригодный для логов
    pub fn redacted_url(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            }
            Err(_) => "<unparseable database url>".to_string(),
        }
    }
}

fn compose_postgres_url(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    db_name: &str,
) -> Result<String, config::ConfigError> {
    let invalid = |what: &str| config::ConfigError::Message(format!("Invalid database {}", what));

    let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("url"))?;
    url.set_host(Some(host)).map_err(|_| invalid("host"))?;
    url.set_port(Some(port)).map_err(|_| invalid("port"))?;
    url.set_username(user).map_err(|_| invalid("user"))?;
    url.set_password(Some(password))
        .map_err(|_| invalid("password"))?;
    url.set_path(db_name);
    Ok(url.to_string())
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}
