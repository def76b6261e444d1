//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use anyhow::{Context, bail};
use auth::{AuthConfig, MAX_TOKEN_TTL};
use platform::password::HashParams;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> anyhow::Result<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("development") | Some("dev") | Some("local") => {
                Ok(Self::Development)
            }
            Some("production") | Some("prod") | Some("staging") => Ok(Self::Production),
            Some(other) => bail!("APP_ENV has unknown value {other:?}"),
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env = AppEnv::parse(lookup("APP_ENV").as_deref())?;

        let server_port = parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let database_url = database_url(&lookup)?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            env,
            server_port,
            database_url,
            db_max_connections,
            frontend_origins,
            auth: auth_config(&lookup, env)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not valid: {raw:?}")),
        _ => Ok(default),
    }
}

/// `DATABASE_URL` wins; otherwise assemble it from the `DB_*` parts.
fn database_url(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
        return Ok(url);
    }

    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(lookup, "DB_PORT", 5432)?;
    let user = lookup("DB_USER").context("DATABASE_URL or DB_USER must be set")?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let name = lookup("DB_NAME").context("DATABASE_URL or DB_NAME must be set")?;

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

fn auth_config(
    lookup: &impl Fn(&str) -> Option<String>,
    env: AppEnv,
) -> anyhow::Result<AuthConfig> {
    let mut config = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
        Some(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                tracing::warn!(
                    length = secret.len(),
                    "JWT_SECRET is shorter than {MIN_SECRET_LEN} bytes"
                );
            }
            AuthConfig::new(secret.into_bytes())
        }
        None if env.is_development() => {
            tracing::warn!("JWT_SECRET not set, using a random secret for this process");
            AuthConfig::development()
        }
        None => bail!("JWT_SECRET must be set outside development"),
    };

    let ttl_secs: u64 = parse_or(lookup, "TOKEN_TTL_SECS", config.token_ttl.as_secs())?;
    if ttl_secs == 0 || ttl_secs > MAX_TOKEN_TTL.as_secs() {
        bail!(
            "TOKEN_TTL_SECS must be between 1 and {}, got {ttl_secs}",
            MAX_TOKEN_TTL.as_secs()
        );
    }
    config.token_ttl = Duration::from_secs(ttl_secs);

    let defaults = HashParams::default();
    config.hash_params = HashParams {
        memory_kib: parse_or(lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
        iterations: parse_or(lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
        parallelism: parse_or(lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
    };

    if let Some(pepper) = lookup("PASSWORD_PEPPER").filter(|p| !p.is_empty()) {
        config.password_pepper = Some(pepper.into_bytes());
    }

    // Reject bad work factors at startup rather than on the first sign-up
    config
        .password_hasher()
        .context("PASSWORD_HASH_* parameters are invalid")?;

    Ok(config)
}
