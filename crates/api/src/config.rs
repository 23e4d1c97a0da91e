use std::time::Duration;

use pmo_db::PoolSettings;

use crate::auth::jwt::JwtConfig;

/// Default minimum password length for new and reset passwords.
const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// `development` adds error detail to 500 responses.
    pub app_env: String,
    pub database_url: String,
    /// Pool size and store timeouts.
    pub pool: PoolSettings,
    pub jwt: JwtConfig,
    pub password_min_length: usize,
    /// Account created at startup when no user holds this email yet.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the initial functional administrator.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `APP_ENV`                   | `production`            |
    /// | `DATABASE_URL`              | **required**            |
    /// | `DB_MAX_CONNECTIONS`        | `20`                    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`   | `5`                     |
    /// | `DB_STATEMENT_TIMEOUT_SECS` | `10`                    |
    /// | `PASSWORD_MIN_LENGTH`       | `6`                     |
    /// | `BOOTSTRAP_ADMIN_EMAIL`     | unset                   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`  | unset                   |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is missing or a numeric variable does not
    /// parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "production".into());

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in the environment");

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            acquire_timeout: Duration::from_secs(env_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )),
            statement_timeout: Duration::from_secs(env_or(
                "DB_STATEMENT_TIMEOUT_SECS",
                defaults.statement_timeout.as_secs(),
            )),
        };

        let password_min_length = env_or("PASSWORD_MIN_LENGTH", DEFAULT_PASSWORD_MIN_LENGTH);

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_env,
            database_url,
            pool,
            jwt,
            password_min_length,
            bootstrap_admin,
        }
    }

    /// Whether 500 responses may carry internal error detail.
    pub fn diagnostics_enabled(&self) -> bool {
        self.app_env == "development"
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number")),
        Err(_) => default,
    }
}
