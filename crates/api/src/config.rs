use anyhow::{anyhow, Result};

/// Process configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Symmetric signing key for identity tokens. Required.
    pub jwt_secret: String,

    /// Postgres connection string; absent means in-memory stores.
    pub database_url: Option<String>,

    pub bind_addr: String,

    /// Optional initial admin account, created only if the email is absent.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Clone, Debug)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET must be set"))?;
        if jwt_secret.is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        let database_url = std::env::var("DATABASE_URL").ok();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let bootstrap_admin = match (
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together"
                ))
            }
        };

        Ok(Self {
            jwt_secret,
            database_url,
            bind_addr,
            bootstrap_admin,
        })
    }
}
