use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// SMTP settings for outbound mail. Absent when the deployment has no
/// relay configured; sends then fail with a config error instead of
/// silently dropping.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// First admin account, created at startup when missing. Replaces the
/// hardcoded demo logins the UI used to rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub smtp: Option<SmtpConfig>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// Ceiling applied when an employee has no referral_limits row yet.
    pub default_referral_limit: i32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "reftrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "reftrack-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let smtp = match (
            std::env::var("SMTP_HOST").ok(),
            std::env::var("SMTP_USER").ok(),
            std::env::var("SMTP_PASS").ok(),
        ) {
            (Some(host), Some(username), Some(password)) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(587),
                from: std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone()),
                username,
                password,
            }),
            _ => None,
        };
        let bootstrap_admin = match (
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into()),
                email,
                password,
            }),
            _ => None,
        };
        let default_referral_limit = std::env::var("REFERRAL_DEFAULT_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(5);
        Ok(Self {
            database_url,
            jwt,
            smtp,
            bootstrap_admin,
            default_referral_limit,
        })
    }
}
