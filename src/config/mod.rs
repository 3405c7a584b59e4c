use std::env;

/// Process configuration. Built once in `main` and shared through `AppState`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Public base URL, used for links in outgoing email
    pub site_url: String,
    pub site_name: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. When unset the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub session_cookie: String,
    pub session_ttl_secs: i64,
    pub require_https: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Shared secret expected in `x-webhook-secret` on inbound reply callbacks
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from_address: String,
    /// Recipient of new-inquiry notifications
    pub admin_address: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloud_name: Option<String>,
    pub upload_folder: Option<String>,
    pub upload_preset: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("STUDIO_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SITE_URL") {
            match url::Url::parse(&v) {
                Ok(_) => self.server.site_url = v.trim_end_matches('/').to_string(),
                Err(e) => tracing::warn!("Ignoring invalid SITE_URL '{}': {}", v, e),
            }
        }
        if let Ok(v) = env::var("SITE_NAME") {
            self.server.site_name = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = non_empty(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.security.admin_email = non_empty(v);
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.security.admin_password = non_empty(v);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.security.session_cookie = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SESSION_TTL_SECS") {
            self.security.session_ttl_secs = v.parse().unwrap_or(self.security.session_ttl_secs);
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("INBOUND_WEBHOOK_SECRET") {
            self.security.webhook_secret = non_empty(v);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_API_URL") {
            self.mail.api_url = v;
        }
        if let Ok(v) = env::var("MAIL_API_KEY") {
            self.mail.api_key = non_empty(v);
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.mail.from_address = v;
        }
        if let Ok(v) = env::var("MAIL_ADMIN_ADDRESS") {
            self.mail.admin_address = non_empty(v);
        }
        if let Ok(v) = env::var("MAIL_TIMEOUT_SECS") {
            self.mail.timeout_secs = v.parse().unwrap_or(self.mail.timeout_secs);
        }

        // Image host (browser-side uploads only)
        if let Ok(v) = env::var("CLOUDINARY_CLOUD_NAME") {
            self.media.cloud_name = non_empty(v);
        }
        if let Ok(v) = env::var("CLOUDINARY_UPLOAD_FOLDER") {
            self.media.upload_folder = non_empty(v);
        }
        if let Ok(v) = env::var("CLOUDINARY_UPLOAD_PRESET") {
            self.media.upload_preset = non_empty(v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                site_url: "http://localhost:3000".to_string(),
                site_name: "Studio".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                admin_email: None,
                admin_password: None,
                session_cookie: "admin_session".to_string(),
                session_ttl_secs: 60 * 60,
                require_https: false,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                webhook_secret: None,
            },
            mail: MailConfig {
                api_url: "https://api.resend.com/emails".to_string(),
                api_key: None,
                from_address: "Studio <onboarding@resend.dev>".to_string(),
                admin_address: None,
                timeout_secs: 10,
            },
            media: MediaConfig {
                cloud_name: None,
                upload_folder: None,
                upload_preset: None,
            },
        }
    }

    pub fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.site_url = "https://staging.example.com".to_string();
        config.database.max_connections = 10;
        config.database.connection_timeout = 10;
        config.security.jwt_secret = String::new();
        config.security.require_https = true;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.site_url = "https://example.com".to_string();
        config.database.max_connections = 20;
        config.database.connection_timeout = 5;
        config.security.jwt_secret = String::new();
        config.security.require_https = true;
        config.security.enable_cors = false;
        config.security.cors_origins = Vec::new();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.session_ttl_secs, 3600);
        assert_eq!(config.security.session_cookie, "admin_session");
        assert!(!config.security.require_https);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert!(config.security.require_https);
        // Secrets must come from the environment outside development
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        assert_eq!(non_empty("   ".to_string()), None);
        assert_eq!(non_empty(" admin@example.com ".to_string()), Some("admin@example.com".to_string()));
    }
}
