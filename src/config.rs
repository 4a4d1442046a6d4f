use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// Mailgun 邮件服务配置；`enabled = false` 时只记录日志不真正发送
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_mail_sender")]
    pub sender: String,
    #[serde(default = "default_mail_base_url")]
    pub base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            domain: String::new(),
            sender: default_mail_sender(),
            base_url: default_mail_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 邮件中链接使用的前端地址，未配置时使用请求的 Host
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            tax_rate: default_tax_rate(),
        }
    }
}

fn default_mail_sender() -> String {
    "Marketplace <noreply@marketplace.local>".to_string()
}

fn default_mail_base_url() -> String {
    "https://api.mailgun.net".to_string()
}

fn default_tax_rate() -> f64 {
    0.05
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("failed to parse config file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and config.toml was not found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 3000u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                    },
                    mail: MailConfig::default(),
                    app: AppConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("MAILGUN_ENABLED")
            && let Ok(b) = v.parse()
        {
            self.mail.enabled = b;
        }
        if let Ok(v) = env::var("MAILGUN_KEY") {
            self.mail.api_key = v;
        }
        if let Ok(v) = env::var("MAILGUN_DOMAIN") {
            self.mail.domain = v;
        }
        if let Ok(v) = env::var("MAILGUN_EMAIL_SENDER") {
            self.mail.sender = v;
        }
        if let Ok(v) = env::var("MAILGUN_BASE_URL") {
            self.mail.base_url = v;
        }
        if let Ok(v) = env::var("PUBLIC_URL") {
            self.app.public_url = Some(v);
        }
        if let Ok(v) = env::var("TAX_RATE")
            && let Ok(r) = v.parse()
        {
            self.app.tax_rate = r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml_uses_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [jwt]
            secret = "secret"
            access_token_expires_in = 3600
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(!config.mail.enabled);
        assert_eq!(config.mail.base_url, "https://api.mailgun.net");
        assert_eq!(config.app.tax_rate, 0.05);
        assert!(config.app.public_url.is_none());
    }

    #[test]
    fn test_parse_mail_section() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/marketplace"
            max_connections = 5

            [jwt]
            secret = "secret"
            access_token_expires_in = 3600

            [mail]
            enabled = true
            api_key = "key-123"
            domain = "mg.example.com"

            [app]
            public_url = "https://shop.example.com"
            tax_rate = 0.08
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.mail.enabled);
        assert_eq!(config.mail.domain, "mg.example.com");
        assert_eq!(config.app.public_url.as_deref(), Some("https://shop.example.com"));
        assert_eq!(config.app.tax_rate, 0.08);
    }
}
