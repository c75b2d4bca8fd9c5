use serde::Deserialize;

/// Server configuration loaded from environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Bind host (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "json" or "pretty" (default: pretty)
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Webhook signing secret; webhooks are rejected when unset
    #[serde(default)]
    pub paystack_secret_key: Option<String>,

    /// Base of the hosted checkout links handed out on initialization
    #[serde(default = "default_checkout_base_url")]
    pub checkout_base_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_checkout_base_url() -> String {
    "https://checkout.paystack.com".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            paystack_secret_key: None,
            checkout_base_url: default_checkout_base_url(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, e.g. `PORT`,
    /// `LOG_FORMAT`, `PAYSTACK_SECRET_KEY`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.paystack_secret_key = Some(secret.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_env() {
        let config: ServerConfig = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_format, "pretty");
        assert!(config.paystack_secret_key.is_none());
    }

    #[test]
    fn env_overrides_port_and_secret() {
        let config: ServerConfig = envy::from_iter(vec![
            ("PORT".to_string(), "8088".to_string()),
            ("PAYSTACK_SECRET_KEY".to_string(), "sk_test".to_string()),
        ])
        .unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(config.paystack_secret_key.as_deref(), Some("sk_test"));
    }
}
