use serde::Deserialize;

/// Client configuration loaded from `RIVALQUEST_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL (default: http://127.0.0.1:3000)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent on authenticated routes
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Whole-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// Example: `RIVALQUEST_BASE_URL`, `RIVALQUEST_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("RIVALQUEST_").from_env()
    }

    /// Same as `from_env`, reading from an explicit variable list.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("RIVALQUEST_").from_iter(vars)
    }
}
