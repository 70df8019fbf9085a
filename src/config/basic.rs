use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr};

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `5000`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database URL for SQLite.
    /// TOML: `basic.database_url`. Default: `sqlite://clinicdesk.db`.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Whether protected routes require a logged-in session.
    /// `false` is the open demo deployment.
    /// TOML: `basic.auth_gate_enabled`. Default: `true`.
    #[serde(default = "default_auth_gate_enabled")]
    pub auth_gate_enabled: bool,

    /// Admin login name. Login is refused while unset.
    /// TOML: `basic.admin_username`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub admin_username: Option<String>,

    /// Admin login password. Login is refused while unset.
    /// TOML: `basic.admin_password`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub admin_password: Option<String>,

    /// Secret the session cookie key is derived from. A random key is used when unset,
    /// which invalidates sessions on every restart.
    /// TOML: `basic.session_secret`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub session_secret: Option<String>,

    /// Drop the `Secure` attribute from session cookies (plain-HTTP development only).
    /// TOML: `basic.insecure_cookie`. Default: `false`.
    #[serde(default)]
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: "sqlite://clinicdesk.db".to_string(),
            loglevel: "info".to_string(),
            auth_gate_enabled: default_auth_gate_enabled(),
            admin_username: None,
            admin_password: None,
            session_secret: None,
            insecure_cookie: false,
        }
    }
}

/// Env values such as `ADMIN_PASSWORD=1234` arrive as numbers; keep them as strings.
fn deserialize_opt_string_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        _ => Err(serde::de::Error::custom("expected a string or a number")),
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    5000
}

fn default_auth_gate_enabled() -> bool {
    true
}
