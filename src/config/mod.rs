pub(crate) mod auth;

use crate::{
    channel::SshConnector,
    client::{Client, ClientBuilder},
    constant::DEFAULT_PORT,
    error::SftpResult,
};
use serde::Deserialize;

/// Where and as whom a [Client] connects
///
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) hostname: String,
    pub(crate) port: u16,
    pub(crate) auth: auth::AuthInfo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            port: DEFAULT_PORT,
            auth: auth::AuthInfo::default(),
        }
    }
}

impl Config {
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.auth.username
    }

    pub fn password(&self) -> &str {
        &self.auth.password
    }

    pub fn address(&self) -> (&str, u16) {
        (self.hostname.as_str(), self.port)
    }
}

/// The connection settings handed over by an orchestration host
///
/// ```
/// let config: sftp::ResourceConfig = serde_json::from_str(
///     r#"{"hostname": "127.0.0.1", "port": 2222, "username": "user", "password": "pw"}"#,
/// ).unwrap();
/// let client = config.into_client();
/// assert!(!client.connected());
/// ```
#[derive(Clone, Deserialize)]
pub struct ResourceConfig {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl std::fmt::Debug for ResourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl ResourceConfig {
    fn builder(&self) -> ClientBuilder {
        ClientBuilder::new()
            .hostname(&self.hostname)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
    }

    /// create a disconnected client from these settings
    ///
    pub fn into_client(self) -> Client<SshConnector> {
        self.builder().build()
    }

    /// create a client and connect it straight away
    ///
    pub fn connect(self) -> SftpResult<Client<SshConnector>> {
        self.builder().connect()
    }
}
