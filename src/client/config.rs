use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    /// Skip certificate validation, for venues running a self-signed backend.
    #[serde(default = "ClientConfig::default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            accept_invalid_certs: Self::default_accept_invalid_certs(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        // The url itself is checked when the client is built.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }
        Ok(())
    }
}

impl ClientConfig {
    pub fn default_server() -> String {
        String::from("http://127.0.0.1:8080/api")
    }

    pub fn default_accept_invalid_certs() -> bool {
        false
    }
}
