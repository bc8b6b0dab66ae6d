use anyhow::Result;

use crate::config::{CommonConfig, PathSet};

use super::config::ClientConfig;
use super::karaoke::KaraokeApi;
use super::{RequestClient, RequestClientBuilder};

pub struct ClientFactory {
    cfg: ClientConfig,
}

impl ClientFactory {
    pub fn new(cfg: ClientConfig) -> Self {
        Self { cfg }
    }

    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("client", ClientConfig::default)?;
        Ok(Self { cfg })
    }

    pub fn build_client(&self) -> Result<RequestClient> {
        RequestClientBuilder::new(&self.cfg.server)
            .accept_invalid_certs(self.cfg.accept_invalid_certs)
            .build()
    }

    pub fn build_api(&self) -> Result<KaraokeApi> {
        let client = self.build_client()?;
        Ok(KaraokeApi::new(client))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }
}
