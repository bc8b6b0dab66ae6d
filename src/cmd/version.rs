use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use log::warn;

use super::{AppContext, RunCommand};

/// Show client and server versions.
#[derive(Args)]
pub struct VersionArgs {
    /// Only print the client version.
    #[arg(short, long)]
    pub client: bool,
}

#[async_trait]
impl RunCommand for VersionArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        println!("client: {}", env!("CARGO_PKG_VERSION"));
        if self.client {
            return Ok(());
        }

        match ctx.api.server_version().await {
            Ok(version) => println!("server: {version}"),
            Err(err) => {
                warn!("Fetch server version failed: {err}");
                println!("server: <unavailable>");
            }
        }
        Ok(())
    }
}
