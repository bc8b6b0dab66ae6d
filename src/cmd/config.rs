use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, ValueEnum};
use singalong::display::display_json;

use super::{AppContext, RunCommand};

/// Display the configuration in use, in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    /// Name of the configuration to display.
    pub name: ConfigType,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigType {
    Client,
    Log,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        match self.name {
            ConfigType::Client => display_json(&ctx.client_config),
            ConfigType::Log => display_json(&ctx.log_config),
        }
    }
}
