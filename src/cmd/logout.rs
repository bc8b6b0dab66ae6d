use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{AppContext, RunCommand};

/// Forget the saved session.
#[derive(Args)]
pub struct LogoutArgs {}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        if !ctx.auth.is_authenticated() {
            println!("You are not logged in");
        }
        ctx.auth.logout();
        Ok(())
    }
}
