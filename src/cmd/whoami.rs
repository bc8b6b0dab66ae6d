use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use singalong::display::display_json;

use super::{AppContext, RunCommand};

/// Show the logged in user.
#[derive(Args)]
pub struct WhoamiArgs {
    /// Print the full profile in JSON format.
    #[arg(long)]
    pub json: bool,
}

#[async_trait]
impl RunCommand for WhoamiArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        let Some(profile) = ctx.auth.profile() else {
            println!("Not logged in");
            return Ok(());
        };
        if self.json {
            return display_json(profile);
        }

        println!("{} <{}>", profile.display_name(), profile.email);
        if let Some(venue) = ctx.prefs.selected_venue() {
            println!("Venue: {}", venue.name);
        }
        if let Some(name) = ctx.prefs.singer_name() {
            println!("Singer name: {name}");
        }
        Ok(())
    }
}
