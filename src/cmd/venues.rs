use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use singalong::display::{display_list, DisplayStyle};

use super::{AppContext, RunCommand};

/// List venues, or pick the one you are singing at.
#[derive(Args)]
pub struct VenuesArgs {
    /// Remember this venue for later requests.
    #[arg(short, long)]
    pub select: Option<String>,

    /// Forget the selected venue.
    #[arg(long, conflicts_with = "select")]
    pub clear: bool,

    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    /// Don't print the header row.
    #[arg(long)]
    pub headless: bool,
}

#[async_trait]
impl RunCommand for VenuesArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        if self.clear {
            ctx.prefs.clear_venue();
            println!("Venue selection cleared");
            return Ok(());
        }

        let venues = ctx.api.venues().await?;
        let Some(ref select) = self.select else {
            return display_list(venues, self.output, self.headless);
        };

        let id = select.trim();
        let Some(venue) = venues.into_iter().find(|venue| venue.id.to_string() == id) else {
            bail!("venue '{id}' not found");
        };
        ctx.prefs.select_venue(&venue);
        println!("Now singing at {}", venue.name);
        Ok(())
    }
}
