use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use singalong::display::{display_list, DisplayStyle};

use super::{AppContext, RunCommand};

/// Search the song catalog by title or artist.
#[derive(Args)]
pub struct SearchArgs {
    /// Words to search for.
    #[arg(required = true)]
    pub words: Vec<String>,

    /// Maximum number of songs to show.
    #[arg(short, long, default_value = "20")]
    pub limit: u32,

    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    /// Don't print the header row.
    #[arg(long)]
    pub headless: bool,
}

#[async_trait]
impl RunCommand for SearchArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        let search = self.words.join(" ");
        if search.trim().is_empty() {
            bail!("search words cannot be empty");
        }
        if self.limit == 0 {
            bail!("limit must be greater than 0");
        }

        let songs = ctx.api.search_songs(&search, self.limit).await?;
        display_list(songs, self.output, self.headless)
    }
}
