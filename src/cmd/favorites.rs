use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use singalong::api::error::ApiError;
use singalong::api::Id;
use singalong::display::{display_list, DisplayStyle};

use super::{AppContext, RunCommand};

/// Manage the songs saved to your account. Requires login.
#[derive(Args)]
pub struct FavoritesCommand {
    #[command(subcommand)]
    pub command: FavoritesCommands,
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    List(ListArgs),
    Add(AddArgs),
    Remove(RemoveArgs),
}

/// Show saved songs.
#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    /// Don't print the header row.
    #[arg(long)]
    pub headless: bool,
}

/// Save a song.
#[derive(Args)]
pub struct AddArgs {
    /// Id of the song, as shown by `search`.
    pub song: String,
}

/// Remove a saved song.
#[derive(Args)]
pub struct RemoveArgs {
    pub song: String,
}

#[async_trait]
impl RunCommand for FavoritesCommand {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        let token = ctx.require_token()?;
        let result = match &self.command {
            FavoritesCommands::List(args) => match ctx.api.favorites(&token).await {
                Ok(songs) => return display_list(songs, args.output, args.headless),
                Err(err) => Err(err),
            },
            FavoritesCommands::Add(args) => {
                let id = Id::from(args.song.trim());
                ctx.api
                    .add_favorite(&token, id.clone())
                    .await
                    .map(|_| println!("Song {id} saved"))
            }
            FavoritesCommands::Remove(args) => {
                let id = Id::from(args.song.trim());
                ctx.api
                    .remove_favorite(&token, &id)
                    .await
                    .map(|_| println!("Song {id} removed"))
            }
        };
        result.map_err(|err: ApiError| {
            ctx.auth.forget_rejected(&err);
            err.into()
        })
    }
}
