mod config;
mod context;
mod favorites;
mod login;
mod logout;
mod request;
mod search;
mod venues;
mod version;
mod whoami;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

pub use context::AppContext;

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding client.toml and log.toml. Defaults to $SINGALONG_CONFIG or
    /// ~/.config/singalong.
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Directory holding the saved session and preferences. Defaults to
    /// $SINGALONG_DATA or ~/.local/share/singalong.
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    /// Print debug logs, whatever log.toml says.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[async_trait]
pub trait RunCommand {
    async fn run(&self, ctx: &AppContext) -> Result<()>;
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Config(config::ShowConfigArgs),
    Favorites(favorites::FavoritesCommand),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Request(request::RequestArgs),
    Search(search::SearchArgs),
    Venues(venues::VenuesArgs),
    Version(version::VersionArgs),
    Whoami(whoami::WhoamiArgs),
}

impl App {
    pub async fn run(&self) -> Result<()> {
        let ctx = AppContext::build(&self.global)?;
        // Nothing runs against a half restored session.
        ctx.auth.settled().await;

        match &self.command {
            Commands::Config(args) => args.run(&ctx).await,
            Commands::Favorites(args) => args.run(&ctx).await,
            Commands::Login(args) => args.run(&ctx).await,
            Commands::Logout(args) => args.run(&ctx).await,
            Commands::Request(args) => args.run(&ctx).await,
            Commands::Search(args) => args.run(&ctx).await,
            Commands::Venues(args) => args.run(&ctx).await,
            Commands::Version(args) => args.run(&ctx).await,
            Commands::Whoami(args) => args.run(&ctx).await,
        }
    }
}
