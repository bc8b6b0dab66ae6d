use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use log::debug;
use singalong::api::request::SingRequest;
use singalong::api::Id;

use super::{AppContext, RunCommand};

/// Ask the host to queue a song for you.
#[derive(Args)]
pub struct RequestArgs {
    /// Id of the song, as shown by `search`.
    pub song: String,

    /// Venue to sing at. Defaults to the one picked with `venues --select`.
    #[arg(long)]
    pub venue: Option<String>,

    /// Name the host should call out. Remembered for the next requests.
    #[arg(long)]
    pub singer: Option<String>,
}

#[async_trait]
impl RunCommand for RequestArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        let song_id = Id::from(self.song.trim());
        if song_id.is_empty() {
            bail!("song id cannot be empty");
        }

        let venue_id = match self.venue {
            Some(ref venue) => Id::from(venue.trim()),
            None => match ctx.prefs.selected_venue() {
                Some(venue) => venue.id,
                None => bail!("no venue selected, run `singalong venues --select <id>` first"),
            },
        };
        if venue_id.is_empty() {
            bail!("venue id cannot be empty");
        }

        if let Some(ref singer) = self.singer {
            ctx.prefs.set_singer_name(singer);
        }
        let singer_name = ctx
            .prefs
            .singer_name()
            .or_else(|| ctx.auth.profile().map(|profile| profile.display_name()));
        let Some(singer_name) = singer_name else {
            bail!("tell the host who is singing with `--singer <name>`");
        };

        let req = SingRequest {
            venue_id,
            song_id,
            singer_name,
        };
        let token = ctx.auth.token();
        debug!("Submit request {req:?}, authenticated: {}", token.is_some());

        let receipt = match ctx.api.submit_request(&req, token.as_deref()).await {
            Ok(receipt) => receipt,
            Err(err) => {
                ctx.auth.forget_rejected(&err);
                return Err(err.into());
            }
        };

        match receipt.position {
            Some(position) => println!(
                "Request sent, {} is number {position} in the queue",
                req.singer_name
            ),
            None => println!("Request sent, {} is in the queue", req.singer_name),
        }
        Ok(())
    }
}
