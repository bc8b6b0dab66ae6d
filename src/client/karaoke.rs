use log::warn;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::request::{RequestReceipt, SingRequest, REQUESTS_PATH, VERSION_PATH};
use crate::api::song::{FavoriteList, Song, SongList, FAVORITES_PATH, SONGS_PATH};
use crate::api::user::{LoginRequest, LoginResponse, LOGIN_PATH};
use crate::api::venue::{Venue, VenueList, VENUES_PATH};
use crate::api::{Id, HEADER_ACCEPT, MIME_TEXT};

use super::{encode_segment, RequestClient, RequestOptions};

/// Typed endpoints of the karaoke backend.
#[derive(Debug, Clone)]
pub struct KaraokeApi {
    client: RequestClient,
}

impl KaraokeApi {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = to_body(req)?;
        self.client
            .request_json(LOGIN_PATH, RequestOptions::post(body))
            .await
    }

    pub async fn search_songs(&self, search: &str, limit: u32) -> Result<Vec<Song>, ApiError> {
        let options = RequestOptions::get()
            .with_query("search", search.trim())
            .with_query("limit", limit);
        let list: SongList = self.client.request_json(SONGS_PATH, options).await?;
        Ok(list.songs)
    }

    pub async fn venues(&self) -> Result<Vec<Venue>, ApiError> {
        let list: VenueList = self
            .client
            .request_json(VENUES_PATH, RequestOptions::get())
            .await?;
        Ok(list.venues)
    }

    /// Patrons may queue songs anonymously, the token is attached when there is one.
    /// Once the backend accepted the request an unreadable receipt is only logged:
    /// reporting a failure would make the patron queue the song twice.
    pub async fn submit_request(
        &self,
        req: &SingRequest,
        token: Option<&str>,
    ) -> Result<RequestReceipt, ApiError> {
        let options = RequestOptions::post(to_body(req)?);
        let (status, payload) = self.client.send(REQUESTS_PATH, options, token).await?;
        match payload.decode(status) {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                warn!("Request accepted with status {status:?}, receipt ignored: {err}");
                Ok(RequestReceipt::default())
            }
        }
    }

    pub async fn favorites(&self, token: &str) -> Result<Vec<Song>, ApiError> {
        let list: FavoriteList = self
            .client
            .request_auth_json(FAVORITES_PATH, token, RequestOptions::get())
            .await?;
        Ok(list.favorites)
    }

    pub async fn add_favorite(&self, token: &str, song_id: Id) -> Result<(), ApiError> {
        let body = json!({"songId": song_id});
        self.client
            .request_auth(FAVORITES_PATH, token, RequestOptions::post(body))
            .await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, token: &str, song_id: &Id) -> Result<(), ApiError> {
        let path = format!("{FAVORITES_PATH}/{}", encode_segment(&song_id.to_string())?);
        self.client
            .request_auth(&path, token, RequestOptions::delete())
            .await?;
        Ok(())
    }

    /// The version endpoint answers in plain text.
    pub async fn server_version(&self) -> Result<String, ApiError> {
        let options = RequestOptions::get().with_header(HEADER_ACCEPT, MIME_TEXT);
        let payload = self.client.request(VERSION_PATH, options).await?;
        Ok(payload.into_text().trim().to_string())
    }
}

fn to_body<T: Serialize>(req: &T) -> Result<Value, ApiError> {
    match serde_json::to_value(req) {
        Ok(body) => Ok(body),
        Err(e) => Err(ApiError::new(format!("Encode request body failed: {e}"))),
    }
}
