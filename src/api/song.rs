use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

use super::Id;

pub const SONGS_PATH: &str = "/songs";
pub const FAVORITES_PATH: &str = "/favorites";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: Id,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub artist: String,
}

#[derive(Debug, Deserialize)]
pub struct SongList {
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteList {
    #[serde(default)]
    pub favorites: Vec<Song>,
}

impl TerminalDisplay for Song {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Title", "Artist"]
    }

    fn table_row(self) -> Vec<String> {
        vec![self.id.to_string(), self.title, self.artist]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["id", "title", "artist"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        let mut row = HashMap::new();
        row.insert("id", self.id.to_string());
        row.insert("title", self.title);
        row.insert("artist", self.artist);
        row
    }
}
