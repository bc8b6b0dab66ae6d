use log::warn;

use crate::api::venue::Venue;
use crate::storage::Storage;

/// Choices the patron made earlier and expects to be remembered: the venue they are
/// at and the name the host should call out.
#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    pub const VENUE_KEY: &'static str = "selectedVenue";
    pub const SINGER_KEY: &'static str = "singerName";

    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn select_venue(&self, venue: &Venue) {
        match serde_json::to_string(venue) {
            Ok(json) => self.storage.set(Self::VENUE_KEY, &json),
            Err(err) => warn!("Encode venue failed, selection is not saved: {err}"),
        }
    }

    pub fn selected_venue(&self) -> Option<Venue> {
        let json = self.storage.get(Self::VENUE_KEY)?;
        match serde_json::from_str::<Venue>(&json) {
            Ok(venue) if !venue.id.is_empty() => Some(venue),
            Ok(_) | Err(_) => {
                warn!("Saved venue is unusable, clearing it");
                self.storage.remove(Self::VENUE_KEY);
                None
            }
        }
    }

    pub fn clear_venue(&self) {
        self.storage.remove(Self::VENUE_KEY);
    }

    pub fn set_singer_name(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.storage.remove(Self::SINGER_KEY);
        } else {
            self.storage.set(Self::SINGER_KEY, name);
        }
    }

    pub fn singer_name(&self) -> Option<String> {
        self.storage
            .get(Self::SINGER_KEY)
            .filter(|name| !name.trim().is_empty())
    }
}
